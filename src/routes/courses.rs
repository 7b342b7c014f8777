use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::courses::requests::{
    AddCourseMemberRequest, CourseListParams, CourseMemberListParams, CreateCourseRequest,
    JoinCourseRequest, UpdateCourseMemberRequest, UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeCourseIdI64, SafeUserIdI64};

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// HTTP处理程序
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn join_course(
    req: HttpRequest,
    join_data: web::Json<JoinCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.join_course(&req, join_data.into_inner()).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, update_data.into_inner())
        .await
}

pub async fn archive_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.set_archived(&req, course_id.0, true).await
}

pub async fn unarchive_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.set_archived(&req, course_id.0, false).await
}

pub async fn list_members(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<CourseMemberListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .list_members(&req, course_id.0, query.into_inner())
        .await
}

pub async fn add_member(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    member_data: web::Json<AddCourseMemberRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_member(&req, course_id.0, member_data.into_inner())
        .await
}

pub async fn update_member(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    user_id: SafeUserIdI64,
    update_data: web::Json<UpdateCourseMemberRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_member(&req, course_id.0, user_id.0, update_data.into_inner())
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .remove_member(&req, course_id.0, user_id.0)
        .await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                // 管理员查询所有课程，其他用户查询已加入的课程
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        // 教师创建自己的课程，管理员可以为指定教师创建
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/join")
                    .wrap(RateLimit::join_course())
                    .route(web::post().to(join_course)),
            )
            .service(
                web::resource("/{course_id}")
                    .route(web::get().to(get_course))
                    .route(web::put().to(update_course)),
            )
            .route("/{course_id}/archive", web::post().to(archive_course))
            .route("/{course_id}/unarchive", web::post().to(unarchive_course))
            .service(
                web::resource("/{course_id}/members")
                    .route(web::get().to(list_members))
                    .route(web::post().to(add_member)),
            )
            .service(
                web::resource("/{course_id}/members/{user_id}")
                    .route(web::put().to(update_member))
                    .route(web::delete().to(remove_member)),
            )
            .configure(super::assignments::configure_course_assignment_routes),
    );
}

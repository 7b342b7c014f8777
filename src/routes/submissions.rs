use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListParams,
};
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出提交
pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, assignment_id.0, query.into_inner())
        .await
}

// 创建提交
pub async fn create_submission(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, assignment_id.0, body.into_inner())
        .await
}

// 获取我的最新提交
pub async fn get_my_latest_submission(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_my_latest_submission(&req, assignment_id.0)
        .await
}

pub async fn get_submission(req: HttpRequest, submission_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, submission_id.0).await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, submission_id.0, body.into_inner())
        .await
}

// 撤回提交
pub async fn delete_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .delete_submission(&req, submission_id.0)
        .await
}

/// 挂在 `/api/v1/assignments` 作用域下
pub fn configure_assignment_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{id}/submissions")
            .route(web::get().to(list_submissions))
            .route(web::post().to(create_submission)),
    )
    .route(
        "/{id}/submissions/my/latest",
        web::get().to(get_my_latest_submission),
    );
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::delete().to(delete_submission)),
            )
            .route("/{id}/grade", web::put().to(grade_submission)),
    );
}

use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use crate::models::{
    ApiResponse,
    courses::requests::{CourseListParams, CourseListQuery},
};
use crate::services::access::{OrInternal, Outcome, current_user};

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        owner_id: query.owner_id,
        member_id: (!user.is_admin()).then_some(user.id),
        include_archived: query.include_archived.unwrap_or(false),
        search: query.search,
    };

    let mut courses = storage
        .list_courses_with_pagination(list_query)
        .await
        .or_internal("Failed to retrieve course list")?;

    // 邀请码只给讲师和管理员，与详情接口一致
    if !user.is_admin() {
        let mut visible = Vec::with_capacity(courses.items.len());
        for course in std::mem::take(&mut courses.items) {
            let member = storage
                .get_course_member(course.id, user.id)
                .await
                .or_internal("Failed to load course membership")?;
            if member.is_some_and(|m| m.role.can_manage()) {
                visible.push(course);
            } else {
                visible.push(course.without_invite_code());
            }
        }
        courses.items = visible;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        courses,
        "Course list retrieved successfully",
    )))
}

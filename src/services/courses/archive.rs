use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    OrInternal, Outcome, course_access_by_id, current_user, error_response, permission_denied,
};

/// 只有课程所有者或管理员可以归档；课程不会被物理删除
pub async fn set_archived(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    archived: bool,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    if !access.is_owner() && !access.is_admin {
        return Err(permission_denied(
            "Only the course owner can archive or restore the course",
        ));
    }

    let course = storage
        .set_course_archived(course_id, archived)
        .await
        .or_internal("Failed to update course status")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::CourseNotFound, "Course not found")
        })?;

    info!("Course {} archived={} by user {}", course_id, archived, user.id);

    let message = if archived {
        "Course archived successfully"
    } else {
        "Course restored successfully"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, message)))
}

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use std::sync::Arc;
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::CreateCourseRequest,
    users::entities::{User, UserRole},
};
use crate::services::access::{OrInternal, Outcome, current_user, error_response};
use crate::storage::Storage;
use crate::utils::validate::validate_title;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut course_data: CreateCourseRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    course_data.title = course_data.title.trim().to_string();
    validate_title(&course_data.title)
        .map_err(|msg| error_response(StatusCode::BAD_REQUEST, ErrorCode::CourseInvalid, msg))?;

    let owner_id = resolve_owner(&storage, &user, course_data.owner_id).await?;

    let course = storage
        .create_course(owner_id, course_data)
        .await
        .or_internal("Course creation failed")?;

    info!(
        "Course {} ({}) created by {} for owner {}",
        course.id, course.title, user.id, owner_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created successfully")))
}

/// 教师总是自己的课程所有者；管理员必须指定一名教师或管理员
async fn resolve_owner(
    storage: &Arc<dyn Storage>,
    user: &User,
    requested_owner: Option<i64>,
) -> Result<i64, HttpResponse> {
    match user.role {
        UserRole::Teacher => Ok(user.id),
        UserRole::Admin => {
            let owner_id = requested_owner.ok_or_else(|| {
                error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::CourseInvalid,
                    "owner_id is required when an admin creates a course",
                )
            })?;
            let owner = storage
                .get_user_by_id(owner_id)
                .await
                .or_internal("Failed to load course owner")?
                .ok_or_else(|| {
                    error_response(
                        StatusCode::NOT_FOUND,
                        ErrorCode::UserNotFound,
                        "Owner not found",
                    )
                })?;
            if !owner.role.can_own_course() || !owner.is_active() {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::CourseInvalid,
                    "Course owner must be an active teacher or admin",
                ));
            }
            Ok(owner.id)
        }
        UserRole::Student => Err(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to create a course",
        )),
    }
}

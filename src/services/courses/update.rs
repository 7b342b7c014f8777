use actix_web::{HttpRequest, HttpResponse, http::StatusCode};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};
use crate::services::access::{
    OrInternal, Outcome, course_access_by_id, current_user, error_response,
};
use crate::utils::validate::validate_title;

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut update_data: UpdateCourseRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    access.require_manage()?;
    access.require_active()?;

    if let Some(title) = update_data.title.take() {
        let title = title.trim().to_string();
        validate_title(&title).map_err(|msg| {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::CourseInvalid, msg)
        })?;
        update_data.title = Some(title);
    }

    let course = storage
        .update_course(course_id, update_data)
        .await
        .or_internal("Failed to update course")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::CourseNotFound, "Course not found")
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        course,
        "Course updated successfully",
    )))
}

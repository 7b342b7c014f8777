use actix_web::{HttpRequest, HttpResponse, http::StatusCode};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{OrInternal, Outcome, error_response};

pub async fn get_user(service: &UserService, user_id: i64, request: &HttpRequest) -> Outcome {
    let storage = service.get_storage(request)?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .or_internal("Failed to get user information")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, "User not found")
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user,
        "User information retrieved successfully",
    )))
}

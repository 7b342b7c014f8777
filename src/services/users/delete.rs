use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::UserService;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserStatus};
use crate::services::access::{
    OrInternal, Outcome, current_user, error_response, evict_user_session,
};

/// 停用用户，已签发的令牌随缓存清除立即失效
pub async fn disable_user(service: &UserService, user_id: i64, request: &HttpRequest) -> Outcome {
    let operator = current_user(request)?;
    if operator.id == user_id {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CanNotDisableCurrentUser,
            "You cannot disable your own account",
        ));
    }

    set_status(service, user_id, UserStatus::Disabled, request).await
}

pub async fn enable_user(service: &UserService, user_id: i64, request: &HttpRequest) -> Outcome {
    set_status(service, user_id, UserStatus::Active, request).await
}

async fn set_status(
    service: &UserService,
    user_id: i64,
    status: UserStatus,
    request: &HttpRequest,
) -> Outcome {
    let storage = service.get_storage(request)?;

    let user = storage
        .set_user_status(user_id, status)
        .await
        .or_internal("Failed to update user status")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, "User not found")
        })?;

    evict_user_session(request, user_id).await;
    info!("User {} status changed to {}", user_id, status);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user,
        "User status updated successfully",
    )))
}

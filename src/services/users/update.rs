use actix_web::{HttpRequest, HttpResponse, http::StatusCode};

use super::UserService;
use super::checks::{
    check_email, check_password, check_profile_fields, ensure_email_available, hash_or_internal,
    normalize_email, user_write_error,
};
use crate::models::{ApiResponse, ErrorCode, users::requests::UpdateUserRequest};
use crate::services::access::{Outcome, error_response, evict_user_session};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> Outcome {
    let storage = service.get_storage(request)?;

    if let Some(email) = update_data.email.take() {
        let email = normalize_email(&email);
        check_email(&email)?;
        ensure_email_available(&storage, &email, Some(user_id)).await?;
        update_data.email = Some(email);
    }

    check_profile_fields(
        update_data.display_name.as_deref(),
        update_data.avatar_url.as_deref(),
    )?;

    if let Some(password) = update_data.password.take() {
        check_password(&password)?;
        update_data.password = Some(hash_or_internal(&password)?);
    }

    let user = storage
        .update_user(user_id, update_data)
        .await
        .map_err(|e| user_write_error("Failed to update user information", &e))?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, "User not found")
        })?;

    // 角色或密码可能已变化
    evict_user_session(request, user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user,
        "User information updated successfully",
    )))
}

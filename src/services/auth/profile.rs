use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::AuthService;
use super::register::issue_verification_token;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::UpdateProfileRequest, responses::ProfileUpdateResponse},
    users::requests::UpdateUserRequest,
};
use crate::services::access::{Outcome, current_user, error_response, evict_user_session};
use crate::services::users::checks::{
    check_email, check_password, check_profile_fields, ensure_email_available, hash_or_internal,
    normalize_email, user_write_error,
};

/// 修改自己的资料，角色与状态不在此处修改
pub async fn handle_update_profile(
    service: &AuthService,
    update_request: UpdateProfileRequest,
    request: &HttpRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let email = match update_request.email {
        Some(email) => {
            let email = normalize_email(&email);
            check_email(&email)?;
            ensure_email_available(&storage, &email, Some(user.id)).await?;
            Some(email)
        }
        None => None,
    };
    let email_changed = email.as_deref().is_some_and(|email| email != user.email);

    check_profile_fields(
        update_request.display_name.as_deref(),
        update_request.avatar_url.as_deref(),
    )?;

    let password = match update_request.password {
        Some(password) => {
            check_password(&password)?;
            Some(hash_or_internal(&password)?)
        }
        None => None,
    };

    let updated = storage
        .update_user(
            user.id,
            UpdateUserRequest {
                email,
                password,
                role: None,
                display_name: update_request.display_name,
                avatar_url: update_request.avatar_url,
            },
        )
        .await
        .map_err(|e| user_write_error("Failed to update profile", &e))?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, "User not found")
        })?;

    evict_user_session(request, user.id).await;

    // 新邮箱需重新验证
    let verification_token = if email_changed {
        info!("User {} changed email, verification reset", user.id);
        issue_verification_token(service, &updated)
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ProfileUpdateResponse {
            user: updated,
            verification_token,
        },
        "Profile updated successfully",
    )))
}

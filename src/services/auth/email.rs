use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::models::{ApiResponse, ErrorCode, auth::requests::VerifyEmailRequest};
use crate::services::access::{OrInternal, Outcome, error_response, evict_user_session};
use crate::utils::jwt::{JwtUtils, TokenType};

pub async fn handle_verify_email(
    service: &AuthService,
    verify_request: VerifyEmailRequest,
    request: &HttpRequest,
) -> Outcome {
    let invalid_token = || {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::TokenInvalid,
            "Verification link is invalid or expired",
        )
    };

    let claims = JwtUtils::verify_token_type(verify_request.token.trim(), TokenType::VerifyEmail)
        .map_err(|_| invalid_token())?;
    let user_id = claims.user_id().ok_or_else(invalid_token)?;

    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .or_internal("Failed to verify email")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, "User not found")
        })?;

    // 令牌签发后邮箱已更换
    if claims.stamp.as_deref() != Some(user.email.as_str()) {
        return Err(invalid_token());
    }

    let updated = storage
        .mark_email_verified(user_id)
        .await
        .or_internal("Failed to verify email")?;

    if !updated {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::UserNotFound,
            "User not found",
        ));
    }

    evict_user_session(request, user_id).await;
    info!("User {} verified email", user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Email verified successfully",
    )))
}

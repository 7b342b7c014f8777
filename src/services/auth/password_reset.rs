//! 找回密码：申请时签发 `password_reset` 令牌，确认时校验并设置新密码
//!
//! 令牌绑定签发时密码哈希的盐，密码一旦修改即失效，
//! 因此重置成功后同一令牌不能再次使用。

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{info, warn};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        requests::{PasswordResetConfirmRequest, PasswordResetRequest},
        responses::PasswordResetRequestResponse,
    },
    users::requests::UpdateUserRequest,
};
use crate::services::access::{OrInternal, Outcome, error_response, evict_user_session};
use crate::services::users::checks::{check_password, hash_or_internal, normalize_email};
use crate::utils::jwt::{JwtUtils, TokenType};
use crate::utils::password::password_stamp;

/// 无论邮箱是否存在都返回 200，避免枚举账号
pub async fn handle_request_reset(
    service: &AuthService,
    reset_request: PasswordResetRequest,
    request: &HttpRequest,
) -> Outcome {
    let storage = service.get_storage(request)?;
    let email = normalize_email(&reset_request.email);

    let user = storage
        .get_user_by_email(&email)
        .await
        .or_internal("Failed to request password reset")?
        .filter(|user| user.is_active());

    let reset_token = match user {
        Some(user) => {
            match JwtUtils::generate_action_token(
                user.id,
                &user.role.to_string(),
                TokenType::PasswordReset,
                password_stamp(&user.password_hash).as_deref(),
            ) {
                Ok(token) => {
                    info!("Password reset token issued for user {}", user.id);
                    Some(token)
                }
                Err(e) => {
                    warn!("Failed to issue reset token for user {}: {}", user.id, e);
                    None
                }
            }
        }
        None => None,
    };

    // 令牌只在开发环境回显，其余环境交给邮件服务
    let reset_token = reset_token.filter(|_| service.get_config().is_development());

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PasswordResetRequestResponse { reset_token },
        "If the email is registered, a reset link has been sent",
    )))
}

pub async fn handle_confirm_reset(
    service: &AuthService,
    confirm_request: PasswordResetConfirmRequest,
    request: &HttpRequest,
) -> Outcome {
    let invalid_token = || {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::TokenInvalid,
            "Reset link is invalid or expired",
        )
    };

    let claims =
        JwtUtils::verify_token_type(confirm_request.token.trim(), TokenType::PasswordReset)
            .map_err(|_| invalid_token())?;
    let user_id = claims.user_id().ok_or_else(invalid_token)?;

    check_password(&confirm_request.new_password)?;

    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .or_internal("Failed to reset password")?
        .ok_or_else(invalid_token)?;

    if !user.is_active() {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::AccountDisabled,
            "Account is disabled",
        ));
    }

    if claims.stamp != password_stamp(&user.password_hash) {
        return Err(invalid_token());
    }

    let password_hash = hash_or_internal(&confirm_request.new_password)?;
    storage
        .update_user(
            user_id,
            UpdateUserRequest {
                password: Some(password_hash),
                ..Default::default()
            },
        )
        .await
        .or_internal("Failed to reset password")?;

    evict_user_session(request, user_id).await;
    info!("User {} reset password", user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Password has been reset, please login again",
    )))
}

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{info, warn};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::responses::{RefreshTokenResponse, TokenVerificationResponse},
};
use crate::services::access::{OrInternal, Outcome, current_user, error_response};
use crate::utils::jwt::JwtUtils;

/// 401 并清除 refresh cookie
fn reject_refresh(code: ErrorCode, message: &str) -> HttpResponse {
    let status = if code == ErrorCode::AccountDisabled {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::UNAUTHORIZED
    };
    HttpResponse::build(status)
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(code, message))
}

pub async fn handle_refresh_token(service: &AuthService, request: &HttpRequest) -> Outcome {
    let config = service.get_config();

    let refresh_token = JwtUtils::extract_refresh_token_from_cookie(request).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )
    })?;

    let claims = JwtUtils::verify_refresh_token(&refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        reject_refresh(
            ErrorCode::TokenInvalid,
            "Login expired or invalid, please login again",
        )
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        reject_refresh(
            ErrorCode::TokenInvalid,
            "Login expired or invalid, please login again",
        )
    })?;

    // 用户可能已被删除或停用
    let storage = service.get_storage(request)?;
    let user = storage
        .get_user_by_id(user_id)
        .await
        .or_internal("Failed to refresh token")?
        .ok_or_else(|| {
            reject_refresh(
                ErrorCode::TokenInvalid,
                "Login expired or invalid, please login again",
            )
        })?;

    if !user.is_active() {
        warn!("Disabled user {} attempted to refresh token", user.id);
        return Err(reject_refresh(ErrorCode::AccountDisabled, "Account is disabled"));
    }

    let access_token =
        JwtUtils::generate_access_token(user.id, &user.role.to_string()).map_err(|e| {
            tracing::error!("Failed to generate access token: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Unable to refresh token",
            )
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RefreshTokenResponse {
            access_token,
            expires_in: config.jwt.access_token_expiry * 60,
        },
        "Token refreshed successfully",
    )))
}

pub fn handle_logout() -> Outcome {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out successfully")))
}

pub fn handle_verify_token() -> Outcome {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub fn handle_get_current_user(request: &HttpRequest) -> Outcome {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user,
        "User information retrieved successfully",
    )))
}

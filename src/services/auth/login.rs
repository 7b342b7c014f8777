use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{error, info, warn};

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::access::{OrInternal, Outcome, error_response};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

/// 用户不存在与密码错误返回同样的信息
fn auth_failed() -> HttpResponse {
    error_response(
        StatusCode::UNAUTHORIZED,
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    )
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> Outcome {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    // 1. 用户名或邮箱均可登录
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
        .or_internal("Login failed")?
        .ok_or_else(auth_failed)?;

    // 2. 校验密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for user {}", user.username);
        return Err(auth_failed());
    }

    // 3. 账号状态
    if !user.is_active() {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::AccountDisabled,
            "Account is disabled",
        ));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 4. 签发令牌，记住我时延长 refresh token 有效期
    let refresh_expiry = chrono::Duration::days(if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    });

    let token_pair = user.generate_token_pair(Some(refresh_expiry)).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Login failed, unable to generate token",
        )
    })?;

    info!("User {} logged in successfully", user.username);

    let now = chrono::Utc::now();
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        user: crate::models::users::entities::User {
            last_login: Some(now),
            ..user
        },
        created_at: now,
    };

    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_expiry);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}

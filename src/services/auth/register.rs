use actix_web::{HttpRequest, HttpResponse};
use tracing::{debug, info, warn};

use super::AuthService;
use crate::models::{
    ApiResponse,
    auth::{requests::RegisterRequest, responses::RegisterResponse},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::services::access::Outcome;
use crate::services::users::checks::{
    check_email, check_password, check_profile_fields, check_username, ensure_email_available,
    ensure_username_available, hash_or_internal, normalize_email, user_write_error,
};
use crate::utils::jwt::{JwtUtils, TokenType};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> Outcome {
    let username = register_request.username.trim().to_string();
    let email = normalize_email(&register_request.email);

    check_username(&username)?;
    check_email(&email)?;
    check_password(&register_request.password)?;
    check_profile_fields(register_request.display_name.as_deref(), None)?;

    let storage = service.get_storage(request)?;
    ensure_username_available(&storage, &username).await?;
    ensure_email_available(&storage, &email, None).await?;

    let password_hash = hash_or_internal(&register_request.password)?;

    // 自助注册一律为学生
    let user = storage
        .create_user(CreateUserRequest {
            username,
            email,
            password: password_hash,
            role: UserRole::Student,
            display_name: register_request.display_name,
            avatar_url: None,
        })
        .await
        .map_err(|e| user_write_error("Registration failed", &e))?;

    info!("User {} registered", user.username);

    let verification_token = issue_verification_token(service, &user);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        RegisterResponse {
            user,
            verification_token,
        },
        "Registration successful",
    )))
}

/// 签发邮箱验证令牌
///
/// 验证邮件由邮件服务投递，只有开发环境把令牌放进响应。
pub(super) fn issue_verification_token(service: &AuthService, user: &User) -> Option<String> {
    let token = match JwtUtils::generate_action_token(
        user.id,
        &user.role.to_string(),
        TokenType::VerifyEmail,
        Some(&user.email),
    ) {
        Ok(token) => token,
        Err(e) => {
            warn!("Failed to issue verification token for user {}: {}", user.id, e);
            return None;
        }
    };
    debug!("Issued email verification token for user {}", user.id);
    Some(token).filter(|_| service.get_config().is_development())
}

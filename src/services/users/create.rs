use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::UserService;
use super::checks::{
    check_email, check_password, check_profile_fields, check_username, ensure_email_available,
    ensure_username_available, hash_or_internal, normalize_email, user_write_error,
};
use crate::models::{ApiResponse, users::requests::CreateUserRequest};
use crate::services::access::Outcome;

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> Outcome {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = normalize_email(&user_data.email);

    check_username(&user_data.username)?;
    check_email(&user_data.email)?;
    check_password(&user_data.password)?;
    check_profile_fields(
        user_data.display_name.as_deref(),
        user_data.avatar_url.as_deref(),
    )?;

    let storage = service.get_storage(request)?;
    ensure_username_available(&storage, &user_data.username).await?;
    ensure_email_available(&storage, &user_data.email, None).await?;

    user_data.password = hash_or_internal(&user_data.password)?;

    let user = storage
        .create_user(user_data)
        .await
        .map_err(|e| user_write_error("User creation failed", &e))?;

    info!("User {} ({}) created by admin", user.username, user.role);
    Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created successfully")))
}

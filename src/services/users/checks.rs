//! 用户字段校验，注册、管理员建号与个人资料修改共用

use actix_web::{HttpResponse, http::StatusCode};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::services::access::{OrInternal, error_response, internal_error};
use crate::storage::Storage;
use crate::models::ErrorCode;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_avatar_url, validate_display_name, validate_email, validate_password,
    validate_username,
};

/// 邮箱统一去空白并转小写
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub(crate) fn check_username(username: &str) -> Result<(), HttpResponse> {
    validate_username(username)
        .map_err(|msg| error_response(StatusCode::BAD_REQUEST, ErrorCode::UserNameInvalid, msg))
}

pub(crate) fn check_email(email: &str) -> Result<(), HttpResponse> {
    validate_email(email)
        .map_err(|msg| error_response(StatusCode::BAD_REQUEST, ErrorCode::UserEmailInvalid, msg))
}

pub(crate) fn check_password(password: &str) -> Result<(), HttpResponse> {
    validate_password(password).map_err(|msg| {
        error_response(StatusCode::BAD_REQUEST, ErrorCode::UserPasswordInvalid, msg)
    })
}

pub(crate) fn check_profile_fields(
    display_name: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<(), HttpResponse> {
    if let Some(name) = display_name {
        validate_display_name(name)
            .map_err(|msg| error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg))?;
    }
    if let Some(url) = avatar_url {
        validate_avatar_url(url)
            .map_err(|msg| error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg))?;
    }
    Ok(())
}

pub(crate) async fn ensure_username_available(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    let existing = storage
        .get_user_by_username(username)
        .await
        .or_internal("Failed to check username")?;
    match existing {
        Some(_) => Err(error_response(
            StatusCode::CONFLICT,
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        )),
        None => Ok(()),
    }
}

/// `owner` 为当前持有该邮箱也无妨的用户（修改资料时为自己）
pub(crate) async fn ensure_email_available(
    storage: &Arc<dyn Storage>,
    email: &str,
    owner: Option<i64>,
) -> Result<(), HttpResponse> {
    let existing = storage
        .get_user_by_email(email)
        .await
        .or_internal("Failed to check email")?;
    match existing {
        Some(user) if Some(user.id) != owner => Err(error_response(
            StatusCode::CONFLICT,
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        )),
        _ => Ok(()),
    }
}

pub(crate) fn hash_or_internal(password: &str) -> Result<String, HttpResponse> {
    hash_password(password).map_err(|e| internal_error("Password hashing failed", &e))
}

/// 并发注册时唯一索引兜底
pub(crate) fn user_write_error(context: &str, err: &PortalError) -> HttpResponse {
    if err.is_conflict() {
        error_response(
            StatusCode::CONFLICT,
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
        )
    } else {
        internal_error(context, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_field_checks_map_to_error_codes() {
        assert!(check_username("alice").is_ok());
        assert_eq!(
            check_username("al").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
        assert!(check_email("not-an-email").is_err());
        assert!(check_password("weak").is_err());
        assert!(check_profile_fields(Some("Alice"), Some("https://a.example/x.png")).is_ok());
        assert!(check_profile_fields(None, Some("ftp://a.example/x.png")).is_err());
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = PortalError::database_operation("UNIQUE constraint failed: users.email");
        assert_eq!(
            user_write_error("create", &err).status(),
            StatusCode::CONFLICT
        );
        let err = PortalError::database_operation("disk I/O error");
        assert_eq!(
            user_write_error("create", &err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

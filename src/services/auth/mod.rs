pub mod email;
pub mod login;
pub mod oidc;
pub mod password_reset;
pub mod profile;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::access::{respond, storage_from_request};
use crate::config::AppConfig;
use crate::models::auth::requests::{
    LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest,
    UpdateProfileRequest, VerifyEmailRequest,
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(login::handle_login(self, login_request, request).await)
    }

    // 注册（固定为学生）
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(register::handle_register(self, register_request, request).await)
    }

    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_refresh_token(self, request).await)
    }

    pub async fn logout(&self, _request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_logout())
    }

    pub async fn verify_token(&self, _request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_verify_token())
    }

    pub async fn get_current_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        respond(token::handle_get_current_user(request))
    }

    pub async fn update_profile(
        &self,
        update_request: UpdateProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(profile::handle_update_profile(self, update_request, request).await)
    }

    pub async fn verify_email(
        &self,
        verify_request: VerifyEmailRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(email::handle_verify_email(self, verify_request, request).await)
    }

    pub async fn request_password_reset(
        &self,
        reset_request: PasswordResetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(password_reset::handle_request_reset(self, reset_request, request).await)
    }

    pub async fn confirm_password_reset(
        &self,
        confirm_request: PasswordResetConfirmRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        respond(password_reset::handle_confirm_reset(self, confirm_request, request).await)
    }

    pub async fn oidc_config(&self) -> ActixResult<HttpResponse> {
        respond(oidc::handle_oidc_config(self))
    }
}

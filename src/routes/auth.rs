use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{
    LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest,
    UpdateProfileRequest, VerifyEmailRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn register(
    req: HttpRequest,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn verify_email(
    req: HttpRequest,
    body: web::Json<VerifyEmailRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify_email(body.into_inner(), &req).await
}

pub async fn request_password_reset(
    req: HttpRequest,
    body: web::Json<PasswordResetRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.request_password_reset(body.into_inner(), &req).await
}

pub async fn confirm_password_reset(
    req: HttpRequest,
    body: web::Json<PasswordResetConfirmRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.confirm_password_reset(body.into_inner(), &req).await
}

pub async fn oidc_config() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.oidc_config().await
}

pub async fn verify_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify_token(&request).await
}

pub async fn get_current_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_current_user(&request).await
}

pub async fn update_profile(
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.update_profile(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/register")
                    .wrap(RateLimit::register())
                    .route(web::post().to(register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .route("/logout", web::post().to(logout))
            .route("/verify-email", web::post().to(verify_email))
            .service(
                web::resource("/password-reset/request")
                    .wrap(RateLimit::password_reset())
                    .route(web::post().to(request_password_reset)),
            )
            .service(
                web::resource("/password-reset/confirm")
                    .wrap(RateLimit::password_reset())
                    .route(web::post().to(confirm_password_reset)),
            )
            .route("/oidc-config", web::get().to(oidc_config))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/verify-token", web::get().to(verify_token))
                    .route("/me", web::get().to(get_current_user))
                    .route("/me", web::put().to(update_profile)),
            ),
    );
}

/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，并把当前用户放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses));
 *
 * async fn list_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let user = RequireJWT::extract_user_claims(&req);
 *     // ...
 * }
 * ```
 *
 * 用户信息按 `user:{id}` 缓存。停用、改密码等操作会清除该缓存，
 * 所以下一次请求一定会重新读库并检查账号状态。
 */

use crate::cache::{CacheResult, ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因
#[derive(Debug)]
enum Rejection {
    Unauthorized(&'static str),
    Disabled,
    Internal(&'static str),
}

impl Rejection {
    fn into_response(self) -> actix_web::HttpResponse {
        match self {
            Rejection::Unauthorized(msg) => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                &format!("Unauthorized: {msg}"),
            ),
            Rejection::Disabled => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::AccountDisabled,
                "Unauthorized: account is disabled",
            ),
            Rejection::Internal(msg) => create_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                msg,
            ),
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<User, Rejection> {
    let token = bearer_token(req).ok_or(Rejection::Unauthorized(
        "missing or invalid Authorization header",
    ))?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("Access token validation failed: {}", err);
        Rejection::Unauthorized("invalid or expired token")
    })?;

    let user_id = claims
        .user_id()
        .ok_or(Rejection::Unauthorized("invalid subject in token"))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(Rejection::Internal("Cache is not configured"))?;

    let key = user_cache_key(user_id);
    if let CacheResult::Found(json) = cache.get_raw(&key).await {
        match serde_json::from_str::<User>(&json) {
            Ok(user) if user.is_active() => return Ok(user),
            Ok(_) => return Err(Rejection::Disabled),
            Err(_) => cache.remove(&key).await,
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(Rejection::Internal("Storage is not configured"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user {} for authentication: {}", user_id, e);
            Rejection::Internal("Failed to load user")
        })?
        .ok_or(Rejection::Unauthorized("user not found"))?;

    if !user.is_active() {
        return Err(Rejection::Disabled);
    }

    if let Ok(user_json) = serde_json::to_string(&user) {
        cache
            .insert_raw(key, user_json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(rejection) => {
                    info!(
                        "JWT authentication failed for request to {}: {:?}",
                        req.path(),
                        rejection
                    );
                    Ok(req.into_response(rejection.into_response().map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前用户，仅在 RequireJWT 之后可用
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }
}

/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一个键在 `window_secs` 内最多 `max_requests` 次，
 * 超出返回 429。键由前缀加上用户 ID（已认证时）或客户端 IP 组成。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 计数窗口
#[derive(Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// 全局计数表，条目一小时未访问即淘汰
static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 重置密码申请：3 次/5 分钟
    pub fn password_reset() -> Self {
        Self::new(3, 300).with_prefix("password_reset")
    }

    /// 邀请码加入课程：10 次/分钟，防止枚举
    pub fn join_course() -> Self {
        Self::new(10, 60).with_prefix("join_course")
    }

    fn cache_key(&self, identifier: &str) -> String {
        if self.key_prefix.is_empty() {
            identifier.to_string()
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }
}

/// 返回新的窗口；超过限制时返回 None
fn advance(
    window: Option<Window>,
    now: Instant,
    max_requests: u32,
    window_secs: u64,
) -> Option<Window> {
    let current = match window {
        Some(w) if now.duration_since(w.started) < Duration::from_secs(window_secs) => w,
        _ => Window {
            started: now,
            count: 0,
        },
    };

    if current.count >= max_requests {
        return None;
    }
    Some(Window {
        count: current.count + 1,
        ..current
    })
}

/// 客户端 IP，优先取连接信息，其次是代理头
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let identifier = RequireJWT::extract_user_id(req.request())
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = limit.cache_key(&identifier);

            let previous = RATE_LIMIT_CACHE.get(&cache_key).await;
            match advance(previous, Instant::now(), limit.max_requests, limit.window_secs) {
                Some(window) => {
                    RATE_LIMIT_CACHE.insert(cache_key, window).await;
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                None => {
                    warn!(
                        "Rate limit exceeded for key: {} (limit {}/{}s)",
                        cache_key, limit.max_requests, limit.window_secs
                    );
                    Ok(req.into_response(
                        create_rate_limit_response(limit.window_secs).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

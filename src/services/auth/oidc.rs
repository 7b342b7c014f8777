use actix_web::HttpResponse;

use super::AuthService;
use crate::models::{ApiResponse, auth::responses::OidcConfigResponse};
use crate::services::access::Outcome;

/// 前端 OIDC 客户端配置，身份提供方本身不在本服务内
pub fn handle_oidc_config(service: &AuthService) -> Outcome {
    let response = OidcConfigResponse::from(&service.get_config().oidc);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "OIDC configuration retrieved successfully",
    )))
}

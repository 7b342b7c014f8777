use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 登录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 注册响应
//
// `verification_token` 仅在开发环境返回，其余环境由邮件服务投递
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct RegisterResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

// 修改资料响应；换了邮箱时附带新的验证令牌（同样仅开发环境）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct ProfileUpdateResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
}

// 重置密码申请响应，无论邮箱是否存在都返回相同结构
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct PasswordResetRequestResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

// 前端 OIDC 客户端配置
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct OidcConfigResponse {
    pub enabled: bool,
    pub issuer: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub post_logout_redirect_uri: String,
    pub scope: String,
    pub response_type: String,
}

impl From<&crate::config::OidcConfig> for OidcConfigResponse {
    fn from(config: &crate::config::OidcConfig) -> Self {
        Self {
            enabled: config.enabled,
            issuer: config.issuer.clone(),
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            post_logout_redirect_uri: config.post_logout_redirect_uri.clone(),
            scope: config.scope.clone(),
            response_type: "code".to_string(),
        }
    }
}

use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    /// 密码
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 注册请求，角色固定为 student
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

// 更新个人资料，不允许修改角色与状态
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/auth.ts")]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

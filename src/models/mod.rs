//! 数据模型定义
//!
//! 业务实体、请求与响应结构，与 `entity` 中的数据库实体分离。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
///
/// 0 表示成功；按模块分段：通用 1xxx、认证 2xxx、用户 3xxx、课程 4xxx、作业 5xxx、提交 6xxx。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    AccountDisabled = 2001,
    RegisterFailed = 2002,
    TokenInvalid = 2003,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserNameAlreadyExists = 3005,
    UserEmailAlreadyExists = 3006,
    UserUpdateFailed = 3007,
    CanNotDisableCurrentUser = 3008,

    // 课程
    CourseNotFound = 4000,
    CoursePermissionDenied = 4001,
    CourseArchived = 4002,
    CourseInviteCodeInvalid = 4003,
    CourseAlreadyJoined = 4004,
    CourseMemberNotFound = 4005,
    CourseOwnerImmutable = 4006,
    CourseInvalid = 4007,

    // 作业
    AssignmentNotFound = 5000,
    AssignmentInvalid = 5001,
    AssignmentFrozen = 5002,
    AssignmentClosed = 5003,
    AssignmentHasSubmissions = 5004,

    // 提交
    SubmissionNotFound = 6000,
    SubmissionAlreadyExists = 6001,
    SubmissionAlreadyGraded = 6002,
    SubmissionInvalid = 6003,
    GradeInvalid = 6004,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AuthFailed as i32, 2000);
        assert_eq!(ErrorCode::CourseArchived as i32, 4002);
        assert_eq!(ErrorCode::SubmissionAlreadyGraded as i32, 6002);
    }

    #[test]
    fn test_envelope_shape() {
        let resp = ApiResponse::<()>::error_empty(ErrorCode::AssignmentFrozen, "frozen");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 5002);
        assert_eq!(json["message"], "frozen");
        assert!(json.get("data").is_none());
        assert!(json.get("timestamp").is_some());
    }
}

use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, CourseRole};
use crate::models::PaginatedResponse;

/// 课程详情，附带当前用户在课程中的角色
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct CourseDetailResponse {
    pub course: Course,
    pub my_role: Option<CourseRole>,
}

pub type CourseListResponse = PaginatedResponse<Course>;

/// 成员列表项（包含用户基本信息）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct CourseMemberInfo {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: CourseRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

pub type CourseMemberListResponse = PaginatedResponse<CourseMemberInfo>;

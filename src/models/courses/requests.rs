use serde::Deserialize;
use ts_rs::TS;

use super::entities::CourseRole;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_from_str;

/// 课程列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub owner_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub include_archived: Option<bool>,
    pub search: Option<String>,
}

/// 课程列表查询（存储层）
///
/// `member_id` 为空表示不按成员过滤（管理员视角）。
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub owner_id: Option<i64>,
    pub member_id: Option<i64>,
    pub include_archived: bool,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    /// 仅管理员可指定，教师创建时忽略
    pub owner_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct JoinCourseRequest {
    pub invite_code: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct AddCourseMemberRequest {
    pub user_id: i64,
    pub role: CourseRole,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct UpdateCourseMemberRequest {
    pub role: CourseRole,
}

/// 成员列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct CourseMemberListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<CourseRole>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseMemberListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<CourseRole>,
    pub search: Option<String>,
}

impl From<CourseMemberListParams> for CourseMemberListQuery {
    fn from(params: CourseMemberListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            role: params.role,
            search: params.search,
        }
    }
}

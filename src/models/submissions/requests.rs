use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmissionStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_from_str;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub author_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

/// 提交列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub author_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

impl From<SubmissionListParams> for SubmissionListQuery {
    fn from(params: SubmissionListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            author_id: params.author_id,
            status: params.status,
        }
    }
}

/// 新提交（存储层），尝试序号由存储层在事务内分配
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub author_id: i64,
    pub content: String,
    pub is_late: bool,
    pub allow_resubmission: bool,
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

/// 作业列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<AssignmentListParams> for AssignmentListQuery {
    fn from(params: AssignmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub max_score: Option<f64>,
    pub due_at: Option<DateTime<Utc>>,
    pub allow_late: Option<bool>,
    pub allow_resubmission: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub max_score: Option<f64>,
    pub due_at: Option<DateTime<Utc>>,
    pub allow_late: Option<bool>,
    pub allow_resubmission: Option<bool>,
}

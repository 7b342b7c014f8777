use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assignments::entities::Assignment;

/// 提交状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    Late,
    Graded,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Late => write!(f, "late"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "late" => Ok(SubmissionStatus::Late),
            "graded" => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 提交记录，评分信息内联
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub author_id: i64,
    pub attempt: i32,
    pub content: String,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }
}

/// 提交被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    CourseArchived,
    AssignmentClosed,
    AlreadyGraded,
    ResubmissionNotAllowed,
}

/// 允许提交时的落库参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPlan {
    pub is_late: bool,
}

impl SubmitPlan {
    pub fn status(&self) -> SubmissionStatus {
        if self.is_late {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        }
    }
}

/// 按顺序检查：课程归档、截止时间、已有提交
///
/// `any_graded` 表示该作者任一次尝试已被评分，不只看最新一次。
pub fn evaluate_submission(
    course_archived: bool,
    assignment: &Assignment,
    latest: Option<&Submission>,
    any_graded: bool,
    now: DateTime<Utc>,
) -> Result<SubmitPlan, SubmitRejection> {
    if course_archived {
        return Err(SubmitRejection::CourseArchived);
    }

    let is_late = assignment.is_past_due(now);
    if is_late && !assignment.allow_late {
        return Err(SubmitRejection::AssignmentClosed);
    }

    if any_graded || latest.is_some_and(Submission::is_graded) {
        return Err(SubmitRejection::AlreadyGraded);
    }

    if latest.is_some() && !assignment.allow_resubmission {
        return Err(SubmitRejection::ResubmissionNotAllowed);
    }

    Ok(SubmitPlan { is_late })
}

/// 撤回规则：已评分不可撤回；作者仅能在截止前撤回，管理员不受截止限制
pub fn can_withdraw(
    submission: &Submission,
    assignment: &Assignment,
    is_author: bool,
    is_admin: bool,
    now: DateTime<Utc>,
) -> bool {
    if submission.is_graded() {
        return false;
    }
    if is_admin {
        return true;
    }
    is_author && !assignment.is_past_due(now)
}

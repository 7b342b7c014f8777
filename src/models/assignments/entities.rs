use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未指定时的默认满分
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

/// 作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub due_at: Option<DateTime<Utc>>,
    pub allow_late: bool,
    pub allow_resubmission: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// 截止时间已过（无截止时间则永不过期）
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at.is_some_and(|due| now > due)
    }

    /// 过了截止时间的作业不可再修改
    pub fn is_frozen(&self, now: DateTime<Utc>) -> bool {
        self.is_past_due(now)
    }

    /// 分数是否在 [0, max_score] 内
    pub fn accepts_score(&self, score: f64) -> bool {
        score.is_finite() && score >= 0.0 && score <= self.max_score
    }
}

/// 满分必须为正数
pub fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if max_score.is_finite() && max_score > 0.0 {
        Ok(())
    } else {
        Err("max_score must be greater than 0")
    }
}

#[cfg(test)]
pub(crate) fn sample_assignment(due_at: Option<DateTime<Utc>>) -> Assignment {
    let now = Utc::now();
    Assignment {
        id: 1,
        course_id: 1,
        created_by: 1,
        title: "Homework 1".into(),
        description: None,
        max_score: DEFAULT_MAX_SCORE,
        due_at,
        allow_late: false,
        allow_resubmission: true,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_past_due() {
        let now = Utc::now();
        assert!(!sample_assignment(None).is_past_due(now));
        assert!(!sample_assignment(Some(now + TimeDelta::hours(1))).is_past_due(now));
        assert!(sample_assignment(Some(now - TimeDelta::seconds(1))).is_past_due(now));
        assert!(sample_assignment(Some(now - TimeDelta::days(1))).is_frozen(now));
    }

    #[test]
    fn test_score_bounds() {
        let a = sample_assignment(None);
        assert!(a.accepts_score(0.0));
        assert!(a.accepts_score(100.0));
        assert!(!a.accepts_score(-0.5));
        assert!(!a.accepts_score(100.5));
        assert!(!a.accepts_score(f64::NAN));
    }

    #[test]
    fn test_max_score_validation() {
        assert!(validate_max_score(10.0).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-1.0).is_err());
        assert!(validate_max_score(f64::INFINITY).is_err());
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 课程状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "generated/course.ts")]
pub enum CourseStatus {
    Active,
    Archived,
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseStatus::Active => write!(f, "active"),
            CourseStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CourseStatus::Active),
            "archived" => Ok(CourseStatus::Archived),
            _ => Err(format!("Invalid course status: {s}")),
        }
    }
}

/// 课程内角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "generated/course.ts")]
pub enum CourseRole {
    Student,
    Assistant,
    Instructor,
}

impl CourseRole {
    /// 可管理课程信息、成员与作业
    pub fn can_manage(&self) -> bool {
        matches!(self, CourseRole::Instructor)
    }

    /// 可查看全部提交并评分
    pub fn can_grade(&self) -> bool {
        matches!(self, CourseRole::Instructor | CourseRole::Assistant)
    }

    /// 可提交作业
    pub fn can_submit(&self) -> bool {
        matches!(self, CourseRole::Student)
    }
}

impl std::fmt::Display for CourseRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseRole::Student => write!(f, "student"),
            CourseRole::Assistant => write!(f, "assistant"),
            CourseRole::Instructor => write!(f, "instructor"),
        }
    }
}

impl std::str::FromStr for CourseRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(CourseRole::Student),
            "assistant" => Ok(CourseRole::Assistant),
            "instructor" => Ok(CourseRole::Instructor),
            _ => Err(format!("Invalid course role: {s}")),
        }
    }
}

/// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 仅对课程教师与管理员可见
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
    pub status: CourseStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn is_archived(&self) -> bool {
        self.status == CourseStatus::Archived
    }

    pub fn without_invite_code(mut self) -> Self {
        self.invite_code = None;
        self
    }
}

/// 课程成员
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "generated/course.ts")]
pub struct CourseMember {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub role: CourseRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_role_capabilities() {
        assert!(CourseRole::Instructor.can_manage());
        assert!(!CourseRole::Assistant.can_manage());
        assert!(CourseRole::Assistant.can_grade());
        assert!(!CourseRole::Student.can_grade());
        assert!(CourseRole::Student.can_submit());
        assert!(!CourseRole::Instructor.can_submit());
    }

    #[test]
    fn test_invite_code_redaction() {
        let now = chrono::Utc::now();
        let course = Course {
            id: 1,
            owner_id: 2,
            title: "Compilers".into(),
            description: None,
            invite_code: Some("ABCD2345".into()),
            status: CourseStatus::Active,
            created_at: now,
            updated_at: now,
        };
        assert!(!course.is_archived());
        let json = serde_json::to_value(course.without_invite_code()).unwrap();
        assert!(json.get("invite_code").is_none());
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in [
            CourseRole::Student,
            CourseRole::Assistant,
            CourseRole::Instructor,
        ] {
            assert_eq!(role.to_string().parse::<CourseRole>().unwrap(), role);
        }
        assert!("teacher".parse::<CourseRole>().is_err());
    }
}

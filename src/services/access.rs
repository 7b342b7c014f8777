//! 服务层公共工具：取出共享状态、当前用户，以及课程内的权限判断
//!
//! 处理函数内部返回 [`Outcome`]，错误分支直接是要发给客户端的响应，
//! 这样可以用 `?` 串联各项检查，最后由 [`respond`] 交给 actix。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::Assignment,
    courses::entities::{Course, CourseMember, CourseRole},
    submissions::entities::Submission,
    users::entities::User,
};
use crate::storage::Storage;

pub(crate) type Outcome = Result<HttpResponse, HttpResponse>;

pub(crate) fn respond(outcome: Outcome) -> ActixResult<HttpResponse> {
    Ok(outcome.unwrap_or_else(|response| response))
}

pub(crate) fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

/// 记录日志并返回 500，不把内部细节暴露给客户端
pub(crate) fn internal_error(context: &str, err: &PortalError) -> HttpResponse {
    error!("{}: {}", context, err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalServerError,
        format!("{context}, please try again later"),
    )
}

pub(crate) trait OrInternal<T> {
    fn or_internal(self, context: &str) -> Result<T, HttpResponse>;
}

impl<T> OrInternal<T> for crate::errors::Result<T> {
    fn or_internal(self, context: &str) -> Result<T, HttpResponse> {
        self.map_err(|e| internal_error(context, &e))
    }
}

pub(crate) fn storage_from_request(
    request: &HttpRequest,
) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Storage is not configured",
            )
        })
}

pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 清除用户的登录缓存
pub(crate) async fn evict_user_session(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = cache_from_request(request) {
        crate::cache::evict_user(cache.as_ref(), user_id).await;
    }
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )
    })
}

pub(crate) async fn load_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    storage
        .get_course_by_id(course_id)
        .await
        .or_internal("Failed to load course")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::CourseNotFound, "Course not found")
        })
}

pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Result<Assignment, HttpResponse> {
    storage
        .get_assignment_by_id(assignment_id)
        .await
        .or_internal("Failed to load assignment")?
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )
        })
}

pub(crate) async fn load_submission(
    storage: &Arc<dyn Storage>,
    submission_id: i64,
) -> Result<Submission, HttpResponse> {
    storage
        .get_submission_by_id(submission_id)
        .await
        .or_internal("Failed to load submission")?
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )
        })
}

/// 当前用户与某门课程的关系
#[derive(Debug, Clone)]
pub(crate) struct CourseAccess {
    pub course: Course,
    pub member: Option<CourseMember>,
    pub user_id: i64,
    pub is_admin: bool,
}

impl CourseAccess {
    pub fn role(&self) -> Option<CourseRole> {
        self.member.as_ref().map(|m| m.role)
    }

    pub fn is_owner(&self) -> bool {
        self.course.owner_id == self.user_id
    }

    /// 编辑课程、管理成员和作业
    pub fn can_manage(&self) -> bool {
        self.is_admin || self.role().is_some_and(|r| r.can_manage())
    }

    /// 查看全部提交并评分
    pub fn can_grade(&self) -> bool {
        self.is_admin || self.role().is_some_and(|r| r.can_grade())
    }

    pub fn can_submit(&self) -> bool {
        self.role().is_some_and(|r| r.can_submit())
    }

    pub fn require_manage(&self) -> Result<(), HttpResponse> {
        if self.can_manage() {
            Ok(())
        } else {
            Err(permission_denied("Only course instructors can perform this action"))
        }
    }

    pub fn require_grade(&self) -> Result<(), HttpResponse> {
        if self.can_grade() {
            Ok(())
        } else {
            Err(permission_denied("Only course staff can perform this action"))
        }
    }

    pub fn require_active(&self) -> Result<(), HttpResponse> {
        if self.course.is_archived() {
            Err(error_response(
                StatusCode::CONFLICT,
                ErrorCode::CourseArchived,
                "Course is archived",
            ))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn permission_denied(message: &str) -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, ErrorCode::CoursePermissionDenied, message)
}

/// 非成员且非管理员时返回 403
pub(crate) async fn course_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    course: Course,
) -> Result<CourseAccess, HttpResponse> {
    let member = storage
        .get_course_member(course.id, user.id)
        .await
        .or_internal("Failed to load course membership")?;

    if member.is_none() && !user.is_admin() {
        return Err(permission_denied("You are not a member of this course"));
    }

    Ok(CourseAccess {
        course,
        member,
        user_id: user.id,
        is_admin: user.is_admin(),
    })
}

/// 按课程 ID 加载课程并检查访问权限
pub(crate) async fn course_access_by_id(
    storage: &Arc<dyn Storage>,
    user: &User,
    course_id: i64,
) -> Result<CourseAccess, HttpResponse> {
    let course = load_course(storage, course_id).await?;
    course_access(storage, user, course).await
}

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{entities::CourseRole, requests::JoinCourseRequest},
};
use crate::services::access::{
    OrInternal, Outcome, current_user, error_response, internal_error,
};

/// 邀请码不区分大小写，统一转为大写后查找
pub(crate) fn normalize_invite_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub async fn join_course(
    service: &CourseService,
    request: &HttpRequest,
    join_data: JoinCourseRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let code = normalize_invite_code(&join_data.invite_code);
    if code.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CourseInviteCodeInvalid,
            "Invite code must not be empty",
        ));
    }

    let course = storage
        .get_course_by_code(&code)
        .await
        .or_internal("Failed to look up invite code")?
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CourseInviteCodeInvalid,
                "Invite code is invalid",
            )
        })?;

    if course.is_archived() {
        return Err(error_response(
            StatusCode::CONFLICT,
            ErrorCode::CourseArchived,
            "Course is archived",
        ));
    }

    let already_joined = storage
        .get_course_member(course.id, user.id)
        .await
        .or_internal("Failed to load course membership")?
        .is_some();
    if already_joined {
        return Err(already_joined_response());
    }

    let member = match storage
        .add_course_member(course.id, user.id, CourseRole::Student)
        .await
    {
        Ok(member) => member,
        // 并发加入时由唯一索引兜底
        Err(e) if e.is_conflict() => return Err(already_joined_response()),
        Err(e) => return Err(internal_error("Failed to join course", &e)),
    };

    info!("User {} joined course {}", user.id, course.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(member, "Joined course successfully")))
}

pub(super) fn already_joined_response() -> HttpResponse {
    error_response(
        StatusCode::CONFLICT,
        ErrorCode::CourseAlreadyJoined,
        "User is already a member of this course",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_normalization() {
        assert_eq!(normalize_invite_code("  abcd2345 "), "ABCD2345");
        assert_eq!(normalize_invite_code("XYZ"), "XYZ");
        assert_eq!(normalize_invite_code("   "), "");
    }
}

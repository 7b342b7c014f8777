//! 课程成员管理

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::CourseService;
use super::join::already_joined_response;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{
        entities::CourseRole,
        requests::{AddCourseMemberRequest, CourseMemberListParams, UpdateCourseMemberRequest},
    },
};
use crate::services::access::{
    CourseAccess, OrInternal, Outcome, course_access_by_id, current_user, error_response,
    internal_error,
};

pub async fn list_members(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    query: CourseMemberListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    course_access_by_id(&storage, &user, course_id).await?;

    let members = storage
        .list_course_members_with_pagination(course_id, query.into())
        .await
        .or_internal("Failed to retrieve course members")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        members,
        "Course members retrieved successfully",
    )))
}

pub async fn add_member(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    member_data: AddCourseMemberRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    access.require_manage()?;
    access.require_active()?;

    let target = storage
        .get_user_by_id(member_data.user_id)
        .await
        .or_internal("Failed to load user")?
        .ok_or_else(|| {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, "User not found")
        })?;

    if !target.is_active() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CourseInvalid,
            "Disabled users cannot be added to a course",
        ));
    }
    if member_data.role == CourseRole::Instructor && !target.role.can_own_course() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CourseInvalid,
            "Only teachers or admins can be course instructors",
        ));
    }

    let member = match storage
        .add_course_member(course_id, target.id, member_data.role)
        .await
    {
        Ok(member) => member,
        Err(e) if e.is_conflict() => return Err(already_joined_response()),
        Err(e) => return Err(internal_error("Failed to add course member", &e)),
    };

    info!(
        "User {} added {} to course {} as {}",
        user.id, target.id, course_id, member.role
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        member,
        "Course member added successfully",
    )))
}

pub async fn update_member(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    user_id: i64,
    update_data: UpdateCourseMemberRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    access.require_manage()?;
    access.require_active()?;
    ensure_not_owner(&access, user_id)?;

    if update_data.role == CourseRole::Instructor {
        let target = storage
            .get_user_by_id(user_id)
            .await
            .or_internal("Failed to load user")?;
        if !target.is_some_and(|u| u.role.can_own_course()) {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::CourseInvalid,
                "Only teachers or admins can be course instructors",
            ));
        }
    }

    let member = storage
        .update_course_member_role(course_id, user_id, update_data.role)
        .await
        .or_internal("Failed to update course member")?
        .ok_or_else(member_not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        member,
        "Course member updated successfully",
    )))
}

/// 管理者可移除任意非所有者成员；普通成员只能退出自己
pub async fn remove_member(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    user_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    if user_id != user.id {
        access.require_manage()?;
    }
    ensure_not_owner(&access, user_id)?;

    let removed = storage
        .remove_course_member(course_id, user_id)
        .await
        .or_internal("Failed to remove course member")?;
    if !removed {
        return Err(member_not_found());
    }

    info!("User {} removed {} from course {}", user.id, user_id, course_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Course member removed successfully",
    )))
}

fn ensure_not_owner(access: &CourseAccess, user_id: i64) -> Result<(), HttpResponse> {
    if access.course.owner_id == user_id {
        Err(error_response(
            StatusCode::CONFLICT,
            ErrorCode::CourseOwnerImmutable,
            "The course owner's membership cannot be changed",
        ))
    } else {
        Ok(())
    }
}

fn member_not_found() -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::CourseMemberNotFound,
        "Course member not found",
    )
}

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    OrInternal, Outcome, course_access_by_id, current_user, error_response, load_assignment,
    load_submission, permission_denied,
};

pub async fn get_my_latest_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(&storage, assignment_id).await?;
    course_access_by_id(&storage, &user, assignment.course_id).await?;

    let submission = storage
        .get_latest_submission(assignment_id, user.id)
        .await
        .or_internal("Failed to load submission")?
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::SubmissionNotFound,
                "You have not submitted this assignment yet",
            )
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Latest submission retrieved successfully",
    )))
}

/// 作者本人、课程教师助教或管理员可查看
pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = load_submission(&storage, submission_id).await?;
    if submission.author_id != user.id {
        let assignment = load_assignment(&storage, submission.assignment_id).await?;
        let access = course_access_by_id(&storage, &user, assignment.course_id).await?;
        if !access.can_grade() {
            return Err(permission_denied(
                "You do not have permission to view this submission",
            ));
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission retrieved successfully",
    )))
}

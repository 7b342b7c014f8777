use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode, submissions::entities::can_withdraw};
use crate::services::access::{
    Outcome, current_user, error_response, internal_error, load_assignment, load_submission,
    permission_denied,
};

pub async fn delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = load_submission(&storage, submission_id).await?;
    let assignment = load_assignment(&storage, submission.assignment_id).await?;

    let is_author = submission.author_id == user.id;
    if !is_author && !user.is_admin() {
        return Err(permission_denied(
            "You do not have permission to withdraw this submission",
        ));
    }
    if submission.is_graded() {
        return Err(already_graded());
    }
    if !can_withdraw(&submission, &assignment, is_author, user.is_admin(), Utc::now()) {
        return Err(error_response(
            StatusCode::CONFLICT,
            ErrorCode::AssignmentClosed,
            "Submissions can only be withdrawn before the due date",
        ));
    }

    match storage.delete_submission(submission_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            ));
        }
        Err(e) if e.is_conflict() => return Err(already_graded()),
        Err(e) => return Err(internal_error("Failed to withdraw submission", &e)),
    }

    info!("Submission {} withdrawn by user {}", submission_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Submission withdrawn successfully",
    )))
}

fn already_graded() -> HttpResponse {
    error_response(
        StatusCode::CONFLICT,
        ErrorCode::SubmissionAlreadyGraded,
        "Graded submissions cannot be withdrawn",
    )
}

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode, submissions::requests::GradeSubmissionRequest};
use crate::services::access::{
    Outcome, course_access_by_id, current_user, error_response, internal_error,
    load_assignment, load_submission,
};
use crate::utils::validate::validate_feedback;

/// 评分是终态：存储层只更新未评分的记录
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    grade_data: GradeSubmissionRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = load_submission(&storage, submission_id).await?;
    let assignment = load_assignment(&storage, submission.assignment_id).await?;
    let access = course_access_by_id(&storage, &user, assignment.course_id).await?;
    access.require_grade()?;

    if !assignment.accepts_score(grade_data.score) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::GradeInvalid,
            format!("Score must be between 0 and {}", assignment.max_score),
        ));
    }
    if let Some(ref feedback) = grade_data.feedback {
        validate_feedback(feedback).map_err(|msg| {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::GradeInvalid, msg)
        })?;
    }
    if submission.is_graded() {
        return Err(already_graded());
    }

    let graded = match storage
        .grade_submission(submission_id, user.id, grade_data.score, grade_data.feedback)
        .await
    {
        Ok(Some(graded)) => graded,
        Ok(None) => {
            return Err(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            ));
        }
        Err(e) if e.is_conflict() => return Err(already_graded()),
        Err(e) => return Err(internal_error("Failed to grade submission", &e)),
    };

    info!(
        "Submission {} graded {} by user {}",
        submission_id, grade_data.score, user.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        graded,
        "Submission graded successfully",
    )))
}

fn already_graded() -> HttpResponse {
    error_response(
        StatusCode::CONFLICT,
        ErrorCode::SubmissionAlreadyGraded,
        "Submission has already been graded",
    )
}

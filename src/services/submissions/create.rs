use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{
        entities::{SubmitRejection, evaluate_submission},
        requests::{CreateSubmissionRequest, NewSubmission},
    },
};
use crate::services::access::{
    OrInternal, Outcome, course_access_by_id, current_user, error_response, internal_error,
    load_assignment, permission_denied,
};
use crate::utils::validate::validate_submission_content;

pub(crate) fn rejection_response(rejection: SubmitRejection) -> HttpResponse {
    let (code, message) = match rejection {
        SubmitRejection::CourseArchived => (ErrorCode::CourseArchived, "Course is archived"),
        SubmitRejection::AssignmentClosed => (
            ErrorCode::AssignmentClosed,
            "Assignment is past due and does not accept late submissions",
        ),
        SubmitRejection::AlreadyGraded => (
            ErrorCode::SubmissionAlreadyGraded,
            "Your submission has already been graded",
        ),
        SubmitRejection::ResubmissionNotAllowed => (
            ErrorCode::SubmissionAlreadyExists,
            "Assignment does not allow resubmission",
        ),
    };
    error_response(StatusCode::CONFLICT, code, message)
}

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_data: CreateSubmissionRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    validate_submission_content(&submission_data.content).map_err(|msg| {
        error_response(StatusCode::BAD_REQUEST, ErrorCode::SubmissionInvalid, msg)
    })?;

    let assignment = load_assignment(&storage, assignment_id).await?;
    let access = course_access_by_id(&storage, &user, assignment.course_id).await?;
    if !access.can_submit() {
        return Err(permission_denied(
            "Only students enrolled in the course can submit",
        ));
    }

    let latest = storage
        .get_latest_submission(assignment_id, user.id)
        .await
        .or_internal("Failed to load previous submission")?;
    let any_graded = storage
        .has_graded_submission(assignment_id, user.id)
        .await
        .or_internal("Failed to load previous submission")?;

    let plan = evaluate_submission(
        access.course.is_archived(),
        &assignment,
        latest.as_ref(),
        any_graded,
        Utc::now(),
    )
    .map_err(rejection_response)?;

    let new_submission = NewSubmission {
        assignment_id,
        author_id: user.id,
        content: submission_data.content,
        is_late: plan.is_late,
        allow_resubmission: assignment.allow_resubmission,
    };

    let submission = match storage.create_submission(new_submission).await {
        Ok(submission) => submission,
        // 并发提交或期间被评分
        Err(e) if e.is_conflict() => {
            return Err(error_response(
                StatusCode::CONFLICT,
                ErrorCode::SubmissionAlreadyExists,
                "Submission conflicts with a concurrent attempt, please retry",
            ));
        }
        Err(e) => return Err(internal_error("Submission failed", &e)),
    };

    info!(
        "User {} submitted attempt {} for assignment {}",
        user.id, submission.attempt, assignment_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        submission,
        "Submission created successfully",
    )))
}

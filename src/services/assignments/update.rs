use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use chrono::Utc;

use super::AssignmentService;
use super::checks::{check_due_at, check_max_score, check_title};
use crate::models::{ApiResponse, ErrorCode, assignments::requests::UpdateAssignmentRequest};
use crate::services::access::{
    OrInternal, Outcome, course_access_by_id, current_user, error_response, load_assignment,
};

/// 截止时间一过作业即冻结，管理员也不例外
pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    mut update_data: UpdateAssignmentRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(&storage, assignment_id).await?;
    let access = course_access_by_id(&storage, &user, assignment.course_id).await?;
    access.require_manage()?;
    access.require_active()?;

    let now = Utc::now();
    if assignment.is_frozen(now) {
        return Err(error_response(
            StatusCode::CONFLICT,
            ErrorCode::AssignmentFrozen,
            "Assignment is past due and can no longer be modified",
        ));
    }

    if let Some(title) = update_data.title.take() {
        update_data.title = Some(check_title(&title)?);
    }
    check_max_score(update_data.max_score)?;
    check_due_at(update_data.due_at, now)?;

    let updated = storage
        .update_assignment(assignment_id, update_data)
        .await
        .or_internal("Failed to update assignment")?
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Assignment updated successfully",
    )))
}

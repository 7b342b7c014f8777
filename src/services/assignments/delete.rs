use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::info;

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    Outcome, course_access_by_id, current_user, error_response, internal_error, load_assignment,
};

/// 已有提交的作业不可删除
pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(&storage, assignment_id).await?;
    let access = course_access_by_id(&storage, &user, assignment.course_id).await?;
    access.require_manage()?;
    access.require_active()?;

    let deleted = match storage.delete_assignment(assignment_id).await {
        Ok(deleted) => deleted,
        Err(e) if e.is_conflict() => {
            return Err(error_response(
                StatusCode::CONFLICT,
                ErrorCode::AssignmentHasSubmissions,
                "Assignment already has submissions and cannot be deleted",
            ));
        }
        Err(e) => return Err(internal_error("Failed to delete assignment", &e)),
    };
    if !deleted {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ));
    }

    info!("Assignment {} deleted by user {}", assignment_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "Assignment deleted successfully",
    )))
}

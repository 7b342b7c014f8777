use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;
use tracing::info;

use super::AssignmentService;
use super::checks::{check_due_at, check_max_score, check_title};
use crate::models::{ApiResponse, assignments::requests::CreateAssignmentRequest};
use crate::services::access::{OrInternal, Outcome, course_access_by_id, current_user};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    course_id: i64,
    mut assignment_data: CreateAssignmentRequest,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    access.require_manage()?;
    access.require_active()?;

    assignment_data.title = check_title(&assignment_data.title)?;
    check_max_score(assignment_data.max_score)?;
    check_due_at(assignment_data.due_at, Utc::now())?;

    let assignment = storage
        .create_assignment(course_id, user.id, assignment_data)
        .await
        .or_internal("Assignment creation failed")?;

    info!(
        "Assignment {} created in course {} by user {}",
        assignment.id, course_id, user.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        assignment,
        "Assignment created successfully",
    )))
}

use actix_web::{HttpRequest, HttpResponse};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::services::access::{Outcome, course_access_by_id, current_user, load_assignment};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(&storage, assignment_id).await?;
    course_access_by_id(&storage, &user, assignment.course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        assignment,
        "Assignment information retrieved successfully",
    )))
}

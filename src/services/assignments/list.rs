use actix_web::{HttpRequest, HttpResponse};

use super::AssignmentService;
use crate::models::{ApiResponse, assignments::requests::AssignmentListParams};
use crate::services::access::{OrInternal, Outcome, course_access_by_id, current_user};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    course_id: i64,
    query: AssignmentListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    course_access_by_id(&storage, &user, course_id).await?;

    let assignments = storage
        .list_assignments_with_pagination(course_id, query.into())
        .await
        .or_internal("Failed to retrieve assignment list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        assignments,
        "Assignment list retrieved successfully",
    )))
}

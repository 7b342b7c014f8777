use actix_web::{HttpRequest, HttpResponse};

use super::SubmissionService;
use crate::models::{
    ApiResponse,
    submissions::requests::{SubmissionListParams, SubmissionListQuery},
};
use crate::services::access::{
    OrInternal, Outcome, course_access_by_id, current_user, load_assignment,
};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    query: SubmissionListParams,
) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let assignment = load_assignment(&storage, assignment_id).await?;
    let access = course_access_by_id(&storage, &user, assignment.course_id).await?;

    let mut list_query: SubmissionListQuery = query.into();
    // 非助教成员只能看到自己的提交
    if !access.can_grade() {
        list_query.author_id = Some(user.id);
    }

    let submissions = storage
        .list_submissions_with_pagination(assignment_id, list_query)
        .await
        .or_internal("Failed to retrieve submission list")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submissions,
        "Submission list retrieved successfully",
    )))
}

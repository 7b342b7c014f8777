use actix_web::{HttpRequest, HttpResponse};

use super::CourseService;
use crate::models::{ApiResponse, courses::responses::CourseDetailResponse};
use crate::services::access::{Outcome, course_access_by_id, current_user};

pub async fn get_course(service: &CourseService, request: &HttpRequest, course_id: i64) -> Outcome {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let access = course_access_by_id(&storage, &user, course_id).await?;
    let my_role = access.role();
    let course = if access.can_manage() {
        access.course
    } else {
        access.course.without_invite_code()
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse { course, my_role },
        "Course information retrieved successfully",
    )))
}

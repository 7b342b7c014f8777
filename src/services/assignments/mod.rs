pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::access::{respond, storage_from_request};
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_assignments(self, request, course_id, query).await)
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        assignment_data: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_assignment(self, request, course_id, assignment_data).await)
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(get::get_assignment(self, request, assignment_id).await)
    }

    // 截止后的作业不可修改
    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_assignment(self, request, assignment_id, update_data).await)
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(delete::delete_assignment(self, request, assignment_id).await)
    }
}

/// 标题、满分与截止时间的公共校验
pub(crate) mod checks {
    use actix_web::{HttpResponse, http::StatusCode};
    use chrono::{DateTime, Utc};

    use crate::models::{ErrorCode, assignments::entities::validate_max_score};
    use crate::services::access::error_response;
    use crate::utils::validate::validate_title;

    fn invalid(message: &str) -> HttpResponse {
        error_response(StatusCode::BAD_REQUEST, ErrorCode::AssignmentInvalid, message)
    }

    pub fn check_title(title: &str) -> Result<String, HttpResponse> {
        let title = title.trim();
        validate_title(title).map_err(invalid)?;
        Ok(title.to_string())
    }

    pub fn check_max_score(max_score: Option<f64>) -> Result<(), HttpResponse> {
        match max_score {
            Some(score) => validate_max_score(score).map_err(invalid),
            None => Ok(()),
        }
    }

    pub fn check_due_at(due_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), HttpResponse> {
        match due_at {
            Some(due) if due <= now => Err(invalid("due_at must be in the future")),
            _ => Ok(()),
        }
    }

}

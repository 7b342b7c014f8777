pub mod create;
pub mod delete;
pub mod detail;
pub mod grade;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::access::{respond, storage_from_request};
use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListParams,
};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    /// 创建提交
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_data: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_submission(self, request, assignment_id, submission_data).await)
    }

    /// 列出提交，学生只能看到自己的
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_submissions(self, request, assignment_id, query).await)
    }

    /// 获取当前用户的最新提交
    pub async fn get_my_latest_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(detail::get_my_latest_submission(self, request, assignment_id).await)
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(detail::get_submission(self, request, submission_id).await)
    }

    /// 评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        grade_data: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        respond(grade::grade_submission(self, request, submission_id, grade_data).await)
    }

    /// 撤回提交
    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(delete::delete_submission(self, request, submission_id).await)
    }
}

pub mod archive;
pub mod create;
pub mod get;
pub mod join;
pub mod list;
pub mod members;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::access::{respond, storage_from_request};
use crate::models::courses::requests::{
    AddCourseMemberRequest, CourseListParams, CourseMemberListParams, CreateCourseRequest,
    JoinCourseRequest, UpdateCourseMemberRequest, UpdateCourseRequest,
};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    // 课程列表：管理员看到全部，其余用户只看到已加入的课程
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        respond(list::list_courses(self, request, query).await)
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        course_data: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        respond(create::create_course(self, request, course_data).await)
    }

    pub async fn get_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(get::get_course(self, request, course_id).await)
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        update_data: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        respond(update::update_course(self, request, course_id, update_data).await)
    }

    // 归档 / 取消归档
    pub async fn set_archived(
        &self,
        request: &HttpRequest,
        course_id: i64,
        archived: bool,
    ) -> ActixResult<HttpResponse> {
        respond(archive::set_archived(self, request, course_id, archived).await)
    }

    // 通过邀请码加入课程
    pub async fn join_course(
        &self,
        request: &HttpRequest,
        join_data: JoinCourseRequest,
    ) -> ActixResult<HttpResponse> {
        respond(join::join_course(self, request, join_data).await)
    }

    pub async fn list_members(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: CourseMemberListParams,
    ) -> ActixResult<HttpResponse> {
        respond(members::list_members(self, request, course_id, query).await)
    }

    pub async fn add_member(
        &self,
        request: &HttpRequest,
        course_id: i64,
        member_data: AddCourseMemberRequest,
    ) -> ActixResult<HttpResponse> {
        respond(members::add_member(self, request, course_id, member_data).await)
    }

    pub async fn update_member(
        &self,
        request: &HttpRequest,
        course_id: i64,
        user_id: i64,
        update_data: UpdateCourseMemberRequest,
    ) -> ActixResult<HttpResponse> {
        respond(members::update_member(self, request, course_id, user_id, update_data).await)
    }

    // 移除成员，学生可以自行退出
    pub async fn remove_member(
        &self,
        request: &HttpRequest,
        course_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        respond(members::remove_member(self, request, course_id, user_id).await)
    }
}

use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    courses::{
        entities::{Course, CourseMember, CourseRole},
        requests::{CourseListQuery, CourseMemberListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseListResponse, CourseMemberListResponse},
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息（password 字段为已哈希的密码）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 启用 / 停用用户
    async fn set_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>>;
    // 标记邮箱已验证
    async fn mark_email_verified(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    // 创建课程，同一事务内将所有者登记为 instructor
    async fn create_course(&self, owner_id: i64, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 通过邀请码获取课程
    async fn get_course_by_code(&self, invite_code: &str) -> Result<Option<Course>>;
    // 列出课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 更新课程信息
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 归档 / 取消归档
    async fn set_course_archived(&self, course_id: i64, archived: bool) -> Result<Option<Course>>;

    /// 课程成员管理方法
    async fn add_course_member(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseRole,
    ) -> Result<CourseMember>;
    async fn get_course_member(&self, course_id: i64, user_id: i64)
    -> Result<Option<CourseMember>>;
    async fn update_course_member_role(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseRole,
    ) -> Result<Option<CourseMember>>;
    async fn remove_course_member(&self, course_id: i64, user_id: i64) -> Result<bool>;
    async fn list_course_members_with_pagination(
        &self,
        course_id: i64,
        query: CourseMemberListQuery,
    ) -> Result<CourseMemberListResponse>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        course_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        course_id: i64,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 删除作业，已有提交返回 Conflict
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交管理方法
    // 创建提交，尝试序号 = 已有最大序号 + 1
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取某用户对某作业的最新一次提交
    async fn get_latest_submission(
        &self,
        assignment_id: i64,
        author_id: i64,
    ) -> Result<Option<Submission>>;
    // 是否已有任一次尝试被评分
    async fn has_graded_submission(&self, assignment_id: i64, author_id: i64) -> Result<bool>;
    async fn list_submissions_with_pagination(
        &self,
        assignment_id: i64,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 评分，仅当提交尚未评分时生效，已评分返回 Conflict
    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;
    // 撤回未评分的提交，已评分返回 Conflict
    async fn delete_submission(&self, submission_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

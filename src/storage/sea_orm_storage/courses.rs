//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::course_members::{
    ActiveModel as CourseMemberActiveModel, Column as CourseMemberColumn,
    Entity as CourseMembers,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Course, CourseRole, CourseStatus},
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::{contains_pattern, random_code::generate_random_code};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 邀请码长度
const INVITE_CODE_LENGTH: usize = 8;
/// 邀请码碰撞时的最大重试次数
const INVITE_CODE_ATTEMPTS: usize = 5;

impl SeaOrmStorage {
    /// 创建课程，并在同一事务内登记所有者为 instructor
    pub async fn create_course_impl(
        &self,
        owner_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let invite_code = self.unused_invite_code().await?;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let course = ActiveModel {
            owner_id: Set(owner_id),
            title: Set(req.title),
            description: Set(req.description),
            invite_code: Set(invite_code),
            status: Set(CourseStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("创建课程失败: {e}")))?;

        CourseMemberActiveModel {
            course_id: Set(course.id),
            user_id: Set(owner_id),
            role: Set(CourseRole::Instructor.to_string()),
            joined_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| PortalError::database_operation(format!("登记课程教师失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(course.into_course())
    }

    /// 生成未被占用的邀请码
    async fn unused_invite_code(&self) -> Result<String> {
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let code = generate_random_code(INVITE_CODE_LENGTH);
            if self.get_course_by_code_impl(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(PortalError::conflict("无法生成唯一的课程邀请码"))
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过邀请码获取课程
    pub async fn get_course_by_code_impl(&self, invite_code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::InviteCode.eq(invite_code))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Courses::find();

        // 仅成员可见的课程
        if let Some(member_id) = query.member_id {
            select = select.filter(
                Column::Id.in_subquery(
                    Query::select()
                        .column(CourseMemberColumn::CourseId)
                        .from(CourseMembers)
                        .and_where(CourseMemberColumn::UserId.eq(member_id))
                        .to_owned(),
                ),
            );
        }

        // 所有者筛选
        if let Some(owner_id) = query.owner_id {
            select = select.filter(Column::OwnerId.eq(owner_id));
        }

        if !query.include_archived {
            select = select.filter(Column::Status.eq(CourseStatus::Active.to_string()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(pattern.clone()))
                    .add(Column::Description.like(pattern)),
            );
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(course_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(course_id).await
    }

    /// 归档 / 取消归档课程
    pub async fn set_course_archived_impl(
        &self,
        course_id: i64,
        archived: bool,
    ) -> Result<Option<Course>> {
        let status = if archived {
            CourseStatus::Archived
        } else {
            CourseStatus::Active
        };

        let result = Courses::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新课程状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_course_by_id_impl(course_id).await
    }
}

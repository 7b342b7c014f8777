//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, DEFAULT_MAX_SCORE},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            max_score: Set(req.max_score.unwrap_or(DEFAULT_MAX_SCORE)),
            due_at: Set(req.due_at.map(|d| d.timestamp())),
            allow_late: Set(req.allow_late.unwrap_or(false)),
            allow_resubmission: Set(req.allow_resubmission.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出课程下的作业
    pub async fn list_assignments_with_pagination_impl(
        &self,
        course_id: i64,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Assignments::find().filter(Column::CourseId.eq(course_id));

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(Column::Title.like(pattern));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业页数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(assignment_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(due_at) = update.due_at {
            model.due_at = Set(Some(due_at.timestamp()));
        }
        if let Some(allow_late) = update.allow_late {
            model.allow_late = Set(allow_late);
        }
        if let Some(allow_resubmission) = update.allow_resubmission {
            model.allow_resubmission = Set(allow_resubmission);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    /// 删除作业，已有提交时返回 Conflict
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        // 单条语句内判断是否已有提交，避免检查与删除之间插入新提交
        let with_submissions = Query::select()
            .column(SubmissionColumn::AssignmentId)
            .from(Submissions)
            .and_where(SubmissionColumn::AssignmentId.eq(assignment_id))
            .to_owned();

        let result = Assignments::delete_many()
            .filter(Column::Id.eq(assignment_id))
            .filter(Column::Id.not_in_subquery(with_submissions))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除作业失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_assignment_by_id_impl(assignment_id).await? {
                Some(_) => Err(PortalError::conflict("作业已有提交，不能删除")),
                None => Ok(false),
            };
        }

        Ok(true)
    }
}

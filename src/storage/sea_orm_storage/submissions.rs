//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 事务内读取最新一次提交并分配 `attempt = max + 1`；
    /// 任一次尝试已评分则拒绝。
    /// 唯一索引 (assignment_id, author_id, attempt) 兜底并发写入。
    pub async fn create_submission_impl(&self, new: NewSubmission) -> Result<Submission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        if has_graded_attempt(&txn, new.assignment_id, new.author_id).await? {
            return Err(PortalError::conflict("该作业已评分，不能再次提交"));
        }

        let latest = latest_submission(&txn, new.assignment_id, new.author_id).await?;

        let attempt = match latest {
            Some(_) if !new.allow_resubmission => {
                return Err(PortalError::conflict("该作业不允许重复提交"));
            }
            Some(previous) => previous.attempt + 1,
            None => 1,
        };

        let status = if new.is_late {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        };

        let model = ActiveModel {
            assignment_id: Set(new.assignment_id),
            author_id: Set(new.author_id),
            attempt: Set(attempt),
            content: Set(new.content),
            status: Set(status.to_string()),
            is_late: Set(new.is_late),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取某用户对某作业的最新提交
    pub async fn get_latest_submission_impl(
        &self,
        assignment_id: i64,
        author_id: i64,
    ) -> Result<Option<Submission>> {
        let result = latest_submission(&self.db, assignment_id, author_id).await?;
        Ok(result.map(|m| m.into_submission()))
    }

    /// 某用户对某作业是否已有被评分的尝试
    pub async fn has_graded_submission_impl(
        &self,
        assignment_id: i64,
        author_id: i64,
    ) -> Result<bool> {
        has_graded_attempt(&self.db, assignment_id, author_id).await
    }

    /// 分页列出作业下的提交
    pub async fn list_submissions_with_pagination_impl(
        &self,
        assignment_id: i64,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Submissions::find().filter(Column::AssignmentId.eq(assignment_id));

        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交页数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(SubmissionListResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 评分：条件更新，只对未评分的提交生效
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::Graded.to_string()))
            .col_expr(Column::Score, Expr::value(score))
            .col_expr(Column::Feedback, Expr::value(feedback))
            .col_expr(Column::GradedBy, Expr::value(grader_id))
            .col_expr(Column::GradedAt, Expr::value(now))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("评分失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_submission_by_id_impl(submission_id).await? {
                Some(_) => Err(PortalError::conflict("该提交已评分")),
                None => Ok(None),
            };
        }

        self.get_submission_by_id_impl(submission_id).await
    }

    /// 撤回提交：条件删除，已评分的提交不可撤回
    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::delete_many()
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("撤回提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_submission_by_id_impl(submission_id).await? {
                Some(_) => Err(PortalError::conflict("已评分的提交不能撤回")),
                None => Ok(false),
            };
        }

        Ok(true)
    }
}

/// 按尝试序号倒序取最新一次提交，可在事务内使用
async fn latest_submission<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    author_id: i64,
) -> Result<Option<crate::entity::submissions::Model>> {
    Submissions::find()
        .filter(Column::AssignmentId.eq(assignment_id))
        .filter(Column::AuthorId.eq(author_id))
        .order_by_desc(Column::Attempt)
        .one(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询最新提交失败: {e}")))
}

async fn has_graded_attempt<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    author_id: i64,
) -> Result<bool> {
    let graded = Submissions::find()
        .filter(Column::AssignmentId.eq(assignment_id))
        .filter(Column::AuthorId.eq(author_id))
        .filter(Column::Status.eq(SubmissionStatus::Graded.to_string()))
        .count(conn)
        .await
        .map_err(|e| PortalError::database_operation(format!("查询评分记录失败: {e}")))?;
    Ok(graded > 0)
}

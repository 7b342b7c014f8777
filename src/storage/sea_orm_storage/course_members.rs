//! 课程成员存储操作

use super::SeaOrmStorage;
use crate::entity::course_members::{ActiveModel, Column, Entity as CourseMembers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{CourseMember, CourseRole},
        requests::CourseMemberListQuery,
        responses::{CourseMemberInfo, CourseMemberListResponse},
    },
};
use crate::utils::contains_pattern;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 添加课程成员，重复加入由唯一索引拒绝
    pub async fn add_course_member_impl(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseRole,
    ) -> Result<CourseMember> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("添加课程成员失败: {e}")))?;

        Ok(result.into_course_member())
    }

    /// 获取用户在课程中的成员信息
    pub async fn get_course_member_impl(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<CourseMember>> {
        let result = CourseMembers::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(result.map(|m| m.into_course_member()))
    }

    /// 修改成员角色
    pub async fn update_course_member_role_impl(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseRole,
    ) -> Result<Option<CourseMember>> {
        let result = CourseMembers::update_many()
            .col_expr(Column::Role, Expr::value(role.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新成员角色失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_course_member_impl(course_id, user_id).await
    }

    /// 移除课程成员
    pub async fn remove_course_member_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let result = CourseMembers::delete_many()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("移除课程成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出课程成员（附带用户信息）
    pub async fn list_course_members_with_pagination_impl(
        &self,
        course_id: i64,
        query: CourseMemberListQuery,
    ) -> Result<CourseMemberListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = CourseMembers::find()
            .find_also_related(Users)
            .filter(Column::CourseId.eq(course_id));

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(UserColumn::Username.like(pattern.clone()))
                    .add(UserColumn::DisplayName.like(pattern)),
            );
        }

        select = select
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成员总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成员页数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询成员列表失败: {e}")))?;

        let items = rows
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?;
                let member = member.into_course_member();
                Some(CourseMemberInfo {
                    user_id: member.user_id,
                    username: user.username,
                    display_name: user.display_name,
                    avatar_url: user.avatar_url,
                    role: member.role,
                    joined_at: member.joined_at,
                })
            })
            .collect();

        Ok(CourseMemberListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}

//! 课程成员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub role: String,
    pub joined_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_member(self) -> crate::models::courses::entities::CourseMember {
        use super::timestamp_to_datetime;
        use crate::models::courses::entities::{CourseMember, CourseRole};

        CourseMember {
            id: self.id,
            course_id: self.course_id,
            user_id: self.user_id,
            role: self.role.parse::<CourseRole>().unwrap_or(CourseRole::Student),
            joined_at: timestamp_to_datetime(self.joined_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 画廊条目：一张生成的图片及其社区/审核状态
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "gallery")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 对象存储中的图片键，创建后不可变
    pub storage_key: String,
    pub style: String,
    #[sea_orm(column_type = "custom(\"LONGTEXT\")")]
    pub prompt: String,
    pub ai_response: Option<String>,
    pub likes: i32,
    pub comment_count: i32,
    pub clicks: i32,
    pub author_name: Option<String>,
    pub author_social_link: Option<String>,
    pub author_email: Option<String>,
    pub is_hidden: bool,
    pub is_highlighted: bool,
    pub custom_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

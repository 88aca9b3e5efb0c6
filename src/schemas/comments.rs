use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::comment;

/// 单条评论
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentItem {
    /// 评论 ID
    #[schema(example = 7)]
    pub id: i32,
    /// 所属画廊条目 ID
    #[schema(example = 42)]
    pub gallery_id: i32,
    /// 评论者昵称
    #[schema(example = "Al")]
    pub user_name: String,
    /// 评论内容
    #[schema(example = "nice")]
    pub text: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentItem {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            gallery_id: model.gallery_id,
            user_name: model.user_name,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

/// 发表评论请求
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCommentRequest {
    /// 评论者昵称
    #[schema(example = "Al")]
    #[validate(length(min = 1, max = 50, message = "昵称长度限制为 1~50"))]
    pub user_name: String,
    /// 评论内容
    #[schema(example = "nice")]
    #[validate(length(min = 1, max = 2000, message = "评论长度限制为 1~2000"))]
    pub text: String,
}

/// 发表评论响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddCommentResponse {
    /// 新评论 ID
    pub id: i32,
    /// 父条目最新评论数
    pub comment_count: i32,
}

fn default_comment_limit() -> u64 {
    100
}

/// 评论列表查询参数
///
/// 热门条目的评论可能非常多，这里提供基于评论 ID 的增量拉取
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CommentListQuery {
    /// 只返回 ID 大于该值的评论；缺省从头开始
    #[serde(default)]
    pub after: Option<i32>,
    /// 返回数量上限
    #[schema(example = 100, default = 100)]
    #[serde(default = "default_comment_limit")]
    pub limit: u64,
}

/// 评论列表响应，按发表顺序（旧到新）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentListResponse {
    pub data: Vec<CommentItem>,
    /// 继续拉取时传入的 after 值；为 None 表示没有更多
    pub next_after: Option<i32>,
}

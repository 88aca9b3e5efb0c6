use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::gallery;

/// 画廊条目响应
///
/// 一张生成图片的完整公开信息，含社区计数与审核状态
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryItem {
    /// 条目 ID
    #[schema(example = 42)]
    pub id: i32,
    /// 对象存储键
    pub storage_key: String,
    /// 图片的可公开访问 URL
    pub image_url: String,
    /// 生成风格
    #[schema(example = "Ghibli")]
    pub style: String,
    /// 用户提交的提示词
    #[schema(example = "a red fox")]
    pub prompt: String,
    /// 生成时的状态消息
    pub ai_response: Option<String>,
    /// 点赞数
    #[schema(example = 7)]
    pub likes: i32,
    /// 评论数
    #[schema(example = 2)]
    pub comment_count: i32,
    /// 点击数
    #[schema(example = 33)]
    pub clicks: i32,
    /// 作者署名
    pub author_name: Option<String>,
    /// 作者社交链接
    pub author_social_link: Option<String>,
    /// 作者邮箱
    pub author_email: Option<String>,
    /// 是否被隐藏（仅审核接口可见为 true 的条目）
    pub is_hidden: bool,
    /// 是否被加精
    pub is_highlighted: bool,
    /// 管理员自定义消息
    pub custom_message: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl GalleryItem {
    /// 由数据库模型和已解析的图片 URL 组装响应
    pub fn from_model(model: gallery::Model, image_url: String) -> Self {
        Self {
            id: model.id,
            storage_key: model.storage_key,
            image_url,
            style: model.style,
            prompt: model.prompt,
            ai_response: model.ai_response,
            likes: model.likes,
            comment_count: model.comment_count,
            clicks: model.clicks,
            author_name: model.author_name,
            author_social_link: model.author_social_link,
            author_email: model.author_email,
            is_hidden: model.is_hidden,
            is_highlighted: model.is_highlighted,
            custom_message: model.custom_message,
            created_at: model.created_at,
        }
    }
}

fn default_page_size() -> u64 {
    24
}

/// 画廊分页查询参数
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct GalleryListQuery {
    /// 分页游标，取上一页响应的 next_cursor；缺省表示第一页
    #[serde(default)]
    pub cursor: Option<String>,
    /// 每页数量
    #[schema(example = 24, default = 24)]
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

/// 画廊分页响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GalleryListResponse {
    /// 当前页条目，按创建时间倒序
    pub data: Vec<GalleryItem>,
    /// 下一页游标；为 None 表示已到末尾
    pub next_cursor: Option<String>,
}

/// 画廊条目总数响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GalleryCountResponse {
    /// 条目总数（含隐藏条目，与原始设计保持一致）
    #[schema(example = 1024)]
    pub total: u64,
}

/// 点赞响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    /// 点赞后的最新计数
    #[schema(example = 8)]
    pub likes: i32,
}

/// 相邻条目查询方向
///
/// next = 更早的条目（创建时间更小），previous = 更新的条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdjacentDirection {
    Next,
    Previous,
}

/// 相邻条目查询参数
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AdjacentQuery {
    /// 查询方向
    pub direction: AdjacentDirection,
}

/// 相邻条目响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdjacentResponse {
    /// 相邻条目；为 None 表示已到边界或当前条目不存在
    pub item: Option<GalleryItem>,
}

/// 可选文本字段的空字符串视为未填写，避免空值触发格式校验
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// 认领作者信息请求
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthorInfoRequest {
    /// 作者署名
    #[schema(example = "Ada")]
    #[validate(length(min = 1, max = 80, message = "作者署名长度限制为 1~80"))]
    pub author_name: String,
    /// 社交链接，可选
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url(message = "社交链接必须是合法 URL"))]
    pub author_social_link: Option<String>,
    /// 邮箱，可选
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "邮箱格式不正确"))]
    pub author_email: Option<String>,
}

fn default_rank_limit() -> u64 {
    100
}

/// 排行榜查询参数
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RankingQuery {
    /// 返回条目数上限
    #[schema(example = 100, default = 100)]
    #[serde(default = "default_rank_limit")]
    pub limit: u64,
}

/// 最新条目查询参数
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RecentQuery {
    /// 返回条目数上限
    #[schema(example = 100, default = 100)]
    #[serde(default = "default_rank_limit")]
    pub limit: u64,
}

/// 隐藏开关响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleHiddenResponse {
    pub success: bool,
    /// 切换后的隐藏状态
    pub is_hidden: bool,
}

/// 加精开关响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleHighlightResponse {
    pub success: bool,
    /// 切换后的加精状态
    pub is_highlighted: bool,
}

/// 设置自定义消息请求
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomMessageRequest {
    /// 消息内容；空字符串表示清除
    #[validate(length(max = 500, message = "自定义消息长度不能超过 500"))]
    pub message: String,
}

/// 通用成功响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    #[schema(example = "操作成功")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn author_claim_treats_blank_optionals_as_absent() {
        let request: AuthorInfoRequest = serde_json::from_str(
            r#"{"author_name": "Ada", "author_social_link": "", "author_email": "  "}"#,
        )
        .unwrap();

        assert_eq!(request.author_social_link, None);
        assert_eq!(request.author_email, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn author_claim_still_validates_filled_optionals() {
        let request: AuthorInfoRequest = serde_json::from_str(
            r#"{"author_name": "Ada", "author_social_link": "not-a-url"}"#,
        )
        .unwrap();

        assert!(request.validate().is_err());
    }
}

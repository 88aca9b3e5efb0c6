use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::sea_query::Expr;

use crate::{
    config::S3Config,
    entities::{comment, gallery, prelude::*},
    errors::{ApiError, ApiResult},
    schemas::gallery::{AdjacentDirection, GalleryItem},
    services::{database::DatabaseConnection, storage::StorageService},
};

/// 单页条目数上限
pub const MAX_PAGE_SIZE: u64 = 100;

/// 分页游标，编码为 `{创建时间微秒}:{id}`
///
/// 两个字段共同构成全序，保证翻页过程中插入新条目不会造成重复或跳项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub created_at: DateTime<Utc>,
    pub id: i32,
}

impl PageCursor {
    pub fn encode(&self) -> String {
        format!("{}:{}", self.created_at.timestamp_micros(), self.id)
    }

    pub fn decode(raw: &str) -> ApiResult<Self> {
        let err = || ApiError::BadRequest("无效的分页游标".to_string());

        let (micros, id) = raw.split_once(':').ok_or_else(err)?;
        let micros: i64 = micros.parse().map_err(|_| err())?;
        let id: i32 = id.parse().map_err(|_| err())?;
        let created_at = Utc.timestamp_micros(micros).single().ok_or_else(err)?;

        Ok(PageCursor { created_at, id })
    }

    fn from_model(model: &gallery::Model) -> Self {
        PageCursor {
            created_at: model.created_at,
            id: model.id,
        }
    }
}

/// 画廊条目服务
pub struct GalleryService;

impl GalleryService {
    /// 插入新生成的画廊条目，社区计数与审核状态从零开始
    pub async fn insert(
        db: &DatabaseConnection,
        storage_key: String,
        style: String,
        prompt: String,
        ai_response: String,
    ) -> ApiResult<gallery::Model> {
        let item = gallery::ActiveModel {
            storage_key: Set(storage_key),
            style: Set(style),
            prompt: Set(prompt),
            ai_response: Set(Some(ai_response)),
            likes: Set(0),
            comment_count: Set(0),
            clicks: Set(0),
            author_name: Set(None),
            author_social_link: Set(None),
            author_email: Set(None),
            is_hidden: Set(false),
            is_highlighted: Set(false),
            custom_message: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = item.insert(db.as_ref()).await?;
        Ok(model)
    }

    /// 按 ID 获取条目
    pub async fn get(db: &DatabaseConnection, id: i32) -> ApiResult<gallery::Model> {
        Gallery::find_by_id(id)
            .one(db.as_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("找不到该图片".to_string()))
    }

    /// 公开分页列表：隐藏条目不出现，按创建时间倒序，ID 倒序兜底
    pub async fn list_page(
        db: &DatabaseConnection,
        cursor: Option<&str>,
        page_size: u64,
    ) -> ApiResult<(Vec<gallery::Model>, Option<String>)> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let mut query = Gallery::find()
            .filter(gallery::Column::IsHidden.eq(false))
            .order_by(gallery::Column::CreatedAt, Order::Desc)
            .order_by(gallery::Column::Id, Order::Desc)
            .limit(page_size + 1);

        if let Some(raw) = cursor {
            let cursor = PageCursor::decode(raw)?;
            query = query.filter(
                Condition::any()
                    .add(gallery::Column::CreatedAt.lt(cursor.created_at))
                    .add(
                        Condition::all()
                            .add(gallery::Column::CreatedAt.eq(cursor.created_at))
                            .add(gallery::Column::Id.lt(cursor.id)),
                    ),
            );
        }

        let mut models = query.all(db.as_ref()).await?;

        let next_cursor = if models.len() as u64 > page_size {
            models.truncate(page_size as usize);
            models.last().map(|m| PageCursor::from_model(m).encode())
        } else {
            None
        };

        Ok((models, next_cursor))
    }

    /// 条目总数，包含隐藏条目
    pub async fn count(db: &DatabaseConnection) -> ApiResult<u64> {
        let total = Gallery::find().count(db.as_ref()).await?;
        Ok(total)
    }

    /// 最新条目，隐藏条目不出现
    pub async fn recent(db: &DatabaseConnection, limit: u64) -> ApiResult<Vec<gallery::Model>> {
        let models = Gallery::find()
            .filter(gallery::Column::IsHidden.eq(false))
            .order_by(gallery::Column::CreatedAt, Order::Desc)
            .order_by(gallery::Column::Id, Order::Desc)
            .limit(limit.clamp(1, MAX_PAGE_SIZE))
            .all(db.as_ref())
            .await?;
        Ok(models)
    }

    /// 点赞排行榜，隐藏条目不出现
    pub async fn rank_by_likes(
        db: &DatabaseConnection,
        limit: u64,
    ) -> ApiResult<Vec<gallery::Model>> {
        let models = Gallery::find()
            .filter(gallery::Column::IsHidden.eq(false))
            .order_by(gallery::Column::Likes, Order::Desc)
            .order_by(gallery::Column::CreatedAt, Order::Desc)
            .order_by(gallery::Column::Id, Order::Desc)
            .limit(limit.clamp(1, MAX_PAGE_SIZE))
            .all(db.as_ref())
            .await?;
        Ok(models)
    }

    /// 评论数排行榜，隐藏条目不出现
    pub async fn rank_by_comments(
        db: &DatabaseConnection,
        limit: u64,
    ) -> ApiResult<Vec<gallery::Model>> {
        let models = Gallery::find()
            .filter(gallery::Column::IsHidden.eq(false))
            .order_by(gallery::Column::CommentCount, Order::Desc)
            .order_by(gallery::Column::CreatedAt, Order::Desc)
            .order_by(gallery::Column::Id, Order::Desc)
            .limit(limit.clamp(1, MAX_PAGE_SIZE))
            .all(db.as_ref())
            .await?;
        Ok(models)
    }

    /// 查找相邻条目
    ///
    /// next 方向是创建时间更早的条目，previous 方向是更新的条目；
    /// 当前条目不存在时返回 None 而不是报错
    pub async fn get_adjacent(
        db: &DatabaseConnection,
        id: i32,
        direction: AdjacentDirection,
    ) -> ApiResult<Option<gallery::Model>> {
        let Some(current) = Gallery::find_by_id(id).one(db.as_ref()).await? else {
            return Ok(None);
        };

        let query = Gallery::find().filter(gallery::Column::IsHidden.eq(false));

        let query = match direction {
            AdjacentDirection::Next => query
                .filter(
                    Condition::any()
                        .add(gallery::Column::CreatedAt.lt(current.created_at))
                        .add(
                            Condition::all()
                                .add(gallery::Column::CreatedAt.eq(current.created_at))
                                .add(gallery::Column::Id.lt(current.id)),
                        ),
                )
                .order_by(gallery::Column::CreatedAt, Order::Desc)
                .order_by(gallery::Column::Id, Order::Desc),
            AdjacentDirection::Previous => query
                .filter(
                    Condition::any()
                        .add(gallery::Column::CreatedAt.gt(current.created_at))
                        .add(
                            Condition::all()
                                .add(gallery::Column::CreatedAt.eq(current.created_at))
                                .add(gallery::Column::Id.gt(current.id)),
                        ),
                )
                .order_by(gallery::Column::CreatedAt, Order::Asc)
                .order_by(gallery::Column::Id, Order::Asc),
        };

        let adjacent = query.one(db.as_ref()).await?;
        Ok(adjacent)
    }

    /// 点赞，数据库端原子自增；条目不存在时报 404
    pub async fn increment_likes(db: &DatabaseConnection, id: i32) -> ApiResult<i32> {
        let result = Gallery::update_many()
            .col_expr(
                gallery::Column::Likes,
                Expr::col(gallery::Column::Likes).add(1),
            )
            .filter(gallery::Column::Id.eq(id))
            .exec(db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(ApiError::NotFound("找不到该图片".to_string()));
        }

        let model = Self::get(db, id).await?;
        Ok(model.likes)
    }

    /// 点击计数，数据库端原子自增
    ///
    /// 条目不存在时静默忽略：点击上报常在条目刚被删除后到达，不值得报错
    pub async fn increment_clicks(db: &DatabaseConnection, id: i32) -> ApiResult<()> {
        let result = Gallery::update_many()
            .col_expr(
                gallery::Column::Clicks,
                Expr::col(gallery::Column::Clicks).add(1),
            )
            .filter(gallery::Column::Id.eq(id))
            .exec(db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            tracing::warn!("点击计数的目标条目不存在: id={}", id);
        }

        Ok(())
    }

    /// 认领作者信息，先到先得：已有署名的条目拒绝再次认领
    pub async fn set_author_info(
        db: &DatabaseConnection,
        id: i32,
        author_name: String,
        author_social_link: Option<String>,
        author_email: Option<String>,
    ) -> ApiResult<gallery::Model> {
        let model = Self::get(db, id).await?;

        if model.author_name.is_some() {
            return Err(ApiError::Conflict("该图片已有作者署名".to_string()));
        }

        let mut item: gallery::ActiveModel = model.into();
        item.author_name = Set(Some(author_name));
        item.author_social_link = Set(normalize_optional(author_social_link));
        item.author_email = Set(normalize_optional(author_email));

        let updated = item.update(db.as_ref()).await?;
        Ok(updated)
    }

    /// 切换隐藏状态，返回切换后的新状态
    pub async fn toggle_hidden(db: &DatabaseConnection, id: i32) -> ApiResult<bool> {
        let model = Self::get(db, id).await?;
        let new_state = !model.is_hidden;

        let mut item: gallery::ActiveModel = model.into();
        item.is_hidden = Set(new_state);
        item.update(db.as_ref()).await?;

        Ok(new_state)
    }

    /// 切换加精状态，返回切换后的新状态
    pub async fn toggle_highlighted(db: &DatabaseConnection, id: i32) -> ApiResult<bool> {
        let model = Self::get(db, id).await?;
        let new_state = !model.is_highlighted;

        let mut item: gallery::ActiveModel = model.into();
        item.is_highlighted = Set(new_state);
        item.update(db.as_ref()).await?;

        Ok(new_state)
    }

    /// 设置管理员自定义消息，空字符串表示清除
    pub async fn set_custom_message(
        db: &DatabaseConnection,
        id: i32,
        message: String,
    ) -> ApiResult<gallery::Model> {
        let model = Self::get(db, id).await?;

        let mut item: gallery::ActiveModel = model.into();
        item.custom_message = Set(normalize_optional(Some(message)));

        let updated = item.update(db.as_ref()).await?;
        Ok(updated)
    }

    /// 删除条目及其附属数据
    ///
    /// 顺序为：对象存储图片 -> 评论 -> 条目本身。存储删除失败会中止整个
    /// 操作，避免留下指向已删图片的悬空记录；后两步失败则可能留下孤儿
    /// 图片文件，由对象存储的生命周期策略兜底
    pub async fn delete(db: &DatabaseConnection, s3_config: &S3Config, id: i32) -> ApiResult<()> {
        let model = Self::get(db, id).await?;

        StorageService::delete_image(s3_config, &model.storage_key).await?;

        Comment::delete_many()
            .filter(comment::Column::GalleryId.eq(id))
            .exec(db.as_ref())
            .await?;

        Gallery::delete_by_id(id).exec(db.as_ref()).await?;

        Ok(())
    }

    /// 把数据库模型转换为响应条目，补全图片 URL
    pub fn to_item(s3_config: &S3Config, model: gallery::Model) -> GalleryItem {
        let image_url = StorageService::public_url(s3_config, &model.storage_key);
        GalleryItem::from_model(model, image_url)
    }

    pub fn to_items(s3_config: &S3Config, models: Vec<gallery::Model>) -> Vec<GalleryItem> {
        models
            .into_iter()
            .map(|m| Self::to_item(s3_config, m))
            .collect()
    }
}

/// 空字符串归一为 None，供可选文本字段复用
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn gallery_model(id: i32, micros: i64) -> gallery::Model {
        gallery::Model {
            id,
            storage_key: format!("gallery/{id}.png"),
            style: "Ghibli".to_string(),
            prompt: "a red fox".to_string(),
            ai_response: Some("Image generated successfully!".to_string()),
            likes: 0,
            comment_count: 0,
            clicks: 0,
            author_name: None,
            author_social_link: None,
            author_email: None,
            is_hidden: false,
            is_highlighted: false,
            custom_message: None,
            created_at: Utc.timestamp_micros(micros).single().unwrap(),
        }
    }

    #[test]
    fn cursor_round_trip() {
        let cursor = PageCursor {
            created_at: Utc.timestamp_micros(1_700_000_000_123_456).single().unwrap(),
            id: 42,
        };
        let encoded = cursor.encode();
        assert_eq!(encoded, "1700000000123456:42");
        assert_eq!(PageCursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn cursor_rejects_garbage() {
        assert!(PageCursor::decode("").is_err());
        assert!(PageCursor::decode("12345").is_err());
        assert!(PageCursor::decode("abc:def").is_err());
        assert!(PageCursor::decode("123:45:6").is_err());
    }

    #[test]
    fn normalize_optional_drops_blank() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("".to_string())), None);
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some("Ada".to_string())),
            Some("Ada".to_string())
        );
    }

    #[tokio::test]
    async fn increment_likes_missing_item_is_not_found() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = GalleryService::increment_likes(&db, 999).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn increment_clicks_missing_item_is_noop() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        assert!(GalleryService::increment_clicks(&db, 999).await.is_ok());
    }

    #[tokio::test]
    async fn increment_likes_returns_fresh_count() {
        let mut liked = gallery_model(7, 1_700_000_000_000_000);
        liked.likes = 8;

        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([vec![liked]])
                .into_connection(),
        );

        assert_eq!(GalleryService::increment_likes(&db, 7).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn author_claim_is_first_write_wins() {
        let mut claimed = gallery_model(3, 1_700_000_000_000_000);
        claimed.author_name = Some("Ada".to_string());

        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![claimed]])
                .into_connection(),
        );

        let result =
            GalleryService::set_author_info(&db, 3, "Grace".to_string(), None, None).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn adjacent_of_missing_item_is_none() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<gallery::Model>::new()])
                .into_connection(),
        );

        let result = GalleryService::get_adjacent(&db, 999, AdjacentDirection::Next)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn adjacent_at_chronological_boundary_is_none() {
        // 当前条目存在，但它已是最旧的一条，next 方向没有邻居
        let oldest = gallery_model(1, 1_700_000_000_000_000);

        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![oldest]])
                .append_query_results([Vec::<gallery::Model>::new()])
                .into_connection(),
        );

        let result = GalleryService::get_adjacent(&db, 1, AdjacentDirection::Next)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn list_page_emits_cursor_only_when_more_rows_exist() {
        let rows: Vec<gallery::Model> = (0..3)
            .map(|i| gallery_model(10 - i, 1_700_000_000_000_000 - i as i64))
            .collect();

        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([rows.clone()])
                .append_query_results([vec![rows[0].clone()]])
                .into_connection(),
        );

        // 请求 2 条，查询返回 3 条，说明还有下一页
        let (page, next) = GalleryService::list_page(&db, None, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        let expected = PageCursor::from_model(&page[1]).encode();
        assert_eq!(next, Some(expected));

        // 查询只返回 1 条，没有下一页
        let (page, next) = GalleryService::list_page(&db, None, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(next, None);
    }
}

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::{
    entities::{comment, gallery, prelude::*},
    errors::{ApiError, ApiResult},
    services::database::DatabaseConnection,
};

/// 单次评论列表查询的条数上限
pub const MAX_COMMENT_LIMIT: u64 = 500;

/// 评论服务
pub struct CommentService;

impl CommentService {
    /// 添加评论
    ///
    /// 评论插入与父条目计数自增在同一事务内完成，父条目不存在时整体回滚，
    /// 保证 comment_count 与实际评论数始终一致
    pub async fn add(
        db: &DatabaseConnection,
        gallery_id: i32,
        user_name: String,
        text: String,
    ) -> ApiResult<(comment::Model, i32)> {
        let txn = db.begin().await?;

        let result = Gallery::update_many()
            .col_expr(
                gallery::Column::CommentCount,
                Expr::col(gallery::Column::CommentCount).add(1),
            )
            .filter(gallery::Column::Id.eq(gallery_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ApiError::NotFound("评论目标图片不存在".to_string()));
        }

        let inserted = comment::ActiveModel {
            gallery_id: Set(gallery_id),
            user_name: Set(user_name),
            text: Set(text),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let parent = Gallery::find_by_id(gallery_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ApiError::NotFound("评论目标图片不存在".to_string()))?;

        txn.commit().await?;

        Ok((inserted, parent.comment_count))
    }

    /// 按条目列出评论，ID 升序（即发表顺序），支持 after 游标增量拉取
    pub async fn list_by_gallery(
        db: &DatabaseConnection,
        gallery_id: i32,
        after: Option<i32>,
        limit: u64,
    ) -> ApiResult<(Vec<comment::Model>, Option<i32>)> {
        let limit = limit.clamp(1, MAX_COMMENT_LIMIT);

        let mut query = Comment::find()
            .filter(comment::Column::GalleryId.eq(gallery_id))
            .order_by(comment::Column::Id, Order::Asc)
            .limit(limit + 1);

        if let Some(after) = after {
            query = query.filter(comment::Column::Id.gt(after));
        }

        let mut comments = query.all(db.as_ref()).await?;

        let next_after = if comments.len() as u64 > limit {
            comments.truncate(limit as usize);
            comments.last().map(|c| c.id)
        } else {
            None
        };

        Ok((comments, next_after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn comment_model(id: i32, gallery_id: i32) -> comment::Model {
        comment::Model {
            id,
            gallery_id,
            user_name: "Ada".to_string(),
            text: "nice fox".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_to_missing_gallery_rolls_back() {
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result =
            CommentService::add(&db, 999, "Ada".to_string(), "hello".to_string()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_emits_next_after_only_when_more_rows_exist() {
        let rows: Vec<comment::Model> = (1..=3).map(|i| comment_model(i, 7)).collect();

        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([rows.clone()])
                .append_query_results([vec![rows[2].clone()]])
                .into_connection(),
        );

        let (page, next) = CommentService::list_by_gallery(&db, 7, None, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(next, Some(2));

        let (page, next) = CommentService::list_by_gallery(&db, 7, Some(2), 2)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(next, None);
    }
}

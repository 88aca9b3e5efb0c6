use anyhow::Result;
use meilisearch_sdk::client::*;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::time::{sleep, Duration};

use sea_orm::EntityTrait;

use crate::entities::prelude::{Comment, Gallery};
use crate::services::database::DatabaseConnection;

/// 提示词命中数上限，评论命中不设此限
const PROMPT_HIT_LIMIT: usize = 20;
const COMMENT_HIT_LIMIT: usize = 1000;

/// Meilisearch 客户端
/// 维护 gallery / comments 两个索引，与数据库定期同步
#[derive(Debug)]
pub struct MeilisearchClient {
    client: Arc<Client>,
}

static MEILISEARCH_INSTANCE: OnceCell<Arc<MeilisearchClient>> = OnceCell::const_new();

#[derive(Debug, Deserialize)]
struct GalleryHit {
    id: i32,
}

#[derive(Debug, Deserialize)]
struct CommentHit {
    #[allow(dead_code)]
    id: i32,
    gallery_id: i32,
}

impl MeilisearchClient {
    /// 初始化 Meilisearch 客户端
    pub async fn init(url: String, api_key: String) -> Result<()> {
        let api_key = if api_key.is_empty() {
            None
        } else {
            Some(api_key)
        };
        let client = Client::new(url, api_key)
            .map_err(|e| anyhow::anyhow!("创建 Meilisearch 客户端失败: {}", e))?;

        let meili_client = Arc::new(MeilisearchClient {
            client: Arc::new(client),
        });

        MEILISEARCH_INSTANCE
            .set(meili_client.clone())
            .map_err(|_| anyhow::anyhow!("设置 Meilisearch 实例失败"))?;

        meili_client.init_indexes().await?;
        tracing::info!("Meilisearch 客户端初始化完成");
        Ok(())
    }

    /// 获取全局实例
    pub fn instance() -> Result<Arc<MeilisearchClient>> {
        MEILISEARCH_INSTANCE
            .get()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Meilisearch 客户端未初始化"))
    }

    /// 初始化索引配置
    ///
    /// gallery 索引只对提示词做全文匹配，is_hidden 用于公开搜索过滤；
    /// comments 索引只对评论正文做全文匹配
    pub async fn init_indexes(&self) -> Result<()> {
        let gallery_index = self.client.index("gallery");
        gallery_index
            .set_searchable_attributes(["prompt"])
            .await
            .map_err(|e| anyhow::anyhow!("设置 gallery 可搜索字段失败: {}", e))?;
        gallery_index
            .set_filterable_attributes(["is_hidden"])
            .await
            .map_err(|e| anyhow::anyhow!("设置 gallery 可过滤字段失败: {}", e))?;

        let comments_index = self.client.index("comments");
        comments_index
            .set_searchable_attributes(["text"])
            .await
            .map_err(|e| anyhow::anyhow!("设置 comments 可搜索字段失败: {}", e))?;

        tracing::info!("Meilisearch 索引配置完成");
        Ok(())
    }

    /// 同步数据库内容到两个搜索索引
    pub async fn sync_search_indexes(&self, db: &DatabaseConnection) -> Result<()> {
        let items = Gallery::find()
            .all(db.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("查询画廊数据失败: {}", e))?;

        let gallery_docs: Vec<_> = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "id": item.id,
                    "prompt": item.prompt,
                    "style": item.style,
                    "is_hidden": item.is_hidden,
                })
            })
            .collect();

        self.client
            .index("gallery")
            .add_documents(&gallery_docs, Some("id"))
            .await
            .map_err(|e| anyhow::anyhow!("同步 gallery 索引失败: {}", e))?;

        let comments = Comment::find()
            .all(db.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("查询评论数据失败: {}", e))?;

        let comment_docs: Vec<_> = comments
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "gallery_id": c.gallery_id,
                    "text": c.text,
                })
            })
            .collect();

        self.client
            .index("comments")
            .add_documents(&comment_docs, Some("id"))
            .await
            .map_err(|e| anyhow::anyhow!("同步 comments 索引失败: {}", e))?;

        tracing::info!(
            "已同步 {} 条画廊记录、{} 条评论到 Meilisearch 索引",
            gallery_docs.len(),
            comment_docs.len()
        );
        Ok(())
    }

    /// 定期同步搜索索引
    pub async fn sync_loop(&self, db: &DatabaseConnection, interval_secs: u64) {
        tracing::info!("开始定期同步搜索索引，间隔: {} 秒", interval_secs);
        loop {
            if let Err(e) = self.sync_search_indexes(db).await {
                tracing::error!("同步搜索索引失败: {}", e);
            }
            sleep(Duration::from_secs(interval_secs)).await;
        }
    }

    /// 按提示词搜索画廊条目，返回命中条目 ID（相关度降序，上限 20）
    ///
    /// only_visible 时在索引端过滤隐藏条目
    pub async fn search_prompt_ids(&self, query: &str, only_visible: bool) -> Result<Vec<i32>> {
        let index = self.client.index("gallery");

        let mut search_request = index.search();
        search_request
            .with_query(query)
            .with_limit(PROMPT_HIT_LIMIT);
        if only_visible {
            search_request.with_filter("is_hidden = false");
        }

        let results = search_request
            .execute::<GalleryHit>()
            .await
            .map_err(|e| anyhow::anyhow!("搜索画廊索引失败: {}", e))?;

        Ok(results.hits.into_iter().map(|h| h.result.id).collect())
    }

    /// 按评论正文搜索，返回命中评论的父条目 ID（保留相关度顺序，可能重复）
    pub async fn search_comment_parent_ids(&self, query: &str) -> Result<Vec<i32>> {
        let index = self.client.index("comments");

        let mut search_request = index.search();
        search_request
            .with_query(query)
            .with_limit(COMMENT_HIT_LIMIT);

        let results = search_request
            .execute::<CommentHit>()
            .await
            .map_err(|e| anyhow::anyhow!("搜索评论索引失败: {}", e))?;

        Ok(results
            .hits
            .into_iter()
            .map(|h| h.result.gallery_id)
            .collect())
    }
}

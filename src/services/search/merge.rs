use std::collections::HashSet;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    entities::{gallery, prelude::Gallery},
    errors::ApiResult,
    services::{database::DatabaseConnection, search::client::MeilisearchClient},
};

/// 搜索变体
///
/// Public 面向站点访客，隐藏条目不出现在结果里；
/// Unrestricted 面向审核后台，包含隐藏条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    Public,
    Unrestricted,
}

/// 双索引搜索服务
///
/// 把提示词命中与评论命中合并为一个画廊条目结果集
pub struct SearchService;

impl SearchService {
    pub async fn search_combined(
        db: &DatabaseConnection,
        query: &str,
        variant: SearchVariant,
    ) -> ApiResult<Vec<gallery::Model>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let client = MeilisearchClient::instance()?;
        let only_visible = variant == SearchVariant::Public;

        let prompt_ids = client.search_prompt_ids(query, only_visible).await?;
        let comment_parent_ids = client.search_comment_parent_ids(query).await?;

        let candidate_ids = merge_candidate_ids(prompt_ids, comment_parent_ids);
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        // 按 ID 回表取全量数据；索引可能落后于数据库，已删除的 ID 直接丢弃
        let mut models = Gallery::find()
            .filter(gallery::Column::Id.is_in(candidate_ids))
            .all(db.as_ref())
            .await?;

        // 评论命中可能把隐藏条目带回来，公开变体在这里兜底过滤
        if variant == SearchVariant::Public {
            models.retain(|m| !m.is_hidden);
        }

        order_results(&mut models);
        Ok(models)
    }
}

/// 合并提示词命中与评论父条目 ID：提示词命中优先，保序去重
pub fn merge_candidate_ids(prompt_ids: Vec<i32>, comment_parent_ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    prompt_ids
        .into_iter()
        .chain(comment_parent_ids)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// 统一结果排序：创建时间倒序，ID 倒序兜底
pub fn order_results(models: &mut [gallery::Model]) {
    models.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn model(id: i32, micros: i64) -> gallery::Model {
        gallery::Model {
            id,
            storage_key: format!("gallery/{id}.png"),
            style: "Ghibli".to_string(),
            prompt: "a red fox".to_string(),
            ai_response: None,
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
    fn merge_keeps_order_and_dedupes() {
        assert_eq!(
            merge_candidate_ids(vec![3, 1, 2], vec![2, 4, 1, 5]),
            vec![3, 1, 2, 4, 5]
        );
        assert_eq!(merge_candidate_ids(vec![], vec![7, 7, 7]), vec![7]);
        assert_eq!(merge_candidate_ids(vec![], vec![]), Vec::<i32>::new());
    }

    #[test]
    fn results_are_newest_first_with_id_tiebreak() {
        let mut models = vec![model(1, 100), model(3, 200), model(2, 200)];
        order_results(&mut models);
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn blank_query_short_circuits_to_empty() {
        // 空白查询不触碰搜索索引和数据库
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());

        let results = SearchService::search_combined(&db, "   ", SearchVariant::Public)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}

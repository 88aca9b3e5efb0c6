use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    errors::ApiResult,
    schemas::search::{SearchQuery, SearchResponse},
    services::{GalleryService, SearchService, SearchVariant},
    AppState,
};

/// 全文搜索画廊
///
/// 同时匹配提示词与评论正文，结果为两路命中的并集；隐藏条目不出现
#[utoipa::path(
    get,
    path = "/v2/search",
    responses(
        (status = 200, description = "搜索成功；空白关键词返回空结果", body = SearchResponse)
    ),
    tag = "search",
    params(SearchQuery)
)]
pub async fn search_gallery(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let models =
        SearchService::search_combined(&app_state.db, &query.q, SearchVariant::Public).await?;

    let data = GalleryService::to_items(&app_state.config.s3, models);
    Ok(Json(SearchResponse {
        total: data.len(),
        data,
    }))
}

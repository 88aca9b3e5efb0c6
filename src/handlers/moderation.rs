use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    errors::{ApiError, ApiErrorResponse, ApiResult},
    schemas::{
        gallery::{CustomMessageRequest, GalleryItem},
        search::{SearchQuery, SearchResponse},
    },
    services::{auth::Claims, AuthService, GalleryService, SearchService, SearchVariant},
    AppState,
};

/// 设置条目的自定义消息（需要管理员）
///
/// 空字符串表示清除已有消息
#[utoipa::path(
    put,
    path = "/v2/gallery/{gallery_id}/message",
    request_body = CustomMessageRequest,
    responses(
        (status = 200, description = "设置成功", body = GalleryItem),
        (
            status = 403,
            description = "非管理员",
            body = ApiErrorResponse,
            example = json!({
                "error": "需要管理员权限",
                "status": 403
            }),
        ),
        (
            status = 404,
            description = "条目不存在",
            body = ApiErrorResponse,
            example = json!({
                "error": "找不到该图片",
                "status": 404
            }),
        )
    ),
    tag = "moderation",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID")),
    security(("bearer_auth" = []))
)]
pub async fn set_custom_message(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
    Json(request): Json<CustomMessageRequest>,
) -> ApiResult<Json<GalleryItem>> {
    AuthService::require_admin(user_claims.map(|Extension(claims)| claims))?;

    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let model =
        GalleryService::set_custom_message(&app_state.db, gallery_id, request.message).await?;
    Ok(Json(GalleryService::to_item(&app_state.config.s3, model)))
}

/// 审核后台搜索（需要管理员）
///
/// 与公开搜索同样的合并逻辑，但包含隐藏条目
#[utoipa::path(
    get,
    path = "/v2/moderation/search",
    responses(
        (status = 200, description = "搜索成功", body = SearchResponse),
        (
            status = 403,
            description = "非管理员",
            body = ApiErrorResponse,
            example = json!({
                "error": "需要管理员权限",
                "status": 403
            }),
        )
    ),
    tag = "moderation",
    params(SearchQuery),
    security(("bearer_auth" = []))
)]
pub async fn moderation_search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SearchResponse>> {
    AuthService::require_admin(user_claims.map(|Extension(claims)| claims))?;

    let models =
        SearchService::search_combined(&app_state.db, &query.q, SearchVariant::Unrestricted)
            .await?;

    let data = GalleryService::to_items(&app_state.config.s3, models);
    Ok(Json(SearchResponse {
        total: data.len(),
        data,
    }))
}

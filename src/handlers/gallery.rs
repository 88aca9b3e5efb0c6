use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    errors::{ApiError, ApiErrorResponse, ApiResult},
    schemas::gallery::{
        AdjacentQuery, AdjacentResponse, AuthorInfoRequest, GalleryCountResponse, GalleryItem,
        GalleryListQuery, GalleryListResponse, LikeResponse, RankingQuery, RecentQuery,
        SuccessResponse, ToggleHiddenResponse, ToggleHighlightResponse,
    },
    services::{auth::Claims, AuthService, GalleryService},
    AppState,
};

/// 获取画廊分页列表
#[utoipa::path(
    get,
    path = "/v2/gallery",
    responses(
        (
            status = 200,
            description = "成功获取画廊列表，按创建时间倒序",
            body = GalleryListResponse,
        ),
        (
            status = 400,
            description = "分页游标无效",
            body = ApiErrorResponse,
            example = json!({
                "error": "无效的分页游标",
                "status": 400
            }),
        )
    ),
    tag = "gallery",
    params(GalleryListQuery)
)]
pub async fn list_gallery(
    State(app_state): State<AppState>,
    Query(query): Query<GalleryListQuery>,
) -> ApiResult<Json<GalleryListResponse>> {
    let db = &app_state.db;

    let (models, next_cursor) =
        GalleryService::list_page(db, query.cursor.as_deref(), query.page_size).await?;

    Ok(Json(GalleryListResponse {
        data: GalleryService::to_items(&app_state.config.s3, models),
        next_cursor,
    }))
}

/// 获取画廊条目总数
#[utoipa::path(
    get,
    path = "/v2/gallery/count",
    responses(
        (status = 200, description = "成功获取条目总数", body = GalleryCountResponse)
    ),
    tag = "gallery"
)]
pub async fn count_gallery(
    State(app_state): State<AppState>,
) -> ApiResult<Json<GalleryCountResponse>> {
    let total = GalleryService::count(&app_state.db).await?;
    Ok(Json(GalleryCountResponse { total }))
}

/// 获取最新条目
#[utoipa::path(
    get,
    path = "/v2/gallery/recent",
    responses(
        (status = 200, description = "成功获取最新条目", body = Vec<GalleryItem>)
    ),
    tag = "gallery",
    params(RecentQuery)
)]
pub async fn recent_gallery(
    State(app_state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<GalleryItem>>> {
    let models = GalleryService::recent(&app_state.db, query.limit).await?;
    Ok(Json(GalleryService::to_items(&app_state.config.s3, models)))
}

/// 点赞排行榜
#[utoipa::path(
    get,
    path = "/v2/gallery/ranking/likes",
    responses(
        (status = 200, description = "成功获取点赞排行榜", body = Vec<GalleryItem>)
    ),
    tag = "gallery",
    params(RankingQuery)
)]
pub async fn ranking_by_likes(
    State(app_state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Json<Vec<GalleryItem>>> {
    let models = GalleryService::rank_by_likes(&app_state.db, query.limit).await?;
    Ok(Json(GalleryService::to_items(&app_state.config.s3, models)))
}

/// 评论数排行榜
#[utoipa::path(
    get,
    path = "/v2/gallery/ranking/comments",
    responses(
        (status = 200, description = "成功获取评论数排行榜", body = Vec<GalleryItem>)
    ),
    tag = "gallery",
    params(RankingQuery)
)]
pub async fn ranking_by_comments(
    State(app_state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> ApiResult<Json<Vec<GalleryItem>>> {
    let models = GalleryService::rank_by_comments(&app_state.db, query.limit).await?;
    Ok(Json(GalleryService::to_items(&app_state.config.s3, models)))
}

/// 获取单个画廊条目
#[utoipa::path(
    get,
    path = "/v2/gallery/{gallery_id}",
    responses(
        (status = 200, description = "成功获取条目", body = GalleryItem),
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
    tag = "gallery",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID"))
)]
pub async fn get_gallery_item(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
) -> ApiResult<Json<GalleryItem>> {
    let model = GalleryService::get(&app_state.db, gallery_id).await?;
    Ok(Json(GalleryService::to_item(&app_state.config.s3, model)))
}

/// 获取相邻条目（用于前端翻页浏览）
#[utoipa::path(
    get,
    path = "/v2/gallery/{gallery_id}/adjacent",
    responses(
        (
            status = 200,
            description = "成功；item 为 null 表示已到边界或当前条目不存在",
            body = AdjacentResponse,
        )
    ),
    tag = "gallery",
    params(("gallery_id" = i32, Path, description = "当前条目 ID"), AdjacentQuery)
)]
pub async fn get_adjacent_item(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    Query(query): Query<AdjacentQuery>,
) -> ApiResult<Json<AdjacentResponse>> {
    let adjacent =
        GalleryService::get_adjacent(&app_state.db, gallery_id, query.direction).await?;

    Ok(Json(AdjacentResponse {
        item: adjacent.map(|m| GalleryService::to_item(&app_state.config.s3, m)),
    }))
}

/// 点赞
#[utoipa::path(
    post,
    path = "/v2/gallery/{gallery_id}/like",
    responses(
        (status = 200, description = "点赞成功，返回最新计数", body = LikeResponse),
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
    tag = "gallery",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID"))
)]
pub async fn like_item(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
) -> ApiResult<Json<LikeResponse>> {
    let likes = GalleryService::increment_likes(&app_state.db, gallery_id).await?;
    Ok(Json(LikeResponse { likes }))
}

/// 点击计数上报
#[utoipa::path(
    post,
    path = "/v2/gallery/{gallery_id}/click",
    responses(
        (status = 200, description = "上报成功（条目不存在时也视为成功）", body = SuccessResponse)
    ),
    tag = "gallery",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID"))
)]
pub async fn click_item(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
) -> ApiResult<Json<SuccessResponse>> {
    GalleryService::increment_clicks(&app_state.db, gallery_id).await?;
    Ok(Json(SuccessResponse {
        message: "操作成功".to_string(),
    }))
}

/// 认领作者信息
#[utoipa::path(
    post,
    path = "/v2/gallery/{gallery_id}/author",
    request_body = AuthorInfoRequest,
    responses(
        (status = 200, description = "认领成功", body = GalleryItem),
        (
            status = 409,
            description = "该条目已有作者署名",
            body = ApiErrorResponse,
            example = json!({
                "error": "该图片已有作者署名",
                "status": 409
            }),
        )
    ),
    tag = "gallery",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID"))
)]
pub async fn claim_author(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    Json(request): Json<AuthorInfoRequest>,
) -> ApiResult<Json<GalleryItem>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let model = GalleryService::set_author_info(
        &app_state.db,
        gallery_id,
        request.author_name,
        request.author_social_link,
        request.author_email,
    )
    .await?;

    Ok(Json(GalleryService::to_item(&app_state.config.s3, model)))
}

/// 切换条目隐藏状态（需要登录）
#[utoipa::path(
    post,
    path = "/v2/gallery/{gallery_id}/hide",
    responses(
        (status = 200, description = "切换成功", body = ToggleHiddenResponse),
        (
            status = 401,
            description = "未登录",
            body = ApiErrorResponse,
            example = json!({
                "error": "未登录，禁止访问",
                "status": 401
            }),
        )
    ),
    tag = "moderation",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID")),
    security(("bearer_auth" = []))
)]
pub async fn toggle_hidden(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<ToggleHiddenResponse>> {
    AuthService::require_authenticated(user_claims.map(|Extension(claims)| claims))?;

    let is_hidden = GalleryService::toggle_hidden(&app_state.db, gallery_id).await?;
    Ok(Json(ToggleHiddenResponse {
        success: true,
        is_hidden,
    }))
}

/// 切换条目加精状态（需要登录）
#[utoipa::path(
    post,
    path = "/v2/gallery/{gallery_id}/highlight",
    responses(
        (status = 200, description = "切换成功", body = ToggleHighlightResponse),
        (
            status = 401,
            description = "未登录",
            body = ApiErrorResponse,
            example = json!({
                "error": "未登录，禁止访问",
                "status": 401
            }),
        )
    ),
    tag = "moderation",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID")),
    security(("bearer_auth" = []))
)]
pub async fn toggle_highlight(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<ToggleHighlightResponse>> {
    AuthService::require_authenticated(user_claims.map(|Extension(claims)| claims))?;

    let is_highlighted = GalleryService::toggle_highlighted(&app_state.db, gallery_id).await?;
    Ok(Json(ToggleHighlightResponse {
        success: true,
        is_highlighted,
    }))
}

/// 删除条目及其图片与评论（需要登录）
#[utoipa::path(
    delete,
    path = "/v2/gallery/{gallery_id}",
    responses(
        (status = 200, description = "删除成功", body = SuccessResponse),
        (
            status = 404,
            description = "条目不存在",
            body = ApiErrorResponse,
            example = json!({
                "error": "找不到该图片",
                "status": 404
            }),
        ),
        (
            status = 401,
            description = "未登录",
            body = ApiErrorResponse,
            example = json!({
                "error": "未登录，禁止访问",
                "status": 401
            }),
        )
    ),
    tag = "moderation",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID")),
    security(("bearer_auth" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    user_claims: Option<Extension<Claims>>,
) -> ApiResult<Json<SuccessResponse>> {
    AuthService::require_authenticated(user_claims.map(|Extension(claims)| claims))?;

    GalleryService::delete(&app_state.db, &app_state.config.s3, gallery_id).await?;
    Ok(Json(SuccessResponse {
        message: "删除成功".to_string(),
    }))
}

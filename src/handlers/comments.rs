use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    errors::{ApiError, ApiErrorResponse, ApiResult},
    schemas::comments::{
        AddCommentRequest, AddCommentResponse, CommentItem, CommentListQuery, CommentListResponse,
    },
    services::CommentService,
    AppState,
};

/// 获取条目评论列表
#[utoipa::path(
    get,
    path = "/v2/gallery/{gallery_id}/comments",
    responses(
        (status = 200, description = "成功获取评论列表，按发表顺序", body = CommentListResponse)
    ),
    tag = "comments",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID"), CommentListQuery)
)]
pub async fn list_comments(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    Query(query): Query<CommentListQuery>,
) -> ApiResult<Json<CommentListResponse>> {
    let (comments, next_after) =
        CommentService::list_by_gallery(&app_state.db, gallery_id, query.after, query.limit)
            .await?;

    Ok(Json(CommentListResponse {
        data: comments.into_iter().map(CommentItem::from).collect(),
        next_after,
    }))
}

/// 发表评论
#[utoipa::path(
    post,
    path = "/v2/gallery/{gallery_id}/comments",
    request_body = AddCommentRequest,
    responses(
        (status = 200, description = "评论成功，返回父条目最新评论数", body = AddCommentResponse),
        (
            status = 404,
            description = "评论目标条目不存在",
            body = ApiErrorResponse,
            example = json!({
                "error": "评论目标图片不存在",
                "status": 404
            }),
        )
    ),
    tag = "comments",
    params(("gallery_id" = i32, Path, description = "画廊条目 ID"))
)]
pub async fn add_comment(
    State(app_state): State<AppState>,
    Path(gallery_id): Path<i32>,
    Json(request): Json<AddCommentRequest>,
) -> ApiResult<Json<AddCommentResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let (comment, comment_count) =
        CommentService::add(&app_state.db, gallery_id, request.user_name, request.text).await?;

    Ok(Json(AddCommentResponse {
        id: comment.id,
        comment_count,
    }))
}

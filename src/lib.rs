pub mod config;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod schemas;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::{comments, gallery, generate, moderation, search};
use crate::middleware::{auth::optional_auth_middleware, logging::http_logging_middleware};
use crate::services::auth::SecurityAddon;
use crate::services::database::{establish_connection, DatabaseConnection};

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        let db = establish_connection(&config.database).await?;

        Ok(AppState {
            db,
            config: Arc::new(config),
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate_image,
        gallery::list_gallery,
        gallery::count_gallery,
        gallery::recent_gallery,
        gallery::ranking_by_likes,
        gallery::ranking_by_comments,
        gallery::get_gallery_item,
        gallery::get_adjacent_item,
        gallery::like_item,
        gallery::click_item,
        gallery::claim_author,
        gallery::toggle_hidden,
        gallery::toggle_highlight,
        gallery::delete_item,
        comments::list_comments,
        comments::add_comment,
        search::search_gallery,
        moderation::set_custom_message,
        moderation::moderation_search
    ),
    components(
        schemas(
            schemas::generate::GenerateImageRequest,
            schemas::generate::GenerateImageResponse,
            schemas::gallery::GalleryItem,
            schemas::gallery::GalleryListResponse,
            schemas::gallery::GalleryCountResponse,
            schemas::gallery::LikeResponse,
            schemas::gallery::AdjacentDirection,
            schemas::gallery::AdjacentResponse,
            schemas::gallery::AuthorInfoRequest,
            schemas::gallery::ToggleHiddenResponse,
            schemas::gallery::ToggleHighlightResponse,
            schemas::gallery::CustomMessageRequest,
            schemas::gallery::SuccessResponse,
            schemas::comments::CommentItem,
            schemas::comments::AddCommentRequest,
            schemas::comments::AddCommentResponse,
            schemas::comments::CommentListResponse,
            schemas::search::SearchResponse,
            crate::errors::ApiErrorResponse,
            crate::errors::ApiError
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "images", description = "图片生成"),
        (name = "gallery", description = "画廊浏览与社区互动"),
        (name = "comments", description = "评论"),
        (name = "search", description = "全文搜索"),
        (name = "moderation", description = "审核与管理")
    )
)]
pub struct ApiDoc;

pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        // 图片生成
        .route("/v2/images", post(generate::generate_image))
        // 画廊浏览
        .route("/v2/gallery", get(gallery::list_gallery))
        .route("/v2/gallery/count", get(gallery::count_gallery))
        .route("/v2/gallery/recent", get(gallery::recent_gallery))
        .route("/v2/gallery/ranking/likes", get(gallery::ranking_by_likes))
        .route(
            "/v2/gallery/ranking/comments",
            get(gallery::ranking_by_comments),
        )
        .route(
            "/v2/gallery/{gallery_id}",
            get(gallery::get_gallery_item).delete(gallery::delete_item),
        )
        .route(
            "/v2/gallery/{gallery_id}/adjacent",
            get(gallery::get_adjacent_item),
        )
        // 社区互动
        .route("/v2/gallery/{gallery_id}/like", post(gallery::like_item))
        .route("/v2/gallery/{gallery_id}/click", post(gallery::click_item))
        .route("/v2/gallery/{gallery_id}/author", post(gallery::claim_author))
        .route(
            "/v2/gallery/{gallery_id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        // 搜索
        .route("/v2/search", get(search::search_gallery))
        // 审核与管理
        .route("/v2/gallery/{gallery_id}/hide", post(gallery::toggle_hidden))
        .route(
            "/v2/gallery/{gallery_id}/highlight",
            post(gallery::toggle_highlight),
        )
        .route(
            "/v2/gallery/{gallery_id}/message",
            put(moderation::set_custom_message),
        )
        .route("/v2/moderation/search", get(moderation::moderation_search))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            optional_auth_middleware,
        ))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Swagger UI
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
        .layer(axum_middleware::from_fn(http_logging_middleware))
        .layer(CorsLayer::permissive())
}

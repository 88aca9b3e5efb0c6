use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    errors::{ApiError, ApiErrorResponse, ApiResult},
    schemas::generate::{GenerateImageRequest, GenerateImageResponse},
    services::{GenerationService, StorageService},
    AppState,
};

/// 生成图片并加入画廊
///
/// 公开接口，由 Cloudflare Turnstile 人机验证防滥用
#[utoipa::path(
    post,
    path = "/v2/images",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "生成成功", body = GenerateImageResponse),
        (
            status = 400,
            description = "参数错误或风格不存在",
            body = ApiErrorResponse,
            example = json!({
                "error": "未知的风格: vaporwave",
                "status": 400
            }),
        ),
        (
            status = 403,
            description = "人机验证未通过",
            body = ApiErrorResponse,
            example = json!({
                "error": "人机验证未通过",
                "status": 403
            }),
        ),
        (
            status = 502,
            description = "生成服务或对象存储异常",
            body = ApiErrorResponse,
        ),
        (
            status = 503,
            description = "人机验证服务不可用",
            body = ApiErrorResponse,
        )
    ),
    tag = "images"
)]
pub async fn generate_image(
    State(app_state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> ApiResult<Json<GenerateImageResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let model = GenerationService::process_image(
        &app_state.db,
        &app_state.config,
        &request.prompt,
        &request.style,
        &request.turnstile_token,
    )
    .await?;

    let image_url = StorageService::public_url(&app_state.config.s3, &model.storage_key);

    Ok(Json(GenerateImageResponse {
        gallery_id: model.id,
        storage_key: model.storage_key,
        image_url,
        ai_response: model.ai_response.unwrap_or_default(),
    }))
}

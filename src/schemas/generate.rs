use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 生成图片请求
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateImageRequest {
    /// 用户提示词
    #[schema(example = "a red fox")]
    #[validate(length(min = 1, max = 1000, message = "提示词长度限制为 1~1000"))]
    pub prompt: String,
    /// 风格名称，必须是风格表中的键
    #[schema(example = "Ghibli")]
    pub style: String,
    /// Cloudflare Turnstile 人机验证令牌
    pub turnstile_token: String,
}

/// 生成图片响应
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateImageResponse {
    /// 对象存储键
    pub storage_key: String,
    /// 新建画廊条目 ID
    #[schema(example = 42)]
    pub gallery_id: i32,
    /// 图片的可公开访问 URL
    pub image_url: String,
    /// 生成状态消息
    #[schema(example = "Image generated successfully!")]
    pub ai_response: String,
}

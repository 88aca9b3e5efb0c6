use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    config::Config,
    entities::gallery,
    errors::{ApiError, ApiResult},
    services::{
        database::DatabaseConnection,
        gallery::GalleryService,
        storage::StorageService,
        styles,
    },
};

const TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";
const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// 生成成功后写入条目的固定状态消息
pub const GENERATION_SUCCESS_MESSAGE: &str = "Image generated successfully!";

#[derive(Debug, Deserialize)]
struct TurnstileVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiImageData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiImagesResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

/// 图片生成编排服务
///
/// 完整流程：人机验证 -> 风格查表 -> 提示词拼接 -> 调用生成接口 ->
/// 下载图片字节 -> 上传对象存储 -> 写入画廊条目
pub struct GenerationService;

impl GenerationService {
    pub async fn process_image(
        db: &DatabaseConnection,
        config: &Config,
        user_prompt: &str,
        style: &str,
        turnstile_token: &str,
    ) -> ApiResult<gallery::Model> {
        Self::verify_turnstile(&config.turnstile.secret_key, turnstile_token).await?;

        let system_prompt = styles::system_prompt(style)
            .ok_or_else(|| ApiError::Validation(format!("未知的风格: {style}")))?;
        let full_prompt = styles::compose_prompt(system_prompt, user_prompt);

        let image_url = Self::generate_image(config, &full_prompt).await?;
        let content = Self::fetch_image(&image_url).await?;
        let storage_key = StorageService::store_image(&config.s3, content).await?;

        info!("图片生成完成: style={}, key={}", style, storage_key);

        let model = GalleryService::insert(
            db,
            storage_key,
            style.to_string(),
            user_prompt.to_string(),
            GENERATION_SUCCESS_MESSAGE.to_string(),
        )
        .await?;

        Ok(model)
    }

    /// 校验 Cloudflare Turnstile 人机验证令牌
    async fn verify_turnstile(secret_key: &str, token: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let response = client
            .post(TURNSTILE_VERIFY_URL)
            .form(&[("secret", secret_key), ("response", token)])
            .send()
            .await
            .map_err(|e| {
                ApiError::VerificationUnavailable(format!("人机验证服务不可用: {e}"))
            })?;

        let verdict: TurnstileVerifyResponse = response.json().await.map_err(|e| {
            ApiError::VerificationUnavailable(format!("人机验证响应解析失败: {e}"))
        })?;

        if !verdict.success {
            tracing::warn!("人机验证未通过: {:?}", verdict.error_codes);
            return Err(ApiError::VerificationFailed("人机验证未通过".to_string()));
        }

        Ok(())
    }

    /// 调用 OpenAI 图片生成接口，返回生成图片的临时下载 URL
    async fn generate_image(config: &Config, full_prompt: &str) -> ApiResult<String> {
        let client = reqwest::Client::new();
        let response = client
            .post(OPENAI_IMAGES_URL)
            .bearer_auth(&config.openai.api_key)
            .json(&json!({
                "model": config.openai.image_model,
                "prompt": full_prompt,
                "n": 1,
                "size": config.openai.image_size,
            }))
            .send()
            .await
            .map_err(|e| ApiError::Generation(format!("图片生成请求失败: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("图片生成接口返回错误: status={}, body={}", status, body);
            return Err(ApiError::Generation(format!(
                "图片生成接口返回错误状态: {status}"
            )));
        }

        let payload: OpenAiImagesResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Generation(format!("图片生成响应解析失败: {e}")))?;

        payload
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| ApiError::Generation("生成结果为空".to_string()))
    }

    /// 下载生成的图片字节
    ///
    /// 此时图片已经生成完毕，拉取失败属于存储链路故障而非生成故障
    async fn fetch_image(url: &str) -> ApiResult<Vec<u8>> {
        let response = reqwest::get(url)
            .await
            .map_err(|e| ApiError::Storage(format!("下载生成图片失败: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Storage(format!(
                "下载生成图片失败，状态码: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Storage(format!("读取生成图片失败: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turnstile_verdict_parses_error_codes() {
        let verdict: TurnstileVerifyResponse = serde_json::from_str(
            r#"{"success": false, "error-codes": ["invalid-input-response"]}"#,
        )
        .unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.error_codes, vec!["invalid-input-response"]);

        let verdict: TurnstileVerifyResponse =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(verdict.success);
        assert!(verdict.error_codes.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_a_storage_error() {
        let result = GenerationService::fetch_image("htp://not a valid url").await;
        assert!(matches!(result, Err(ApiError::Storage(_))));
    }

    #[test]
    fn openai_response_tolerates_empty_data() {
        let payload: OpenAiImagesResponse = serde_json::from_str(r#"{"created": 1}"#).unwrap();
        assert!(payload.data.is_empty());

        let payload: OpenAiImagesResponse =
            serde_json::from_str(r#"{"data": [{"url": "https://img.example/x.png"}]}"#).unwrap();
        assert_eq!(payload.data[0].url, "https://img.example/x.png");
    }
}

use anyhow::Result;
use reqwest::Client as HttpClient;
use rusty_s3::{Bucket, Credentials, S3Action, UrlStyle};
use std::time::Duration;
use uuid::Uuid;

use crate::{
    config::S3Config,
    errors::{ApiError, ApiResult},
};

/// 生成图片的对象存储服务
///
/// 通过预签名 URL 直传 S3 兼容存储，存储键形如 `gallery/{uuid}.{ext}`
pub struct StorageService;

impl StorageService {
    /// 创建 S3 客户端凭证
    fn create_credentials(s3_config: &S3Config) -> Credentials {
        Credentials::new(&s3_config.access_key, &s3_config.secret_key)
    }

    /// 创建 S3 Bucket 实例
    fn create_bucket(s3_config: &S3Config) -> Result<Bucket> {
        let endpoint = url::Url::parse(&s3_config.endpoint_url)?;
        let bucket = Bucket::new(
            endpoint,
            UrlStyle::VirtualHost,
            s3_config.bucket.clone(),
            "auto".to_string(),
        )?;
        Ok(bucket)
    }

    /// 按图片字节内容推断扩展名，无法识别时回退为 png
    fn image_extension(content: &[u8]) -> &'static str {
        match infer::get(content) {
            Some(kind) if kind.mime_type().starts_with("image/") => kind.extension(),
            _ => "png",
        }
    }

    /// 由存储键构造可公开访问的图片 URL
    pub fn public_url(s3_config: &S3Config, storage_key: &str) -> String {
        format!(
            "{}/{}/{}",
            s3_config.endpoint_url.trim_end_matches('/'),
            s3_config.bucket,
            storage_key
        )
    }

    /// 上传图片字节到对象存储，返回新分配的存储键
    pub async fn store_image(s3_config: &S3Config, content: Vec<u8>) -> ApiResult<String> {
        let extension = Self::image_extension(&content);
        let storage_key = format!("gallery/{}.{}", Uuid::new_v4(), extension);

        let credentials = Self::create_credentials(s3_config);
        let bucket = Self::create_bucket(s3_config)
            .map_err(|e| ApiError::Storage(format!("S3 bucket 配置失败: {e}")))?;

        let action = bucket.put_object(Some(&credentials), &storage_key);

        let http_client = HttpClient::new();
        let response = http_client
            .put(action.sign(Duration::from_secs(3600)))
            .body(content)
            .send()
            .await
            .map_err(|e| ApiError::Storage(format!("图片上传失败: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Storage(format!(
                "图片上传失败，状态码: {}",
                response.status()
            )));
        }

        Ok(storage_key)
    }

    /// 删除对象存储中的图片
    pub async fn delete_image(s3_config: &S3Config, storage_key: &str) -> ApiResult<()> {
        let credentials = Self::create_credentials(s3_config);
        let bucket = Self::create_bucket(s3_config)
            .map_err(|e| ApiError::Storage(format!("S3 配置错误: {e}")))?;

        let delete_action = bucket.delete_object(Some(&credentials), storage_key);
        let url = delete_action.sign(Duration::from_secs(60));

        let client = HttpClient::new();
        let response = client
            .delete(url.as_str())
            .send()
            .await
            .map_err(|e| ApiError::Storage(format!("删除图片失败: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Storage(format!(
                "删除 S3 图片失败，状态码: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s3_config() -> S3Config {
        S3Config {
            endpoint_url: "https://storage.example.com/".to_string(),
            access_key: "ak".to_string(),
            secret_key: "sk".to_string(),
            bucket: "gallery".to_string(),
        }
    }

    #[test]
    fn public_url_joins_endpoint_bucket_and_key() {
        let url = StorageService::public_url(&s3_config(), "gallery/abc.png");
        assert_eq!(url, "https://storage.example.com/gallery/gallery/abc.png");
    }

    #[test]
    fn image_extension_detects_png() {
        let png_magic = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(StorageService::image_extension(&png_magic), "png");
    }

    #[test]
    fn image_extension_falls_back_to_png() {
        assert_eq!(StorageService::image_extension(b"not an image"), "png");
    }
}

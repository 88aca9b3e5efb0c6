use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub s3: S3Config,
    pub openai: OpenAiConfig,
    pub turnstile: TurnstileConfig,
    pub meilisearch: MeilisearchConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout: u64,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub image_model: String,
    pub image_size: String,
}

#[derive(Debug, Deserialize)]
pub struct TurnstileConfig {
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeilisearchConfig {
    pub url: String,
    pub api_key: String,
    pub sync_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")?,
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            connect_timeout: std::env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            acquire_timeout: std::env::var("DB_ACQUIRE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            idle_timeout: std::env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            // MySQL 默认 wait_timeout 为 8 小时，连接存活期不应超过它
            max_lifetime: std::env::var("DB_MAX_LIFETIME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(28800),
        };

        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
        };

        let s3 = S3Config {
            endpoint_url: std::env::var("S3_ENDPOINT_URL")?,
            access_key: std::env::var("S3_ACCESS_KEY")?,
            secret_key: std::env::var("S3_SECRET_KEY")?,
            bucket: std::env::var("S3_BUCKET")?,
        };

        let openai = OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY")?,
            image_model: std::env::var("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|_| "dall-e-3".to_string()),
            image_size: std::env::var("OPENAI_IMAGE_SIZE")
                .unwrap_or_else(|_| "1024x1024".to_string()),
        };

        let turnstile = TurnstileConfig {
            secret_key: std::env::var("TURNSTILE_SECRET_KEY")?,
        };

        let meilisearch = MeilisearchConfig {
            url: std::env::var("MEILISEARCH_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:7700".to_string()),
            api_key: std::env::var("MEILISEARCH_API_KEY").unwrap_or_default(),
            sync_interval_secs: std::env::var("MEILISEARCH_SYNC_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        };

        Ok(Config {
            database,
            server,
            jwt,
            s3,
            openai,
            turnstile,
            meilisearch,
        })
    }
}

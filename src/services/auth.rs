use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify,
};

use crate::errors::{ApiError, ApiResult};

/// 调用方身份声明
///
/// 由外部身份提供方签发的 JWT 解析而来，role 已经过归一化处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 调用方标识（主题）
    pub sub: String,
    /// 邮箱
    pub email: Option<String>,
    /// 归一化后的角色；管理员为 "admin"
    pub role: Option<String>,
    /// 过期时间戳
    pub exp: usize,
}

/// 身份提供方令牌的原始形态，角色声明字段因配置而异
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    exp: usize,
    #[serde(flatten)]
    extra: Value,
}

/// OpenAPI 安全配置插件
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert(Default::default());
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// 认证服务
pub struct AuthService;

impl AuthService {
    /// 验证令牌有效性并解析为归一化声明
    pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
        let raw = Self::decode_token(token, secret)?;
        Self::check_token_expiry(raw.exp)?;

        Ok(Claims {
            sub: raw.sub,
            email: raw.email,
            role: resolve_role(&raw.extra),
            exp: raw.exp,
        })
    }

    /// 要求调用方已登录
    pub fn require_authenticated(claims: Option<Claims>) -> ApiResult<Claims> {
        claims.ok_or_else(|| ApiError::Authentication("未登录，禁止访问".to_string()))
    }

    /// 要求调用方持有管理员角色
    pub fn require_admin(claims: Option<Claims>) -> ApiResult<Claims> {
        let claims = Self::require_authenticated(claims)?;
        if claims.role.as_deref() == Some("admin") {
            Ok(claims)
        } else {
            Err(ApiError::Authorization("需要管理员权限".to_string()))
        }
    }

    /// 解码 JWT 令牌
    fn decode_token(token: &str, secret: &str) -> Result<RawClaims, String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false; // 手动处理过期验证

        decode::<RawClaims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken => "无效令牌".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "令牌签名无效".to_string(),
            _ => "令牌验证失败".to_string(),
        })
    }

    /// 检查令牌是否过期
    fn check_token_expiry(exp: usize) -> Result<(), String> {
        let now = Utc::now().timestamp() as usize;
        if exp < now {
            Err("令牌已过期".to_string())
        } else {
            Ok(())
        }
    }
}

/// 把身份提供方的各种声明形态归一成单个角色字段
///
/// 依次探测：顶层 role / org_role / orgRole 字段，然后是组织成员关系
/// （org_memberships / orgMemberships 数组）中的 admin 角色
pub fn resolve_role(extra: &Value) -> Option<String> {
    for key in ["role", "org_role", "orgRole"] {
        if let Some(role) = extra.get(key).and_then(Value::as_str) {
            if !role.is_empty() {
                return Some(role.to_string());
            }
        }
    }

    for key in ["org_memberships", "orgMemberships"] {
        if let Some(memberships) = extra.get(key).and_then(Value::as_array) {
            for membership in memberships {
                let role = membership
                    .get("role")
                    .or_else(|| membership.get("org_role"))
                    .or_else(|| membership.get("orgRole"))
                    .and_then(Value::as_str);
                if role == Some("admin") {
                    return Some("admin".to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn future_exp() -> usize {
        (Utc::now().timestamp() + 3600) as usize
    }

    fn claims(role: Option<&str>) -> Option<Claims> {
        Some(Claims {
            sub: "user|123".to_string(),
            email: Some("user@example.com".to_string()),
            role: role.map(str::to_string),
            exp: future_exp(),
        })
    }

    #[test]
    fn resolve_role_direct_field() {
        assert_eq!(
            resolve_role(&json!({"role": "admin"})),
            Some("admin".to_string())
        );
        assert_eq!(
            resolve_role(&json!({"role": "member"})),
            Some("member".to_string())
        );
    }

    #[test]
    fn resolve_role_tolerates_claim_shape_variants() {
        assert_eq!(
            resolve_role(&json!({"org_role": "admin"})),
            Some("admin".to_string())
        );
        assert_eq!(
            resolve_role(&json!({"orgRole": "admin"})),
            Some("admin".to_string())
        );
        assert_eq!(
            resolve_role(&json!({"org_memberships": [{"role": "admin"}]})),
            Some("admin".to_string())
        );
        assert_eq!(
            resolve_role(&json!({"orgMemberships": [{"orgRole": "admin"}]})),
            Some("admin".to_string())
        );
    }

    #[test]
    fn resolve_role_none_when_absent() {
        assert_eq!(resolve_role(&json!({})), None);
        assert_eq!(resolve_role(&json!({"role": ""})), None);
        assert_eq!(
            resolve_role(&json!({"org_memberships": [{"role": "member"}]})),
            None
        );
    }

    #[test]
    fn require_authenticated_rejects_anonymous() {
        assert!(matches!(
            AuthService::require_authenticated(None),
            Err(ApiError::Authentication(_))
        ));
        assert!(AuthService::require_authenticated(claims(None)).is_ok());
    }

    #[test]
    fn require_admin_enforces_role() {
        assert!(matches!(
            AuthService::require_admin(None),
            Err(ApiError::Authentication(_))
        ));
        assert!(matches!(
            AuthService::require_admin(claims(Some("member"))),
            Err(ApiError::Authorization(_))
        ));
        assert!(AuthService::require_admin(claims(Some("admin"))).is_ok());
    }

    #[test]
    fn verify_token_normalizes_role() {
        let token = encode(
            &Header::default(),
            &json!({
                "sub": "user|123",
                "email": "user@example.com",
                "exp": future_exp(),
                "orgRole": "admin",
            }),
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        let claims = AuthService::verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user|123");
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn verify_token_rejects_bad_signature() {
        let token = encode(
            &Header::default(),
            &json!({"sub": "user|123", "exp": future_exp()}),
            &EncodingKey::from_secret("other-secret".as_ref()),
        )
        .unwrap();

        assert!(AuthService::verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn verify_token_rejects_expired() {
        let token = encode(
            &Header::default(),
            &json!({"sub": "user|123", "exp": (Utc::now().timestamp() - 60) as usize}),
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        assert_eq!(
            AuthService::verify_token(&token, SECRET),
            Err("令牌已过期".to_string())
        );
    }
}

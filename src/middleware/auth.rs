use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{services::auth::AuthService, AppState};

/// 可选认证中间件：令牌有效就把身份放进请求扩展，无令牌或无效令牌不拦截
///
/// 是否要求登录由各个 handler 自行裁决
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            match AuthService::verify_token(token, &state.config.jwt.secret) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                }
                Err(reason) => {
                    tracing::debug!("忽略无效令牌: {}", reason);
                }
            }
        }
    }

    next.run(req).await
}

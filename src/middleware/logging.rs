use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::{net::SocketAddr, time::Instant};

use crate::logging::HttpLogFormatter;

/// 获取真实的客户端 IP 地址
fn get_real_ip(addr: Option<SocketAddr>, headers: &HeaderMap) -> Option<String> {
    // 首先尝试从常见的代理头中获取IP
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            // X-Forwarded-For 可能包含多个IP，取第一个
            if let Some(first_ip) = header_value.split(',').next() {
                let ip = first_ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    // 尝试 X-Real-IP
    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(header_value) = real_ip.to_str() {
            let ip = header_value.trim();
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    // 最后使用连接的地址
    addr.map(|a| a.to_string())
}

/// HTTP 请求日志中间件
pub async fn http_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let headers = request.headers().clone();

    let real_ip = get_real_ip(None, &headers);

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    let log_message =
        HttpLogFormatter::format_request(&method, &uri, status, duration, real_ip.as_deref());

    tracing::info!("{}", log_message);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(get_real_ip(None, &headers), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn real_ip_header_is_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(get_real_ip(None, &headers), Some("198.51.100.4".to_string()));
    }

    #[test]
    fn no_headers_no_addr_is_none() {
        assert_eq!(get_real_ip(None, &HeaderMap::new()), None);
    }
}

//! 客户端 IP 与请求头快照
//!
//! 部署在反向代理之后时，按固定顺序信任代理头。

use actix_web::HttpRequest;
use serde_json::{Map, Value, json};

/// 依次检查的代理头
pub const FORWARDED_HEADERS: [&str; 5] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "X-Forwarded",
    "Forwarded-For",
    "Forwarded",
];

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 提取客户端 IP
///
/// 取第一个非空的代理头（X-Forwarded-For 只取逗号前的第一项），
/// 否则使用对端地址，都没有时返回 `unknown`。
pub fn client_ip(req: &HttpRequest) -> String {
    for name in FORWARDED_HEADERS {
        let Some(value) = header_value(req, name) else {
            continue;
        };

        if name == "X-Forwarded-For" {
            let first = value.split(',').next().unwrap_or("").trim();
            if !first.is_empty() {
                return first.to_string();
            }
            continue;
        }
        return value.to_string();
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 请求头快照：`{"headers": {...}, "remote_addr": "..."}`
pub fn debug_headers(req: &HttpRequest) -> String {
    let mut headers = Map::new();
    for (name, value) in req.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match headers.get_mut(name.as_str()) {
            Some(Value::String(existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            _ => {
                headers.insert(name.as_str().to_string(), Value::String(value));
            }
        }
    }

    let remote_addr = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    json!({
        "headers": headers,
        "remote_addr": remote_addr,
    })
    .to_string()
}

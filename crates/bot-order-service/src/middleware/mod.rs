//! Bot 认证中间件
//!
//! 受保护路由组统一经过此中间件。令牌可以放在 X-Bot-Token 头，
//! 也可以放在 `Authorization: Bot <token>` 头，前者优先。

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::auth::BotAuthenticator;
use crate::error::BotApiError;

/// Bot 令牌 Header 名称
const BOT_TOKEN_HEADER: &str = "X-Bot-Token";

/// Bot 令牌认证中间件
pub async fn bot_auth_middleware(
    State(auth): State<BotAuthenticator>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let verified = match header_str(&headers, BOT_TOKEN_HEADER) {
        Some(token) => auth.verify_token(token),
        None => match header_str(&headers, "Authorization") {
            Some(value) => auth.verify_authorization_header(value),
            None => Err(BotApiError::InvalidBotCredentials),
        },
    };

    if let Err(e) = verified {
        warn!(path = %request.uri().path(), "Bot 认证失败");
        return Err(e.into_response());
    }

    Ok(next.run(request).await)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_str_rejects_invalid_encoding() {
        let mut headers = HeaderMap::new();
        headers.insert(
            BOT_TOKEN_HEADER,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        assert!(header_str(&headers, BOT_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_header_str_extracts_value() {
        let mut headers = HeaderMap::new();
        headers.insert(BOT_TOKEN_HEADER, HeaderValue::from_static("tok"));
        assert_eq!(header_str(&headers, BOT_TOKEN_HEADER), Some("tok"));
    }
}

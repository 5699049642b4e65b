//! Bot 认证与 magic link 签发
//!
//! Bot 使用静态令牌认证（X-Bot-Token 头或 `Authorization: Bot <token>`）。
//! 令牌比较先做 SHA256 再比对摘要，避免逐字节短路比较泄露时序信息。

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use gameload_shared::config::AuthConfig;

use crate::error::{BotApiError, Result};

/// magic link 有效期（分钟）
const MAGIC_LINK_TTL_MINUTES: i64 = 15;

/// magic link JWT 声明
#[derive(Debug, Serialize, Deserialize)]
pub struct MagicLinkClaims {
    pub sub: String,
    pub purpose: String,
    pub exp: i64,
    pub iat: i64,
}

/// Bot 认证器
#[derive(Clone)]
pub struct BotAuthenticator {
    config: AuthConfig,
    is_production: bool,
}

impl BotAuthenticator {
    pub fn new(config: AuthConfig, is_production: bool) -> Self {
        Self {
            config,
            is_production,
        }
    }

    /// 校验 Bot 静态令牌
    ///
    /// 未配置令牌时一律拒绝（fail closed）。开发环境接受
    /// internal_api_secret 作为回退凭证。
    pub fn verify_token(&self, provided: &str) -> Result<()> {
        if let Some(expected) = &self.config.bot_api_token {
            if digest_eq(provided, expected) {
                return Ok(());
            }
        }

        if !self.is_production {
            if let Some(secret) = &self.config.internal_api_secret {
                if digest_eq(provided, secret) {
                    return Ok(());
                }
            }
        }

        Err(BotApiError::InvalidBotCredentials)
    }

    /// 校验 `Authorization: Bot <token>` 形式的头
    pub fn verify_authorization_header(&self, header_value: &str) -> Result<()> {
        let token = header_value
            .strip_prefix("Bot ")
            .ok_or(BotApiError::InvalidBotCredentials)?;
        self.verify_token(token)
    }

    /// 开发环境令牌签发
    ///
    /// 生产环境固定返回 410，静态令牌只能通过配置下发。
    pub fn issue_dev_token(&self) -> Result<String> {
        if self.is_production {
            return Err(BotApiError::TokenIssuanceDisabled);
        }

        self.config
            .bot_api_token
            .clone()
            .or_else(|| self.config.internal_api_secret.clone())
            .ok_or_else(|| {
                BotApiError::Internal("未配置 bot_api_token，无法签发开发令牌".to_string())
            })
    }

    /// 为用户签发 magic link
    ///
    /// JWT 有效期 15 分钟，落地页地址来自配置的门户 URL。
    pub fn create_magic_link(&self, user_id: &str) -> Result<MagicLink> {
        let secret = self
            .config
            .jwt_secret
            .as_deref()
            .ok_or_else(|| BotApiError::Jwt("未配置 jwt_secret".to_string()))?;

        let now = Utc::now();
        let expires_at = now + Duration::minutes(MAGIC_LINK_TTL_MINUTES);
        let claims = MagicLinkClaims {
            sub: user_id.to_string(),
            purpose: "magic_link".to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| BotApiError::Jwt(e.to_string()))?;

        let portal = self
            .config
            .portal_url
            .as_deref()
            .unwrap_or("http://localhost:3000");

        Ok(MagicLink {
            url: format!("{}/auth/magic?token={}", portal.trim_end_matches('/'), token),
            token,
            expires_in_seconds: MAGIC_LINK_TTL_MINUTES * 60,
        })
    }
}

/// 签发结果
#[derive(Debug, Clone)]
pub struct MagicLink {
    pub url: String,
    pub token: String,
    pub expires_in_seconds: i64,
}

/// 摘要比较：两侧长度统一为 32 字节，比较耗时与输入内容无关
fn digest_eq(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config(token: Option<&str>) -> AuthConfig {
        AuthConfig {
            bot_api_token: token.map(str::to_string),
            internal_api_secret: Some("dev-secret".to_string()),
            jwt_secret: Some("jwt-secret-for-tests".to_string()),
            portal_url: Some("https://portal.example.com/".to_string()),
        }
    }

    #[test]
    fn test_verify_token() {
        let auth = BotAuthenticator::new(auth_config(Some("static-token")), true);
        assert!(auth.verify_token("static-token").is_ok());
        assert!(matches!(
            auth.verify_token("wrong"),
            Err(BotApiError::InvalidBotCredentials)
        ));
    }

    /// 开发环境接受 internal_api_secret 回退，生产环境不接受
    #[test]
    fn test_internal_secret_fallback_is_dev_only() {
        let dev = BotAuthenticator::new(auth_config(Some("static-token")), false);
        assert!(dev.verify_token("dev-secret").is_ok());

        let prod = BotAuthenticator::new(auth_config(Some("static-token")), true);
        assert!(prod.verify_token("dev-secret").is_err());
    }

    #[test]
    fn test_missing_token_fails_closed() {
        let auth = BotAuthenticator::new(auth_config(None), true);
        assert!(auth.verify_token("anything").is_err());
    }

    #[test]
    fn test_authorization_header_requires_bot_scheme() {
        let auth = BotAuthenticator::new(auth_config(Some("static-token")), true);
        assert!(auth.verify_authorization_header("Bot static-token").is_ok());
        assert!(auth
            .verify_authorization_header("Bearer static-token")
            .is_err());
        assert!(auth.verify_authorization_header("static-token").is_err());
    }

    #[test]
    fn test_issue_dev_token_gone_in_production() {
        let prod = BotAuthenticator::new(auth_config(Some("static-token")), true);
        assert!(matches!(
            prod.issue_dev_token(),
            Err(BotApiError::TokenIssuanceDisabled)
        ));

        let dev = BotAuthenticator::new(auth_config(Some("static-token")), false);
        assert_eq!(dev.issue_dev_token().unwrap(), "static-token");
    }

    #[test]
    fn test_magic_link_contains_portal_and_token() {
        let auth = BotAuthenticator::new(auth_config(Some("static-token")), false);
        let link = auth.create_magic_link("u-1").unwrap();

        assert!(link
            .url
            .starts_with("https://portal.example.com/auth/magic?token="));
        assert_eq!(link.expires_in_seconds, 900);

        use jsonwebtoken::{decode, DecodingKey, Validation};
        let decoded = decode::<MagicLinkClaims>(
            &link.token,
            &DecodingKey::from_secret("jwt-secret-for-tests".as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, "u-1");
        assert_eq!(decoded.claims.purpose, "magic_link");
    }
}

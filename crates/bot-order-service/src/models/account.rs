//! 收款方式、游戏账号与回调注册实体

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// 平台收款方式
#[derive(Debug, Clone, FromRow)]
pub struct PaymentMethod {
    pub method_id: String,
    pub title: String,
    /// 展示用标签数组（如 "instant"、"popular"）
    pub tags: Value,
    pub instructions: Option<String>,
    pub priority: i32,
    pub enabled: bool,
}

/// 用户在某游戏下的账号凭据
#[derive(Debug, Clone, FromRow)]
pub struct GameAccount {
    pub account_id: i64,
    pub user_id: String,
    pub game_name: String,
    pub game_username: String,
    pub game_password: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// 机器人注册的事件回调地址
#[derive(Debug, Clone, FromRow)]
pub struct Webhook {
    pub webhook_id: String,
    pub user_id: String,
    pub webhook_url: String,
    pub signing_secret: Option<String>,
    pub subscribed_events: Value,
    pub created_at: DateTime<Utc>,
}

/// 审计日志条目（只追加，log_id 由仓储生成）
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: String,
    pub username: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: Value,
}

impl AuditEntry {
    pub fn new(
        user_id: impl Into<String>,
        username: Option<String>,
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username,
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            details,
        }
    }
}

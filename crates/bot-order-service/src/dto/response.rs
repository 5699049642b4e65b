//! 响应 DTO 定义
//!
//! Bot 侧约定 snake_case 字段。金额在序列化前已由计算层
//! 四舍五入到两位小数，这里不再加工。

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::{Game, GameAccount, Order, PaymentMethod, User};
use crate::service::bonus::BonusBreakdown;
use crate::service::referral::Tier;

/// 订单视图
#[derive(Debug, Serialize)]
pub struct OrderDto {
    pub order_id: String,
    pub user_id: String,
    pub username: String,
    pub order_type: String,
    pub game_name: String,
    pub game_display_name: Option<String>,
    pub amount: f64,
    pub bonus_amount: f64,
    pub total_amount: f64,
    pub referral_code: Option<String>,
    pub status: String,
    pub payment_proof_url: Option<String>,
    pub payment_proof_uploaded_at: Option<DateTime<Utc>>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            user_id: order.user_id,
            username: order.username,
            order_type: order.order_type,
            game_name: order.game_name,
            game_display_name: order.game_display_name,
            amount: order.amount,
            bonus_amount: order.bonus_amount,
            total_amount: order.total_amount,
            referral_code: order.referral_code,
            status: order.status,
            payment_proof_url: order.payment_proof_url,
            payment_proof_uploaded_at: order.payment_proof_uploaded_at,
            metadata: order.metadata,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// 创建订单响应
///
/// 重复提交也是 `success=true`，由 `duplicate` 区分。
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub duplicate: bool,
    pub requires_approval: bool,
    pub telegram_notified: bool,
    pub order: OrderDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<BonusBreakdown>,
}

/// 订单预校验响应
///
/// 金额越界时 `valid=false` 并携带边界，仍是 200 响应。
#[derive(Debug, Serialize)]
pub struct ValidateOrderResponse {
    pub success: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<BonusBreakdown>,
}

/// 支付凭证上传响应
#[derive(Debug, Serialize)]
pub struct PaymentProofResponse {
    pub success: bool,
    pub telegram_notified: bool,
    pub order: OrderDto,
}

/// 游戏视图（面向 bot 的公开信息，不含内部配置原文）
#[derive(Debug, Serialize)]
pub struct GameDto {
    pub game_name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub min_deposit_amount: f64,
    pub max_deposit_amount: f64,
    pub min_withdrawal_amount: f64,
    pub max_withdrawal_amount: f64,
    pub bonus_rules: Value,
}

impl From<Game> for GameDto {
    fn from(game: Game) -> Self {
        Self {
            game_name: game.game_name,
            display_name: game.display_name,
            description: game.description,
            min_deposit_amount: game.min_deposit_amount,
            max_deposit_amount: game.max_deposit_amount,
            min_withdrawal_amount: game.min_withdrawal_amount,
            max_withdrawal_amount: game.max_withdrawal_amount,
            bonus_rules: game.bonus_rules,
        }
    }
}

/// 余额响应
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub user_id: String,
    pub username: String,
    pub real_balance: f64,
    pub bonus_balance: f64,
    pub total_balance: f64,
    pub deposit_count: i32,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
    pub recent_orders: Vec<OrderDto>,
}

impl BalanceResponse {
    pub fn new(user: User, recent_orders: Vec<Order>) -> Self {
        let total_balance = user.total_balance();
        Self {
            success: true,
            user_id: user.user_id,
            username: user.username,
            real_balance: user.real_balance,
            bonus_balance: user.bonus_balance,
            total_balance,
            deposit_count: user.deposit_count,
            total_deposited: user.total_deposited,
            total_withdrawn: user.total_withdrawn,
            recent_orders: recent_orders.into_iter().map(OrderDto::from).collect(),
        }
    }
}

/// 推荐信息响应
#[derive(Debug, Serialize)]
pub struct ReferralResponse {
    pub success: bool,
    pub referral_code: String,
    pub tier_name: String,
    pub tier_level: i64,
    pub commission_percent: f64,
    pub active_referrals: i64,
    pub pending_earnings: f64,
    pub confirmed_earnings: f64,
    pub total_earnings: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_tier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrals_to_next_tier: Option<i64>,
    pub tiers: Vec<Tier>,
}

/// 收款方式视图
#[derive(Debug, Serialize)]
pub struct PaymentMethodDto {
    pub method_id: String,
    pub title: String,
    pub tags: Value,
    pub instructions: Option<String>,
}

impl From<PaymentMethod> for PaymentMethodDto {
    fn from(method: PaymentMethod) -> Self {
        Self {
            method_id: method.method_id,
            title: method.title,
            tags: method.tags,
            instructions: method.instructions,
        }
    }
}

/// 游戏账号凭据视图
#[derive(Debug, Serialize)]
pub struct CredentialsDto {
    pub game_name: String,
    pub game_username: String,
    pub game_password: String,
    pub balance: f64,
}

impl From<GameAccount> for CredentialsDto {
    fn from(account: GameAccount) -> Self {
        Self {
            game_name: account.game_name,
            game_username: account.game_username,
            game_password: account.game_password,
            balance: account.balance,
        }
    }
}

/// magic link 响应
#[derive(Debug, Serialize)]
pub struct MagicLinkResponse {
    pub success: bool,
    pub magic_link_url: String,
    pub expires_in_seconds: i64,
}

/// webhook 注册响应
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub webhook_id: String,
    pub subscribed_events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,
}

/// 开发令牌响应
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub token_type: &'static str,
}

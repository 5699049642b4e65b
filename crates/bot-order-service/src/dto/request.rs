//! 请求 DTO 定义
//!
//! 字段级校验用 validator 派生，金额上下限属于业务规则，
//! 由奖励计算器按游戏配置判定，不在这里写死。

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

/// 订单预校验请求
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateOrderRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64))]
    pub game_name: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(length(min = 1, max = 32))]
    pub referral_code: Option<String>,
}

/// 创建订单请求
///
/// `conversation_id` 存在时在 HTTP 边界派生幂等键，
/// 缺失则本次请求不参与去重。
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64))]
    pub game_name: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(length(min = 1, max = 32))]
    pub referral_code: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub conversation_id: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// 支付凭证上传请求
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentProofRequest {
    #[validate(url)]
    pub image_url: String,
    #[validate(length(min = 1, max = 128))]
    pub conversation_id: Option<String>,
}

/// 提现预览请求
#[derive(Debug, Deserialize, Validate)]
pub struct WithdrawalPreviewRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64))]
    pub game_name: String,
}

/// magic link 签发请求
#[derive(Debug, Deserialize, Validate)]
pub struct MagicLinkRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
}

/// 订单状态 webhook 注册请求
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterWebhookRequest {
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
    #[validate(url)]
    pub webhook_url: String,
    /// 订阅的事件类型，缺省订阅全部订单状态事件
    pub events: Option<Vec<String>>,
}

/// 订单列表查询参数
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// 余额查询参数
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub game: Option<String>,
}

/// 游戏账号凭据查询参数
#[derive(Debug, Deserialize)]
pub struct CredentialsQuery {
    pub game_name: String,
}

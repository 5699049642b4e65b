//! 订单与推荐实体

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::enums::OrderStatus;
use super::game::BonusRuleSet;

/// 待插入的新订单
///
/// `order_id` 由服务层生成，`status` 为初始状态字面量。
#[derive(Debug, Clone)]
pub struct NewOrder {
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
    pub metadata: Option<Value>,
    pub idempotency_key: Option<String>,
}

/// 订单实体
///
/// 创建后 `user_id`/`amount`/`bonus_amount` 等字段不可变；
/// 可变字段仅限状态机推进和支付凭证相关列。订单永不删除，只被状态取代。
///
/// `status` 保留存储层原始字面量：冲突错误需要原样回显当前状态，
/// 规范化比较请经 [`Order::normalized_status`]。
#[derive(Debug, Clone, FromRow)]
pub struct Order {
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
    pub rejection_reason: Option<String>,
    pub metadata: Option<Value>,
    /// 调用方关联字段的确定性指纹；非空时全局至多一单
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 经存储边界翻译表归一后的状态
    pub fn normalized_status(&self) -> Option<OrderStatus> {
        OrderStatus::normalize(&self.status)
    }

    /// 元数据的键值视图（非对象或缺失时为空表）
    pub fn metadata_map(&self) -> Map<String, Value> {
        match &self.metadata {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }
}

/// 合并元数据：保留既有键，新键覆盖同名旧键
///
/// 凭证上传等操作对 metadata 是合并而非整体替换。
pub fn merge_metadata(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        existing.insert(key, value);
    }
}

/// 推荐特权
///
/// 作用于一个推荐码，可选限定到特定游戏；只有 `is_active` 的记录参与计算。
#[derive(Debug, Clone, FromRow)]
pub struct ReferralPerk {
    pub perk_id: i64,
    pub referral_code: String,
    /// None 表示对所有游戏生效
    pub game_name: Option<String>,
    pub percent_bonus: f64,
    pub flat_bonus: f64,
    pub max_bonus: Option<f64>,
    pub is_active: bool,
}

impl ReferralPerk {
    /// 以通用规则集形式返回特权的奖励规则
    ///
    /// 特权的封顶独立于基础规则的封顶，二者互不嵌套。
    pub fn bonus_rule(&self) -> BonusRuleSet {
        BonusRuleSet {
            percent_bonus: self.percent_bonus,
            flat_bonus: self.flat_bonus,
            max_bonus: self.max_bonus,
        }
    }
}

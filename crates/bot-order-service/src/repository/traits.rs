//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;
use crate::models::{AuditEntry, Game, NewOrder, Order, ReferralPerk, User};

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;
}

/// 游戏仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepositoryTrait: Send + Sync {
    async fn get_active_game(&self, game_name: &str) -> Result<Option<Game>>;
    async fn list_active_games(&self) -> Result<Vec<Game>>;
}

/// 订单仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    /// 插入新订单。幂等键与已有行冲突时返回
    /// `BotApiError::Database` 包装的唯一约束违例，由服务层识别。
    async fn insert_order(&self, order: &NewOrder) -> Result<Order>;
    async fn get_order(&self, order_id: &str) -> Result<Option<Order>>;
    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Order>>;
    /// 用户订单列表，可按原始状态字面量和游戏过滤
    async fn list_orders_by_user(
        &self,
        user_id: &str,
        status: Option<String>,
        game_name: Option<String>,
        limit: i64,
    ) -> Result<Vec<Order>>;
    /// 更新支付凭证字段并原样合并后的元数据写回，返回更新后的订单
    async fn update_payment_proof(
        &self,
        order_id: &str,
        proof_url: &str,
        uploaded_at: DateTime<Utc>,
        metadata: &Value,
    ) -> Result<Order>;
    /// 用户在指定游戏下最近一笔已确认充值的金额
    async fn last_confirmed_deposit_amount(
        &self,
        user_id: &str,
        game_name: &str,
    ) -> Result<Option<f64>>;
}

/// 推荐仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralRepositoryTrait: Send + Sync {
    /// 匹配推荐码且作用域覆盖指定游戏的有效特权
    async fn find_active_perk(
        &self,
        referral_code: &str,
        game_name: &str,
    ) -> Result<Option<ReferralPerk>>;
    /// 被推荐且至少有一笔已确认充值的用户数
    async fn count_confirmed_referrals(&self, referral_code: &str) -> Result<i64>;
    /// 被推荐用户的充值总额：(已确认, 待定)
    async fn referral_deposit_totals(&self, referral_code: &str) -> Result<(f64, f64)>;
}

/// 审计日志仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepositoryTrait: Send + Sync {
    async fn insert(&self, entry: &AuditEntry) -> Result<()>;
}

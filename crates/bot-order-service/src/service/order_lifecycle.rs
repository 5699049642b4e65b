//! 订单生命周期服务
//!
//! 处理充值订单创建与支付凭证上传的核心业务逻辑，包括：
//! - 幂等处理（防止重复下单）
//! - 奖励规则计算
//! - 状态守卫（凭证只能附加到待审批订单）
//! - 审计与通知（均为尽力而为，不影响主流程）
//!
//! ## 幂等流程
//!
//! 1. 先查：按幂等键查既有订单，命中即返回重复结果；
//! 2. 后插：插入时撞上唯一索引同样按重复处理，重查后返回既有单。
//! 先查只是减少冲突的优化，并发下的去重由索引冲突兜底。

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{BotApiError, Result};
use crate::models::{merge_metadata, AuditEntry, NewOrder, Order, OrderStatus, OrderType};
use crate::notification::NotifierTrait;
use crate::repository::traits::{
    AuditRepositoryTrait, GameRepositoryTrait, OrderRepositoryTrait, ReferralRepositoryTrait,
    UserRepositoryTrait,
};
use crate::service::bonus::{self, BonusBreakdown, BoundsViolation};

pub const AUDIT_ORDER_CREATED: &str = "bot.order_created";
pub const AUDIT_PAYMENT_PROOF_UPLOADED: &str = "bot.payment_proof_uploaded";

/// 创建订单的输入
///
/// `idempotency_key` 由 HTTP 边界在 conversation_id 存在时派生，
/// 服务层不再自行推导。
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub user_id: String,
    pub game_name: String,
    pub amount: f64,
    pub referral_code: Option<String>,
    pub idempotency_key: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// 创建订单的三种出口
///
/// 重复与金额越界都是正常业务结果，不走错误通道。
#[derive(Debug)]
pub enum OrderCreation {
    Created {
        order: Order,
        breakdown: BonusBreakdown,
        telegram_notified: bool,
    },
    Duplicate {
        order: Order,
    },
    Invalid(BoundsViolation),
}

/// 从调用方关联字段派生幂等键
///
/// 同一会话内相同的 (用户, 游戏, 金额) 组合产生相同的键。
/// 金额固定两位小数格式化，保证浮点表示差异不产生不同的键。
pub fn derive_idempotency_key(
    user_id: &str,
    conversation_id: &str,
    game_name: &str,
    amount: f64,
) -> String {
    let material = format!("{user_id}:{conversation_id}:{game_name}:{amount:.2}");
    let digest = Sha256::digest(material.as_bytes());
    format!("{digest:x}")
}

/// 订单生命周期服务
pub struct OrderLifecycleService<OR, UR, GR, RR, AR, N>
where
    OR: OrderRepositoryTrait,
    UR: UserRepositoryTrait,
    GR: GameRepositoryTrait,
    RR: ReferralRepositoryTrait,
    AR: AuditRepositoryTrait,
    N: NotifierTrait,
{
    order_repo: Arc<OR>,
    user_repo: Arc<UR>,
    game_repo: Arc<GR>,
    referral_repo: Arc<RR>,
    audit_repo: Arc<AR>,
    notifier: Arc<N>,
}

impl<OR, UR, GR, RR, AR, N> OrderLifecycleService<OR, UR, GR, RR, AR, N>
where
    OR: OrderRepositoryTrait,
    UR: UserRepositoryTrait,
    GR: GameRepositoryTrait,
    RR: ReferralRepositoryTrait,
    AR: AuditRepositoryTrait,
    N: NotifierTrait,
{
    pub fn new(
        order_repo: Arc<OR>,
        user_repo: Arc<UR>,
        game_repo: Arc<GR>,
        referral_repo: Arc<RR>,
        audit_repo: Arc<AR>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            order_repo,
            user_repo,
            game_repo,
            referral_repo,
            audit_repo,
            notifier,
        }
    }

    /// 订单预校验
    ///
    /// 与创建共用同一条计算路径，只差最后的落库，保证
    /// 校验通过的参数在紧随其后的创建中得到相同的奖励结果。
    #[instrument(skip(self))]
    pub async fn validate_order(
        &self,
        user_id: &str,
        game_name: &str,
        amount: f64,
        referral_code: Option<&str>,
    ) -> Result<std::result::Result<BonusBreakdown, BoundsViolation>> {
        let user = self
            .user_repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| BotApiError::UserNotFound(user_id.to_string()))?;

        let game_name = game_name.trim().to_lowercase();
        let game = self
            .game_repo
            .get_active_game(&game_name)
            .await?
            .ok_or_else(|| BotApiError::GameNotFound(game_name.clone()))?;

        let perk = self.lookup_perk(referral_code, &game_name).await?;

        Ok(bonus::evaluate(&game, &user, amount, perk.as_ref()))
    }

    /// 创建充值订单
    ///
    /// 校验用户与游戏、计算奖励、幂等去重、写入审计并推送通知。
    /// 审计和通知只在真正新建订单时发生，重复命中不产生副作用。
    #[instrument(skip(self, cmd), fields(user_id = %cmd.user_id, game_name = %cmd.game_name))]
    pub async fn create_order(&self, cmd: CreateOrderCommand) -> Result<OrderCreation> {
        let user = self
            .user_repo
            .get_user(&cmd.user_id)
            .await?
            .ok_or_else(|| BotApiError::UserNotFound(cmd.user_id.clone()))?;

        let game_name = cmd.game_name.trim().to_lowercase();
        let game = self
            .game_repo
            .get_active_game(&game_name)
            .await?
            .ok_or_else(|| BotApiError::GameNotFound(game_name.clone()))?;

        let perk = self
            .lookup_perk(cmd.referral_code.as_deref(), &game_name)
            .await?;

        let breakdown = match bonus::evaluate(&game, &user, cmd.amount, perk.as_ref()) {
            Ok(breakdown) => breakdown,
            Err(violation) => return Ok(OrderCreation::Invalid(violation)),
        };

        // 先查后插：命中既有单直接返回，不新建
        if let Some(key) = &cmd.idempotency_key {
            if let Some(existing) = self.order_repo.find_by_idempotency_key(key).await? {
                info!(order_id = %existing.order_id, "幂等键命中既有订单");
                return Ok(OrderCreation::Duplicate { order: existing });
            }
        }

        // 订单一律带上来源标记，供后台溯源
        let mut metadata = cmd.metadata.clone().unwrap_or_default();
        metadata.insert("created_by".to_string(), json!("bot"));

        let new_order = NewOrder {
            order_id: format!("ord_{}", Uuid::new_v4().simple()),
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            order_type: OrderType::Deposit.as_str().to_string(),
            game_name: game.game_name.clone(),
            game_display_name: Some(game.display_name.clone()),
            amount: cmd.amount,
            bonus_amount: breakdown.total_bonus,
            total_amount: breakdown.total_amount,
            referral_code: cmd.referral_code.clone(),
            status: OrderStatus::PendingApproval.as_str().to_string(),
            metadata: Some(Value::Object(metadata)),
            idempotency_key: cmd.idempotency_key.clone(),
        };

        let order = match self.order_repo.insert_order(&new_order).await {
            Ok(order) => order,
            // 并发竞速：两个请求同时通过了先查，唯一索引拦下后到者
            Err(BotApiError::Database(sqlx::Error::Database(ref db))) if db.is_unique_violation() => {
                let key = cmd.idempotency_key.as_deref().ok_or_else(|| {
                    BotApiError::Internal("无幂等键的订单插入撞上唯一约束".to_string())
                })?;
                let existing = self.order_repo.find_by_idempotency_key(key).await?.ok_or_else(
                    || BotApiError::Internal("唯一约束冲突但重查不到既有订单".to_string()),
                )?;
                info!(order_id = %existing.order_id, "并发插入冲突，返回既有订单");
                return Ok(OrderCreation::Duplicate { order: existing });
            }
            Err(e) => return Err(e),
        };

        self.audit(AuditEntry::new(
            user.user_id.clone(),
            Some(user.username.clone()),
            AUDIT_ORDER_CREATED,
            "order",
            order.order_id.clone(),
            json!({
                "game_name": order.game_name,
                "amount": order.amount,
                "bonus_amount": order.bonus_amount,
                "total_amount": order.total_amount,
                "rule_applied": breakdown.rule_applied.as_str(),
            }),
        ))
        .await;

        let telegram_notified = self.notifier.notify_order_created(&order).await;

        info!(
            order_id = %order.order_id,
            amount = order.amount,
            bonus = order.bonus_amount,
            telegram_notified,
            "订单创建成功"
        );

        Ok(OrderCreation::Created {
            order,
            breakdown,
            telegram_notified,
        })
    }

    /// 上传支付凭证
    ///
    /// 仅允许附加到待审批订单；元数据按键合并而非整体替换。
    /// 返回更新后的订单与通知投递结果。
    #[instrument(skip(self, metadata))]
    pub async fn attach_payment_proof(
        &self,
        order_id: &str,
        image_url: &str,
        metadata: Map<String, Value>,
    ) -> Result<(Order, bool)> {
        let order = self
            .order_repo
            .get_order(order_id)
            .await?
            .ok_or_else(|| BotApiError::OrderNotFound(order_id.to_string()))?;

        // 历史库中的待审批同义词同样放行，守卫按规范化后的状态判断
        let pending = order
            .normalized_status()
            .is_some_and(|status| status.is_pending());
        if !pending {
            return Err(BotApiError::InvalidOrderStatus {
                order_id: order_id.to_string(),
                current_status: order.status.clone(),
            });
        }

        let mut merged = order.metadata_map();
        merge_metadata(&mut merged, metadata);

        let updated = self
            .order_repo
            .update_payment_proof(order_id, image_url, Utc::now(), &Value::Object(merged))
            .await?;

        self.audit(AuditEntry::new(
            updated.user_id.clone(),
            Some(updated.username.clone()),
            AUDIT_PAYMENT_PROOF_UPLOADED,
            "order",
            updated.order_id.clone(),
            json!({ "image_url": image_url }),
        ))
        .await;

        let telegram_notified = self
            .notifier
            .notify_payment_proof_uploaded(&updated, image_url)
            .await;

        info!(order_id, telegram_notified, "支付凭证已上传");

        Ok((updated, telegram_notified))
    }

    /// 推荐码统一转大写后查特权，码在库中以大写存储
    async fn lookup_perk(
        &self,
        referral_code: Option<&str>,
        game_name: &str,
    ) -> Result<Option<crate::models::ReferralPerk>> {
        match referral_code {
            Some(code) => {
                let code = code.trim().to_uppercase();
                self.referral_repo.find_active_perk(&code, game_name).await
            }
            None => Ok(None),
        }
    }

    /// 写审计日志，失败只记警告
    ///
    /// 订单此刻已经落库，审计失败不能把已成功的操作报成失败，
    /// 否则无幂等键的调用方重试会产生重复订单。
    async fn audit(&self, entry: AuditEntry) {
        if let Err(e) = self.audit_repo.insert(&entry).await {
            warn!(action = %entry.action, resource_id = %entry.resource_id, error = %e, "审计写入失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, User};
    use crate::notification::MockNotifierTrait;
    use crate::repository::traits::{
        MockAuditRepositoryTrait, MockGameRepositoryTrait, MockOrderRepositoryTrait,
        MockReferralRepositoryTrait, MockUserRepositoryTrait,
    };
    use chrono::Utc;
    use serde_json::json;

    type TestService = OrderLifecycleService<
        MockOrderRepositoryTrait,
        MockUserRepositoryTrait,
        MockGameRepositoryTrait,
        MockReferralRepositoryTrait,
        MockAuditRepositoryTrait,
        MockNotifierTrait,
    >;

    struct Mocks {
        order_repo: MockOrderRepositoryTrait,
        user_repo: MockUserRepositoryTrait,
        game_repo: MockGameRepositoryTrait,
        referral_repo: MockReferralRepositoryTrait,
        audit_repo: MockAuditRepositoryTrait,
        notifier: MockNotifierTrait,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                order_repo: MockOrderRepositoryTrait::new(),
                user_repo: MockUserRepositoryTrait::new(),
                game_repo: MockGameRepositoryTrait::new(),
                referral_repo: MockReferralRepositoryTrait::new(),
                audit_repo: MockAuditRepositoryTrait::new(),
                notifier: MockNotifierTrait::new(),
            }
        }

        fn into_service(self) -> TestService {
            OrderLifecycleService::new(
                Arc::new(self.order_repo),
                Arc::new(self.user_repo),
                Arc::new(self.game_repo),
                Arc::new(self.referral_repo),
                Arc::new(self.audit_repo),
                Arc::new(self.notifier),
            )
        }
    }

    fn test_user() -> User {
        User {
            user_id: "u-1".to_string(),
            username: "juan".to_string(),
            display_name: None,
            real_balance: 0.0,
            bonus_balance: 0.0,
            deposit_count: 0,
            total_deposited: 0.0,
            total_withdrawn: 0.0,
            referral_code: "JUAN123".to_string(),
            referred_by: None,
            withdraw_locked: false,
        }
    }

    fn test_game() -> Game {
        Game {
            game_id: "g-1".to_string(),
            game_name: "jiliko".to_string(),
            display_name: "Jiliko".to_string(),
            description: None,
            min_deposit_amount: 10.0,
            max_deposit_amount: 10000.0,
            min_withdrawal_amount: 20.0,
            max_withdrawal_amount: 10000.0,
            bonus_rules: json!({
                "first_deposit": {"percent_bonus": 50, "flat_bonus": 10}
            }),
            withdrawal_rules: json!({}),
            is_active: true,
        }
    }

    fn order_from(new_order: &NewOrder) -> Order {
        Order {
            order_id: new_order.order_id.clone(),
            user_id: new_order.user_id.clone(),
            username: new_order.username.clone(),
            order_type: new_order.order_type.clone(),
            game_name: new_order.game_name.clone(),
            game_display_name: new_order.game_display_name.clone(),
            amount: new_order.amount,
            bonus_amount: new_order.bonus_amount,
            total_amount: new_order.total_amount,
            referral_code: new_order.referral_code.clone(),
            status: new_order.status.clone(),
            payment_proof_url: None,
            payment_proof_uploaded_at: None,
            rejection_reason: None,
            metadata: new_order.metadata.clone(),
            idempotency_key: new_order.idempotency_key.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_order() -> Order {
        Order {
            order_id: "o-1".to_string(),
            user_id: "u-1".to_string(),
            username: "juan".to_string(),
            order_type: "deposit".to_string(),
            game_name: "jiliko".to_string(),
            game_display_name: Some("Jiliko".to_string()),
            amount: 100.0,
            bonus_amount: 60.0,
            total_amount: 160.0,
            referral_code: None,
            status: "pending_approval".to_string(),
            payment_proof_url: None,
            payment_proof_uploaded_at: None,
            rejection_reason: None,
            metadata: Some(json!({"channel": "telegram"})),
            idempotency_key: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn command(key: Option<&str>) -> CreateOrderCommand {
        CreateOrderCommand {
            user_id: "u-1".to_string(),
            game_name: "Jiliko".to_string(),
            amount: 100.0,
            referral_code: None,
            idempotency_key: key.map(str::to_string),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_success_with_first_deposit_bonus() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .withf(|name| name == "jiliko")
            .returning(|_| Ok(Some(test_game())));
        mocks
            .order_repo
            .expect_find_by_idempotency_key()
            .returning(|_| Ok(None));
        mocks
            .order_repo
            .expect_insert_order()
            .withf(|o| o.bonus_amount == 60.0 && o.total_amount == 160.0)
            .returning(|o| Ok(order_from(o)));
        mocks.audit_repo.expect_insert().times(1).returning(|_| Ok(()));
        mocks
            .notifier
            .expect_notify_order_created()
            .times(1)
            .returning(|_| true);

        let result = mocks
            .into_service()
            .create_order(command(Some("k-1")))
            .await
            .unwrap();

        match result {
            OrderCreation::Created {
                order,
                breakdown,
                telegram_notified,
            } => {
                assert_eq!(order.status, "pending_approval");
                assert_eq!(breakdown.total_bonus, 60.0);
                assert!(telegram_notified);
            }
            other => panic!("期望 Created，实际: {:?}", other),
        }
    }

    /// 幂等键先查命中：不插入、不审计、不通知
    #[tokio::test]
    async fn test_create_order_precheck_duplicate_has_no_side_effects() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .returning(|_| Ok(Some(test_game())));
        mocks
            .order_repo
            .expect_find_by_idempotency_key()
            .withf(|key| key == "k-dup")
            .returning(|_| Ok(Some(pending_order())));
        mocks.order_repo.expect_insert_order().times(0);
        mocks.audit_repo.expect_insert().times(0);
        mocks.notifier.expect_notify_order_created().times(0);

        let result = mocks
            .into_service()
            .create_order(command(Some("k-dup")))
            .await
            .unwrap();

        match result {
            OrderCreation::Duplicate { order } => assert_eq!(order.order_id, "o-1"),
            other => panic!("期望 Duplicate，实际: {:?}", other),
        }
    }

    /// 并发竞速：先查未命中、插入撞唯一约束，重查返回既有订单
    #[tokio::test]
    async fn test_create_order_insert_race_resolves_to_duplicate() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .returning(|_| Ok(Some(test_game())));

        // 第一次先查未命中，冲突后的重查命中
        let mut lookup_calls = 0usize;
        mocks
            .order_repo
            .expect_find_by_idempotency_key()
            .times(2)
            .returning_st(move |_| {
                lookup_calls += 1;
                if lookup_calls == 1 {
                    Ok(None)
                } else {
                    Ok(Some(pending_order()))
                }
            });
        mocks.order_repo.expect_insert_order().returning(|_| {
            Err(BotApiError::Database(sqlx::Error::Database(Box::new(
                UniqueViolation,
            ))))
        });
        mocks.audit_repo.expect_insert().times(0);
        mocks.notifier.expect_notify_order_created().times(0);

        let result = mocks
            .into_service()
            .create_order(command(Some("k-race")))
            .await
            .unwrap();

        match result {
            OrderCreation::Duplicate { order } => assert_eq!(order.order_id, "o-1"),
            other => panic!("期望 Duplicate，实际: {:?}", other),
        }
    }

    /// 小写推荐码照常命中特权，查询前统一转大写
    #[tokio::test]
    async fn test_create_order_uppercases_referral_code_for_perk_lookup() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .returning(|_| Ok(Some(test_game())));
        mocks
            .referral_repo
            .expect_find_active_perk()
            .withf(|code, game| code == "JUAN123" && game == "jiliko")
            .times(1)
            .returning(|_, _| Ok(None));
        mocks
            .order_repo
            .expect_find_by_idempotency_key()
            .returning(|_| Ok(None));
        mocks
            .order_repo
            .expect_insert_order()
            .returning(|o| Ok(order_from(o)));
        mocks.audit_repo.expect_insert().returning(|_| Ok(()));
        mocks
            .notifier
            .expect_notify_order_created()
            .returning(|_| true);

        let mut cmd = command(Some("k-1"));
        cmd.referral_code = Some("juan123".to_string());
        let result = mocks.into_service().create_order(cmd).await.unwrap();

        assert!(matches!(result, OrderCreation::Created { .. }));
    }

    /// 新建订单元数据始终带有来源标记
    #[tokio::test]
    async fn test_create_order_tags_metadata_with_creator() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .returning(|_| Ok(Some(test_game())));
        mocks
            .order_repo
            .expect_find_by_idempotency_key()
            .returning(|_| Ok(None));
        mocks
            .order_repo
            .expect_insert_order()
            .withf(|o| {
                // 调用方元数据保留，来源标记并入
                let metadata = o.metadata.as_ref().unwrap();
                metadata["created_by"] == json!("bot")
                    && metadata["conversation_id"] == json!("c-9")
            })
            .returning(|o| Ok(order_from(o)));
        mocks.audit_repo.expect_insert().returning(|_| Ok(()));
        mocks
            .notifier
            .expect_notify_order_created()
            .returning(|_| true);

        let mut cmd = command(Some("k-1"));
        let mut metadata = Map::new();
        metadata.insert("conversation_id".to_string(), json!("c-9"));
        cmd.metadata = Some(metadata);

        let result = mocks.into_service().create_order(cmd).await.unwrap();
        assert!(matches!(result, OrderCreation::Created { .. }));
    }

    /// 金额越界返回结构化拒绝，不触库
    #[tokio::test]
    async fn test_create_order_amount_out_of_bounds() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .returning(|_| Ok(Some(test_game())));
        mocks.order_repo.expect_insert_order().times(0);

        let mut cmd = command(None);
        cmd.amount = 5.0;
        let result = mocks.into_service().create_order(cmd).await.unwrap();

        match result {
            OrderCreation::Invalid(violation) => {
                assert_eq!(violation.min_amount, 10.0);
                assert_eq!(violation.max_amount, 10000.0);
            }
            other => panic!("期望 Invalid，实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_order_unknown_user() {
        let mut mocks = Mocks::new();
        mocks.user_repo.expect_get_user().returning(|_| Ok(None));

        let err = mocks
            .into_service()
            .create_order(command(None))
            .await
            .unwrap_err();
        assert!(matches!(err, BotApiError::UserNotFound(_)));
    }

    /// 通知失败不影响订单创建，只体现为标志位
    #[tokio::test]
    async fn test_create_order_notification_failure_degrades_to_flag() {
        let mut mocks = Mocks::new();
        mocks
            .user_repo
            .expect_get_user()
            .returning(|_| Ok(Some(test_user())));
        mocks
            .game_repo
            .expect_get_active_game()
            .returning(|_| Ok(Some(test_game())));
        mocks
            .order_repo
            .expect_find_by_idempotency_key()
            .returning(|_| Ok(None));
        mocks
            .order_repo
            .expect_insert_order()
            .returning(|o| Ok(order_from(o)));
        mocks.audit_repo.expect_insert().returning(|_| Ok(()));
        mocks
            .notifier
            .expect_notify_order_created()
            .returning(|_| false);

        let result = mocks
            .into_service()
            .create_order(command(Some("k-1")))
            .await
            .unwrap();

        match result {
            OrderCreation::Created {
                telegram_notified, ..
            } => assert!(!telegram_notified),
            other => panic!("期望 Created，实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_attach_proof_success_merges_metadata() {
        let mut mocks = Mocks::new();
        mocks
            .order_repo
            .expect_get_order()
            .returning(|_| Ok(Some(pending_order())));
        mocks
            .order_repo
            .expect_update_payment_proof()
            .withf(|_, url, _, metadata| {
                // 既有键保留，新键并入
                url == "http://cdn/p.jpg"
                    && metadata["channel"] == json!("telegram")
                    && metadata["proof_note"] == json!("gcash ref 123")
            })
            .returning(|order_id, url, ts, metadata| {
                let mut order = pending_order();
                order.order_id = order_id.to_string();
                order.payment_proof_url = Some(url.to_string());
                order.payment_proof_uploaded_at = Some(ts);
                order.metadata = Some(metadata.clone());
                Ok(order)
            });
        mocks.audit_repo.expect_insert().times(1).returning(|_| Ok(()));
        mocks
            .notifier
            .expect_notify_payment_proof_uploaded()
            .returning(|_, _| true);

        let mut incoming = Map::new();
        incoming.insert("proof_note".to_string(), json!("gcash ref 123"));

        let (updated, notified) = mocks
            .into_service()
            .attach_payment_proof("o-1", "http://cdn/p.jpg", incoming)
            .await
            .unwrap();

        assert_eq!(updated.payment_proof_url.as_deref(), Some("http://cdn/p.jpg"));
        assert!(notified);
    }

    /// 历史库中的待审批同义词同样允许上传凭证
    #[tokio::test]
    async fn test_attach_proof_accepts_legacy_pending_literal() {
        let mut mocks = Mocks::new();
        mocks.order_repo.expect_get_order().returning(|_| {
            let mut order = pending_order();
            order.status = "awaiting_payment_proof".to_string();
            Ok(Some(order))
        });
        mocks
            .order_repo
            .expect_update_payment_proof()
            .times(1)
            .returning(|order_id, url, ts, metadata| {
                let mut order = pending_order();
                order.order_id = order_id.to_string();
                order.payment_proof_url = Some(url.to_string());
                order.payment_proof_uploaded_at = Some(ts);
                order.metadata = Some(metadata.clone());
                Ok(order)
            });
        mocks.audit_repo.expect_insert().returning(|_| Ok(()));
        mocks
            .notifier
            .expect_notify_payment_proof_uploaded()
            .returning(|_, _| true);

        let (updated, _) = mocks
            .into_service()
            .attach_payment_proof("o-1", "http://cdn/p.jpg", Map::new())
            .await
            .unwrap();

        assert_eq!(updated.payment_proof_url.as_deref(), Some("http://cdn/p.jpg"));
    }

    /// 非待审批订单拒绝上传，冲突错误原样携带当前状态
    #[tokio::test]
    async fn test_attach_proof_rejected_for_non_pending_order() {
        let mut mocks = Mocks::new();
        mocks.order_repo.expect_get_order().returning(|_| {
            let mut order = pending_order();
            order.status = "APPROVED_EXECUTED".to_string();
            Ok(Some(order))
        });
        mocks.order_repo.expect_update_payment_proof().times(0);

        let err = mocks
            .into_service()
            .attach_payment_proof("o-1", "http://cdn/p.jpg", Map::new())
            .await
            .unwrap_err();

        match err {
            BotApiError::InvalidOrderStatus {
                order_id,
                current_status,
            } => {
                assert_eq!(order_id, "o-1");
                assert_eq!(current_status, "APPROVED_EXECUTED");
            }
            other => panic!("期望 InvalidOrderStatus，实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_attach_proof_unknown_order() {
        let mut mocks = Mocks::new();
        mocks.order_repo.expect_get_order().returning(|_| Ok(None));

        let err = mocks
            .into_service()
            .attach_payment_proof("missing", "http://cdn/p.jpg", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BotApiError::OrderNotFound(_)));
    }

    #[test]
    fn test_idempotency_key_is_deterministic() {
        let a = derive_idempotency_key("u-1", "c-9", "jiliko", 100.0);
        let b = derive_idempotency_key("u-1", "c-9", "jiliko", 100.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let c = derive_idempotency_key("u-1", "c-9", "jiliko", 100.5);
        assert_ne!(a, c);
    }

    /// 测试用的唯一约束违例
    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }
}

//! 账户查询服务
//!
//! 余额、订单列表、提现预览与推荐信息的只读编排。
//! 计算全部委托给纯函数模块，这里只负责取数。

use std::sync::Arc;

use tracing::instrument;

use crate::error::{BotApiError, Result};
use crate::models::{Order, User};
use crate::repository::traits::{
    GameRepositoryTrait, OrderRepositoryTrait, ReferralRepositoryTrait, UserRepositoryTrait,
};
use crate::service::referral::{self, ReferralEarnings, Tier, TIERS};
use crate::service::withdrawal::{self, WithdrawalPreview};

/// 余额概览
#[derive(Debug)]
pub struct BalanceSummary {
    pub user: User,
    pub recent_orders: Vec<Order>,
}

/// 推荐概览
#[derive(Debug)]
pub struct ReferralSummary {
    pub referral_code: String,
    pub earnings: ReferralEarnings,
    pub tiers: &'static [Tier],
}

/// 账户查询服务
pub struct AccountService<UR, GR, OR, RR>
where
    UR: UserRepositoryTrait,
    GR: GameRepositoryTrait,
    OR: OrderRepositoryTrait,
    RR: ReferralRepositoryTrait,
{
    user_repo: Arc<UR>,
    game_repo: Arc<GR>,
    order_repo: Arc<OR>,
    referral_repo: Arc<RR>,
}

impl<UR, GR, OR, RR> AccountService<UR, GR, OR, RR>
where
    UR: UserRepositoryTrait,
    GR: GameRepositoryTrait,
    OR: OrderRepositoryTrait,
    RR: ReferralRepositoryTrait,
{
    pub fn new(
        user_repo: Arc<UR>,
        game_repo: Arc<GR>,
        order_repo: Arc<OR>,
        referral_repo: Arc<RR>,
    ) -> Self {
        Self {
            user_repo,
            game_repo,
            order_repo,
            referral_repo,
        }
    }

    async fn require_user(&self, user_id: &str) -> Result<User> {
        self.user_repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| BotApiError::UserNotFound(user_id.to_string()))
    }

    /// 余额与最近订单，可按游戏过滤展示的订单
    #[instrument(skip(self))]
    pub async fn balance_summary(
        &self,
        user_id: &str,
        game_name: Option<String>,
        limit: i64,
    ) -> Result<BalanceSummary> {
        let user = self.require_user(user_id).await?;
        let recent_orders = self
            .order_repo
            .list_orders_by_user(user_id, None, game_name, limit)
            .await?;

        Ok(BalanceSummary {
            user,
            recent_orders,
        })
    }

    /// 启用中的游戏列表
    pub async fn list_games(&self) -> Result<Vec<crate::models::Game>> {
        self.game_repo.list_active_games().await
    }

    /// 按主键取订单
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Order> {
        self.order_repo
            .get_order(order_id)
            .await?
            .ok_or_else(|| BotApiError::OrderNotFound(order_id.to_string()))
    }

    /// 用户订单列表，可按状态字面量过滤
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        user_id: &str,
        status: Option<String>,
        limit: i64,
    ) -> Result<Vec<Order>> {
        self.require_user(user_id).await?;
        self.order_repo
            .list_orders_by_user(user_id, status, None, limit)
            .await
    }

    /// 提现资格预览
    ///
    /// 倍数规则来自游戏配置，最近一笔已确认充值来自订单表。
    /// 额度按游戏各自独立，只统计该游戏下的充值。
    #[instrument(skip(self))]
    pub async fn withdrawal_preview(
        &self,
        user_id: &str,
        game_name: &str,
    ) -> Result<WithdrawalPreview> {
        let user = self.require_user(user_id).await?;

        let game_name = game_name.trim().to_lowercase();
        let game = self
            .game_repo
            .get_active_game(&game_name)
            .await?
            .ok_or_else(|| BotApiError::GameNotFound(game_name.clone()))?;

        let last_deposit = self
            .order_repo
            .last_confirmed_deposit_amount(user_id, &game_name)
            .await?;

        Ok(withdrawal::preview(
            &user,
            last_deposit,
            &game.withdrawal_rules(),
        ))
    }

    /// 推荐码、当前档位与收益估算
    #[instrument(skip(self))]
    pub async fn referral_summary(&self, user_id: &str) -> Result<ReferralSummary> {
        let user = self.require_user(user_id).await?;

        let count = self
            .referral_repo
            .count_confirmed_referrals(&user.referral_code)
            .await?;
        let (confirmed_total, pending_total) = self
            .referral_repo
            .referral_deposit_totals(&user.referral_code)
            .await?;

        Ok(ReferralSummary {
            referral_code: user.referral_code.clone(),
            earnings: referral::estimate_earnings(count, confirmed_total, pending_total),
            tiers: &TIERS,
        })
    }
}

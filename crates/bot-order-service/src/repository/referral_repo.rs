//! 推荐仓储
//!
//! 推荐计数与收益聚合均为即时查询，不落任何记账行。

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::ReferralRepositoryTrait;
use crate::error::Result;
use crate::models::{ReferralPerk, CONFIRMED_DEPOSIT_STATUSES, PENDING_STATUSES};

/// 推荐仓储
pub struct ReferralRepository {
    pool: PgPool,
}

impl ReferralRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 匹配推荐码且作用域覆盖指定游戏的有效特权
    ///
    /// 游戏专属特权优先于全游戏特权。
    pub async fn find_active_perk(
        &self,
        referral_code: &str,
        game_name: &str,
    ) -> Result<Option<ReferralPerk>> {
        let perk = sqlx::query_as::<_, ReferralPerk>(
            r#"
            SELECT perk_id, referral_code, game_name, percent_bonus,
                   flat_bonus, max_bonus, is_active
            FROM referral_perks
            WHERE referral_code = $1
              AND is_active = TRUE
              AND (game_name IS NULL OR game_name = $2)
            ORDER BY game_name NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(referral_code)
        .bind(game_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(perk)
    }

    /// 被推荐且至少有一笔已确认充值的用户数
    pub async fn count_confirmed_referrals(&self, referral_code: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users u
            WHERE u.referred_by = $1
              AND EXISTS (
                  SELECT 1 FROM orders o
                  WHERE o.user_id = u.user_id
                    AND o.order_type = 'deposit'
                    AND o.status = ANY($2)
              )
            "#,
        )
        .bind(referral_code)
        .bind(CONFIRMED_DEPOSIT_STATUSES.to_vec())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// 被推荐用户的充值总额：(已确认, 待定)
    pub async fn referral_deposit_totals(&self, referral_code: &str) -> Result<(f64, f64)> {
        let totals = sqlx::query_as::<_, (f64, f64)>(
            r#"
            SELECT
                COALESCE(SUM(o.amount) FILTER (WHERE o.status = ANY($2)), 0),
                COALESCE(SUM(o.amount) FILTER (WHERE o.status = ANY($3)), 0)
            FROM orders o
            JOIN users u ON u.user_id = o.user_id
            WHERE u.referred_by = $1
              AND o.order_type = 'deposit'
            "#,
        )
        .bind(referral_code)
        .bind(CONFIRMED_DEPOSIT_STATUSES.to_vec())
        .bind(PENDING_STATUSES.to_vec())
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }
}

#[async_trait]
impl ReferralRepositoryTrait for ReferralRepository {
    async fn find_active_perk(
        &self,
        referral_code: &str,
        game_name: &str,
    ) -> Result<Option<ReferralPerk>> {
        self.find_active_perk(referral_code, game_name).await
    }

    async fn count_confirmed_referrals(&self, referral_code: &str) -> Result<i64> {
        self.count_confirmed_referrals(referral_code).await
    }

    async fn referral_deposit_totals(&self, referral_code: &str) -> Result<(f64, f64)> {
        self.referral_deposit_totals(referral_code).await
    }
}

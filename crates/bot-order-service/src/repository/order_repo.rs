//! 订单仓储
//!
//! 幂等性依赖 orders.idempotency_key 上的部分唯一索引：
//! 应用层的先查后插只是减少冲突的优化，最终去重由索引保证。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use super::traits::OrderRepositoryTrait;
use crate::error::Result;
use crate::models::{Order, NewOrder, CONFIRMED_DEPOSIT_STATUSES};

const ORDER_COLUMNS: &str = r#"order_id, user_id, username, order_type, game_name,
       game_display_name, amount, bonus_amount, total_amount, referral_code,
       status, payment_proof_url, payment_proof_uploaded_at,
       rejection_reason, metadata, idempotency_key, created_at, updated_at"#;

/// 订单仓储
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 插入新订单并返回完整行
    ///
    /// 幂等键冲突时返回唯一约束违例，交由服务层重查解决。
    pub async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
        let inserted = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (order_id, user_id, username, order_type, game_name,
                                game_display_name, amount, bonus_amount, total_amount,
                                referral_code, status, metadata, idempotency_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&order.order_id)
        .bind(&order.user_id)
        .bind(&order.username)
        .bind(&order.order_type)
        .bind(&order.game_name)
        .bind(&order.game_display_name)
        .bind(order.amount)
        .bind(order.bonus_amount)
        .bind(order.total_amount)
        .bind(&order.referral_code)
        .bind(&order.status)
        .bind(&order.metadata)
        .bind(&order.idempotency_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// 按主键获取订单
    pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// 按幂等键查找既有订单
    pub async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE idempotency_key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// 用户最近订单，按创建时间倒序，可按原始状态字面量和游戏过滤
    pub async fn list_orders_by_user(
        &self,
        user_id: &str,
        status: Option<String>,
        game_name: Option<String>,
        limit: i64,
    ) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE user_id = $1
              AND ($2::VARCHAR IS NULL OR status = $2)
              AND ($3::VARCHAR IS NULL OR LOWER(game_name) = LOWER($3))
            ORDER BY created_at DESC
            LIMIT $4
            "#
        ))
        .bind(user_id)
        .bind(status)
        .bind(game_name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// 写入支付凭证字段与合并后的元数据，返回更新后的订单
    pub async fn update_payment_proof(
        &self,
        order_id: &str,
        proof_url: &str,
        uploaded_at: DateTime<Utc>,
        metadata: &Value,
    ) -> Result<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET payment_proof_url = $2,
                payment_proof_uploaded_at = $3,
                metadata = $4,
                updated_at = NOW()
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(proof_url)
        .bind(uploaded_at)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// 用户在指定游戏下最近一笔已确认充值的金额
    ///
    /// 提现额度按游戏各自独立，其他游戏的充值不参与计算。
    /// 已确认状态集经存储边界翻译表展开为字面量数组绑定。
    pub async fn last_confirmed_deposit_amount(
        &self,
        user_id: &str,
        game_name: &str,
    ) -> Result<Option<f64>> {
        let amount = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT amount FROM orders
            WHERE user_id = $1
              AND LOWER(game_name) = LOWER($2)
              AND order_type = 'deposit'
              AND status = ANY($3)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(game_name)
        .bind(CONFIRMED_DEPOSIT_STATUSES.to_vec())
        .fetch_optional(&self.pool)
        .await?;

        Ok(amount)
    }
}

#[async_trait]
impl OrderRepositoryTrait for OrderRepository {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
        self.insert_order(order).await
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<Order>> {
        self.get_order(order_id).await
    }

    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Order>> {
        self.find_by_idempotency_key(key).await
    }

    async fn list_orders_by_user(
        &self,
        user_id: &str,
        status: Option<String>,
        game_name: Option<String>,
        limit: i64,
    ) -> Result<Vec<Order>> {
        self.list_orders_by_user(user_id, status, game_name, limit).await
    }

    async fn update_payment_proof(
        &self,
        order_id: &str,
        proof_url: &str,
        uploaded_at: DateTime<Utc>,
        metadata: &Value,
    ) -> Result<Order> {
        self.update_payment_proof(order_id, proof_url, uploaded_at, metadata)
            .await
    }

    async fn last_confirmed_deposit_amount(
        &self,
        user_id: &str,
        game_name: &str,
    ) -> Result<Option<f64>> {
        self.last_confirmed_deposit_amount(user_id, game_name).await
    }
}

//! 用户仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::UserRepositoryTrait;
use crate::error::Result;
use crate::models::User;

const USER_COLUMNS: &str = r#"user_id, username, display_name, real_balance, bonus_balance,
       deposit_count, total_deposited, total_withdrawn,
       referral_code, referred_by, withdraw_locked"#;

/// 用户仓储
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按主键获取用户
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.get_user(user_id).await
    }
}

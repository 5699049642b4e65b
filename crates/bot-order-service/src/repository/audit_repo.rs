//! 审计日志仓储
//!
//! 只追加，不提供更新或删除。

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::AuditRepositoryTrait;
use crate::error::Result;
use crate::models::AuditEntry;

/// 审计日志仓储
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 追加一条审计记录
    pub async fn insert(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (log_id, user_id, username, action,
                                    resource_type, resource_id, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.user_id)
        .bind(&entry.username)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(&entry.details)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AuditRepositoryTrait for AuditRepository {
    async fn insert(&self, entry: &AuditEntry) -> Result<()> {
        self.insert(entry).await
    }
}

//! 统一错误处理模块
//!
//! 定义基础设施层的共享错误类型，使用 thiserror 提供良好的错误信息。
//! 业务错误由各服务自行定义（如 bot-order-service 的 BotApiError）。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("迁移失败: {0}")]
    Migration(String),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 共享库 Result 类型别名
pub type Result<T> = std::result::Result<T, SharedError>;

impl SharedError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

//! Bot 订单服务错误类型定义
//!
//! 错误分类遵循固定口径：
//! - 参数校验失败（金额越界等）是结构化结果，不是 HTTP 错误，见 service::bonus；
//! - 重复提交是一等公民的成功结果（`duplicate=true`），不是错误；
//! - 通知投递失败只降级为响应里的布尔标志，从不使主操作失败。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Bot 订单服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum BotApiError {
    // 认证错误
    #[error("Bot 凭证无效")]
    InvalidBotCredentials,
    #[error("生产环境已禁用令牌签发，请通过 GAMELOAD_AUTH_BOT_API_TOKEN 配置静态令牌")]
    TokenIssuanceDisabled,

    // 资源不存在
    #[error("用户不存在: {0}")]
    UserNotFound(String),
    #[error("游戏不存在或未启用: {0}")]
    GameNotFound(String),
    #[error("订单不存在: {0}")]
    OrderNotFound(String),

    // 业务冲突
    #[error("订单状态不允许此操作: order_id={order_id}, current_status={current_status}")]
    InvalidOrderStatus {
        order_id: String,
        current_status: String,
    },

    // 参数校验
    #[error("参数校验失败: {0}")]
    Validation(String),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("令牌签发失败: {0}")]
    Jwt(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl BotApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBotCredentials => StatusCode::UNAUTHORIZED,
            Self::TokenIssuanceDisabled => StatusCode::GONE,

            Self::UserNotFound(_) | Self::GameNotFound(_) | Self::OrderNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            Self::InvalidOrderStatus { .. } => StatusCode::CONFLICT,

            Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::Database(_) | Self::Serialization(_) | Self::Jwt(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBotCredentials => "INVALID_BOT_CREDENTIALS",
            Self::TokenIssuanceDisabled => "TOKEN_ISSUANCE_DISABLED",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::GameNotFound(_) => "GAME_NOT_FOUND",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::InvalidOrderStatus { .. } => "INVALID_ORDER_STATUS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Jwt(_) => "JWT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Jwt(_) | Self::Internal(_)
        )
    }
}

impl IntoResponse for BotApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Serialization(e) => {
                tracing::error!(error = %e, "JSON 处理失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Jwt(e) => {
                tracing::error!(error = %e, "令牌签发失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        // 冲突错误额外携带 current_status，调用方需据此重新拉取订单
        let body = match &self {
            Self::InvalidOrderStatus { current_status, .. } => json!({
                "success": false,
                "code": self.error_code(),
                "message": message,
                "current_status": current_status,
            }),
            _ => json!({
                "success": false,
                "code": self.error_code(),
                "message": message,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for BotApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, BotApiError>;

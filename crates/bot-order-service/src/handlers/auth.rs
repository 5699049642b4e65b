//! 认证相关 API 处理器
//!
//! 开发令牌签发与 magic link。

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    dto::request::MagicLinkRequest,
    dto::response::{MagicLinkResponse, TokenResponse},
    error::Result,
    state::AppState,
};

/// 开发环境令牌签发
///
/// POST /api/v1/bot/auth/token
///
/// 生产环境固定 410，令牌只能通过配置下发。
pub async fn issue_token(State(state): State<AppState>) -> Result<Json<TokenResponse>> {
    let token = state.auth.issue_dev_token()?;

    Ok(Json(TokenResponse {
        success: true,
        token,
        token_type: "Bot",
    }))
}

/// 为用户签发 magic link
///
/// POST /api/v1/bot/magic-link
pub async fn create_magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>> {
    req.validate()?;

    // 用户必须存在，避免为任意 ID 签发可登录链接
    state.accounts.balance_summary(&req.user_id, None, 0).await?;

    let link = state.auth.create_magic_link(&req.user_id)?;

    Ok(Json(MagicLinkResponse {
        success: true,
        magic_link_url: link.url,
        expires_in_seconds: link.expires_in_seconds,
    }))
}

//! 账户相关 API 处理器
//!
//! 余额、游戏账号凭据、收款方式与推荐信息的只读端点。
//! 收款方式和凭据属于简单直查，直接走连接池，不经服务层。

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    dto::request::{BalanceQuery, CredentialsQuery},
    dto::response::{BalanceResponse, CredentialsDto, PaymentMethodDto, ReferralResponse},
    error::{BotApiError, Result},
    models::{GameAccount, PaymentMethod},
    state::AppState,
};

/// 余额响应默认携带的最近订单数
const RECENT_ORDER_LIMIT: i64 = 10;

/// 余额与最近订单
///
/// GET /api/v1/bot/balance/{user_id}?game=
///
/// game 参数只过滤展示的订单，不影响余额本身。
/// 过滤在查询层完成，LIMIT 作用在过滤之后。
pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>> {
    let game = query.game.map(|g| g.trim().to_lowercase());

    let summary = state
        .accounts
        .balance_summary(&user_id, game, RECENT_ORDER_LIMIT)
        .await?;

    Ok(Json(BalanceResponse::new(summary.user, summary.recent_orders)))
}

/// 游戏账号凭据
///
/// GET /api/v1/bot/user/{user_id}/credentials?game_name=
pub async fn get_credentials(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<CredentialsQuery>,
) -> Result<Json<Value>> {
    let game_name = query.game_name.trim().to_lowercase();

    let account = sqlx::query_as::<_, GameAccount>(
        r#"
        SELECT account_id, user_id, game_name, game_username,
               game_password, balance, created_at
        FROM game_accounts
        WHERE user_id = $1 AND game_name = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(&user_id)
    .bind(&game_name)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        BotApiError::Validation(format!("用户在游戏 {game_name} 下没有账号"))
    })?;

    Ok(Json(json!({
        "success": true,
        "credentials": CredentialsDto::from(account),
    })))
}

/// 收款方式列表
///
/// GET /api/v1/bot/payment-methods
pub async fn list_payment_methods(State(state): State<AppState>) -> Result<Json<Value>> {
    let methods = sqlx::query_as::<_, PaymentMethod>(
        r#"
        SELECT method_id, title, tags, instructions, priority, enabled
        FROM payment_methods
        WHERE enabled = TRUE
        ORDER BY priority DESC, method_id ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "payment_methods": methods
            .into_iter()
            .map(PaymentMethodDto::from)
            .collect::<Vec<_>>(),
    })))
}

/// 推荐信息
///
/// GET /api/v1/bot/user/{user_id}/referral
pub async fn get_referral_info(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ReferralResponse>> {
    let summary = state.accounts.referral_summary(&user_id).await?;
    let earnings = summary.earnings;

    Ok(Json(ReferralResponse {
        success: true,
        referral_code: summary.referral_code,
        tier_name: earnings.tier_name,
        tier_level: earnings.tier_level,
        commission_percent: earnings.commission_percent,
        active_referrals: earnings.confirmed_referrals,
        pending_earnings: earnings.pending_earnings,
        confirmed_earnings: earnings.confirmed_earnings,
        total_earnings: earnings.total_earnings,
        next_tier_name: earnings.next_tier_name,
        referrals_to_next_tier: earnings.referrals_to_next_tier,
        tiers: summary.tiers.to_vec(),
    }))
}

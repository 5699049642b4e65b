//! webhook 注册 API 处理器

use axum::{extract::State, Json};
use rand::distr::{Alphanumeric, SampleString};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::request::RegisterWebhookRequest, dto::response::WebhookResponse, error::Result,
    models::Webhook, state::AppState,
};

/// 缺省订阅的订单状态事件
const DEFAULT_EVENTS: [&str; 3] = ["order.approved", "order.rejected", "order.completed"];

/// 注册订单状态 webhook
///
/// POST /api/v1/bot/webhooks/order-status
///
/// 同一用户重复注册按 URL 覆盖既有记录。
pub async fn register_order_status_webhook(
    State(state): State<AppState>,
    Json(req): Json<RegisterWebhookRequest>,
) -> Result<Json<WebhookResponse>> {
    req.validate()?;

    let events = req
        .events
        .unwrap_or_else(|| DEFAULT_EVENTS.iter().map(|s| s.to_string()).collect());
    // 未在配置中固定签名密钥时，为每个 webhook 生成独立密钥
    let signing_secret = state
        .config
        .notifier
        .webhook_signing_secret
        .clone()
        .unwrap_or_else(|| Alphanumeric.sample_string(&mut rand::rng(), 48));

    // 覆盖注册时保留首次生成的签名密钥，返回行里的实际值
    let webhook = sqlx::query_as::<_, Webhook>(
        r#"
        INSERT INTO webhooks (webhook_id, user_id, webhook_url, signing_secret, subscribed_events)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, webhook_url)
            DO UPDATE SET subscribed_events = EXCLUDED.subscribed_events
        RETURNING webhook_id, user_id, webhook_url, signing_secret,
                  subscribed_events, created_at
        "#,
    )
    .bind(format!("wh_{}", Uuid::new_v4().simple()))
    .bind(&req.user_id)
    .bind(&req.webhook_url)
    .bind(&signing_secret)
    .bind(json!(events))
    .fetch_one(&state.pool)
    .await?;

    let subscribed_events = serde_json::from_value(webhook.subscribed_events)?;

    Ok(Json(WebhookResponse {
        success: true,
        webhook_id: webhook.webhook_id,
        subscribed_events,
        signing_secret: webhook.signing_secret,
    }))
}

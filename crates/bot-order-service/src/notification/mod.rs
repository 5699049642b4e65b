//! 订单事件通知
//!
//! 向运营后台推送订单事件（Telegram 群转发由后台完成）。
//! 投递是尽力而为：失败只体现为响应里的 `telegram_notified=false`，
//! 从不使订单操作本身失败。

use async_trait::async_trait;
use gameload_shared::config::NotifierConfig;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::Order;

pub const EVENT_ORDER_CREATED: &str = "ORDER_CREATED";
pub const EVENT_PAYMENT_PROOF_UPLOADED: &str = "PAYMENT_PROOF_UPLOADED";

/// 通知发送接口
///
/// 返回值表示本次投递是否成功，调用方原样透传给响应。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    async fn notify_order_created(&self, order: &Order) -> bool;
    async fn notify_payment_proof_uploaded(&self, order: &Order, image_url: &str) -> bool;
}

/// 运营后台通知发送器
pub struct NotificationSender {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl NotificationSender {
    pub fn new(config: &NotifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    /// 投递单个事件，未配置端点视为投递失败
    async fn deliver(&self, event_type: &str, payload: serde_json::Value) -> bool {
        let Some(endpoint) = &self.endpoint else {
            debug!(event_type, "未配置通知端点，跳过投递");
            return false;
        };

        let body = json!({
            "event_type": event_type,
            "payload": payload,
        });

        match self.client.post(endpoint).json(&body).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(
                    event_type,
                    status = %response.status(),
                    "通知端点返回非成功状态"
                );
                false
            }
            Err(e) => {
                warn!(event_type, error = %e, "通知投递失败");
                false
            }
        }
    }
}

#[async_trait]
impl NotifierTrait for NotificationSender {
    async fn notify_order_created(&self, order: &Order) -> bool {
        self.deliver(
            EVENT_ORDER_CREATED,
            json!({
                "title": "New Game Load Order",
                "order_id": order.order_id,
                "user_id": order.user_id,
                "username": order.username,
                "game_name": order.game_name,
                "game_display_name": order.game_display_name,
                "amount": order.amount,
                "bonus_amount": order.bonus_amount,
                "total_amount": order.total_amount,
                "status": order.status,
            }),
        )
        .await
    }

    async fn notify_payment_proof_uploaded(&self, order: &Order, image_url: &str) -> bool {
        self.deliver(
            EVENT_PAYMENT_PROOF_UPLOADED,
            json!({
                "title": "Payment Proof Uploaded",
                "order_id": order.order_id,
                "user_id": order.user_id,
                "username": order.username,
                "amount": order.amount,
                "image_url": image_url,
            }),
        )
        .await
    }
}

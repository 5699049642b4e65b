//! 订单相关 API 处理器

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::{
    dto::request::{CreateOrderRequest, OrderListQuery, PaymentProofRequest, ValidateOrderRequest},
    dto::response::{CreateOrderResponse, OrderDto, PaymentProofResponse, ValidateOrderResponse},
    error::Result,
    service::bonus::{BonusBreakdown, BoundsViolation},
    service::{derive_idempotency_key, CreateOrderCommand, OrderCreation},
    state::AppState,
};

/// 单次查询订单数上限
const MAX_ORDER_LIST_LIMIT: i64 = 50;
const DEFAULT_ORDER_LIST_LIMIT: i64 = 10;

fn valid_response(breakdown: BonusBreakdown) -> ValidateOrderResponse {
    ValidateOrderResponse {
        success: true,
        valid: true,
        message: None,
        min_amount: None,
        max_amount: None,
        bonus: Some(breakdown),
    }
}

/// 金额越界按业务口径回 200，携带边界供调用方自我纠正
fn bounds_response(violation: BoundsViolation) -> ValidateOrderResponse {
    ValidateOrderResponse {
        success: false,
        valid: false,
        message: Some(violation.message),
        min_amount: Some(violation.min_amount),
        max_amount: Some(violation.max_amount),
        bonus: None,
    }
}

/// 订单预校验
///
/// POST /api/v1/bot/orders/validate
pub async fn validate_order(
    State(state): State<AppState>,
    Json(req): Json<ValidateOrderRequest>,
) -> Result<Json<ValidateOrderResponse>> {
    req.validate()?;

    let outcome = state
        .lifecycle
        .validate_order(
            &req.user_id,
            &req.game_name,
            req.amount,
            req.referral_code.as_deref(),
        )
        .await?;

    Ok(Json(match outcome {
        Ok(breakdown) => valid_response(breakdown),
        Err(violation) => bounds_response(violation),
    }))
}

/// 创建充值订单
///
/// POST /api/v1/bot/orders/create
///
/// conversation_id 存在时派生幂等键，重复提交返回既有订单而非报错。
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Response> {
    req.validate()?;

    let idempotency_key = req.conversation_id.as_deref().map(|conversation_id| {
        derive_idempotency_key(&req.user_id, conversation_id, &req.game_name, req.amount)
    });

    // 会话来源并入元数据，供后台溯源
    let mut metadata = req.metadata.unwrap_or_default();
    if let Some(conversation_id) = &req.conversation_id {
        metadata.insert(
            "conversation_id".to_string(),
            Value::String(conversation_id.clone()),
        );
    }

    let outcome = state
        .lifecycle
        .create_order(CreateOrderCommand {
            user_id: req.user_id,
            game_name: req.game_name,
            amount: req.amount,
            referral_code: req.referral_code,
            idempotency_key,
            metadata: if metadata.is_empty() {
                None
            } else {
                Some(metadata)
            },
        })
        .await?;

    let response = match outcome {
        OrderCreation::Created {
            order,
            breakdown,
            telegram_notified,
        } => Json(CreateOrderResponse {
            success: true,
            duplicate: false,
            requires_approval: true,
            telegram_notified,
            order: OrderDto::from(order),
            bonus: Some(breakdown),
        })
        .into_response(),
        OrderCreation::Duplicate { order } => Json(CreateOrderResponse {
            success: true,
            duplicate: true,
            requires_approval: true,
            telegram_notified: false,
            order: OrderDto::from(order),
            bonus: None,
        })
        .into_response(),
        OrderCreation::Invalid(violation) => Json(bounds_response(violation)).into_response(),
    };

    Ok(response)
}

/// 查询单个订单
///
/// GET /api/v1/bot/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>> {
    let order = state.accounts.get_order(&order_id).await?;

    Ok(Json(json!({
        "success": true,
        "order": OrderDto::from(order),
    })))
}

/// 用户订单列表
///
/// GET /api/v1/bot/user/{user_id}/orders?status=&limit=
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Value>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ORDER_LIST_LIMIT)
        .clamp(1, MAX_ORDER_LIST_LIMIT);

    let orders = state
        .accounts
        .list_orders(&user_id, query.status, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "orders": orders.into_iter().map(OrderDto::from).collect::<Vec<_>>(),
    })))
}

/// 上传支付凭证
///
/// POST /api/v1/bot/orders/{order_id}/payment-proof
pub async fn upload_payment_proof(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(req): Json<PaymentProofRequest>,
) -> Result<Json<PaymentProofResponse>> {
    req.validate()?;

    let mut metadata = Map::new();
    if let Some(conversation_id) = &req.conversation_id {
        metadata.insert(
            "proof_conversation_id".to_string(),
            Value::String(conversation_id.clone()),
        );
    }

    let (order, telegram_notified) = state
        .lifecycle
        .attach_payment_proof(&order_id, &req.image_url, metadata)
        .await?;

    Ok(Json(PaymentProofResponse {
        success: true,
        telegram_notified,
        order: OrderDto::from(order),
    }))
}

//! 提现预览 API 处理器

use axum::{extract::State, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    dto::request::WithdrawalPreviewRequest, error::Result, state::AppState,
};

/// 提现资格预览
///
/// POST /api/v1/bot/withdrawal/preview
///
/// 只计算不落库，不符合条件同样返回 200。
pub async fn preview_withdrawal(
    State(state): State<AppState>,
    Json(req): Json<WithdrawalPreviewRequest>,
) -> Result<Json<Value>> {
    req.validate()?;

    let preview = state
        .accounts
        .withdrawal_preview(&req.user_id, &req.game_name)
        .await?;

    // 预览字段平铺在响应顶层
    let mut body = serde_json::to_value(&preview)?;
    if let Some(object) = body.as_object_mut() {
        object.insert("success".to_string(), json!(true));
    }

    Ok(Json(body))
}

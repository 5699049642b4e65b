//! 健康检查

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
///
/// 带数据库探活，连接池异常时返回 degraded 而不是 5xx，
/// 让探针拿到结构化状态。
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "up",
        Err(_) => "down",
    };

    Json(json!({
        "status": if database == "up" { "ok" } else { "degraded" },
        "service": state.config.service_name,
        "database": database,
    }))
}

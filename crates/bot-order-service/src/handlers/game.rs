//! 游戏目录 API 处理器

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{dto::response::GameDto, error::Result, state::AppState};

/// 启用中的游戏列表
///
/// GET /api/v1/bot/games
pub async fn list_games(State(state): State<AppState>) -> Result<Json<Value>> {
    let games = state.accounts.list_games().await?;

    Ok(Json(json!({
        "success": true,
        "games": games.into_iter().map(GameDto::from).collect::<Vec<_>>(),
    })))
}

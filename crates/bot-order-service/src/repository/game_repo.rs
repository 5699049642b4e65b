//! 游戏仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::GameRepositoryTrait;
use crate::error::Result;
use crate::models::Game;

const GAME_COLUMNS: &str = r#"game_id, game_name, display_name, description,
       min_deposit_amount, max_deposit_amount,
       min_withdrawal_amount, max_withdrawal_amount,
       bonus_rules, withdrawal_rules, is_active"#;

/// 游戏仓储
pub struct GameRepository {
    pool: PgPool,
}

impl GameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按规范名获取启用中的游戏，game_name 入库前已统一小写
    pub async fn get_active_game(&self, game_name: &str) -> Result<Option<Game>> {
        let game = sqlx::query_as::<_, Game>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE game_name = $1 AND is_active = TRUE"
        ))
        .bind(game_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(game)
    }

    /// 列出所有启用中的游戏
    pub async fn list_active_games(&self) -> Result<Vec<Game>> {
        let games = sqlx::query_as::<_, Game>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE is_active = TRUE ORDER BY game_name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(games)
    }
}

#[async_trait]
impl GameRepositoryTrait for GameRepository {
    async fn get_active_game(&self, game_name: &str) -> Result<Option<Game>> {
        self.get_active_game(game_name).await
    }

    async fn list_active_games(&self) -> Result<Vec<Game>> {
        self.list_active_games().await
    }
}

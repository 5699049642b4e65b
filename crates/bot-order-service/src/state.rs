//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use sqlx::PgPool;

use gameload_shared::config::AppConfig;

use crate::auth::BotAuthenticator;
use crate::notification::NotificationSender;
use crate::repository::{
    AuditRepository, GameRepository, OrderRepository, ReferralRepository, UserRepository,
};
use crate::service::{AccountService, OrderLifecycleService};

/// 生产装配下的订单生命周期服务
pub type Lifecycle = OrderLifecycleService<
    OrderRepository,
    UserRepository,
    GameRepository,
    ReferralRepository,
    AuditRepository,
    NotificationSender,
>;

/// 生产装配下的账户查询服务
pub type Accounts =
    AccountService<UserRepository, GameRepository, OrderRepository, ReferralRepository>;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池（少数直查型 handler 使用）
    pub pool: PgPool,
    pub auth: BotAuthenticator,
    pub lifecycle: Arc<Lifecycle>,
    pub accounts: Arc<Accounts>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// 装配仓储与服务
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let order_repo = Arc::new(OrderRepository::new(pool.clone()));
        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let game_repo = Arc::new(GameRepository::new(pool.clone()));
        let referral_repo = Arc::new(ReferralRepository::new(pool.clone()));
        let audit_repo = Arc::new(AuditRepository::new(pool.clone()));
        let notifier = Arc::new(NotificationSender::new(&config.notifier));

        let lifecycle = Arc::new(OrderLifecycleService::new(
            order_repo.clone(),
            user_repo.clone(),
            game_repo.clone(),
            referral_repo.clone(),
            audit_repo,
            notifier,
        ));
        let accounts = Arc::new(AccountService::new(
            user_repo,
            game_repo,
            order_repo,
            referral_repo,
        ));

        let auth = BotAuthenticator::new(config.auth.clone(), config.is_production());

        Self {
            pool,
            auth,
            lifecycle,
            accounts,
            config: Arc::new(config),
        }
    }
}

//! 路由配置模块
//!
//! 公开路由：健康检查、游戏目录、开发令牌签发。
//! 其余路由统一挂在 bot 认证中间件之后。

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::bot_auth_middleware, state::AppState};

/// 无需认证的路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/v1/bot/games", get(handlers::game::list_games))
        .route("/api/v1/bot/auth/token", post(handlers::auth::issue_token))
}

/// 需要 bot 令牌的路由
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/bot/payment-methods",
            get(handlers::account::list_payment_methods),
        )
        .route(
            "/api/v1/bot/balance/{user_id}",
            get(handlers::account::get_balance),
        )
        .route(
            "/api/v1/bot/user/{user_id}/orders",
            get(handlers::order::list_user_orders),
        )
        .route(
            "/api/v1/bot/user/{user_id}/credentials",
            get(handlers::account::get_credentials),
        )
        .route(
            "/api/v1/bot/user/{user_id}/referral",
            get(handlers::account::get_referral_info),
        )
        .route(
            "/api/v1/bot/orders/validate",
            post(handlers::order::validate_order),
        )
        .route(
            "/api/v1/bot/orders/create",
            post(handlers::order::create_order),
        )
        .route(
            "/api/v1/bot/orders/{order_id}",
            get(handlers::order::get_order),
        )
        .route(
            "/api/v1/bot/orders/{order_id}/payment-proof",
            post(handlers::order::upload_payment_proof),
        )
        .route(
            "/api/v1/bot/withdrawal/preview",
            post(handlers::withdrawal::preview_withdrawal),
        )
        .route(
            "/api/v1/bot/magic-link",
            post(handlers::auth::create_magic_link),
        )
        .route(
            "/api/v1/bot/webhooks/order-status",
            post(handlers::webhook::register_order_status_webhook),
        )
        .layer(from_fn_with_state(state.auth.clone(), bot_auth_middleware))
}

/// 组装完整路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .with_state(state)
}

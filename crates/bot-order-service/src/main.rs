//! Bot 订单服务入口

use bot_order_service::{routes, state::AppState};
use gameload_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/ 目录分层 + GAMELOAD_ 环境变量覆盖
    let config = AppConfig::load("bot-order-service").unwrap_or_default();

    observability::init(&config.observability)?;

    info!(
        environment = %config.environment,
        "Starting bot-order-service on {}",
        config.server_addr()
    );

    if config.is_production() && config.auth.bot_api_token.is_none() {
        anyhow::bail!("生产环境必须配置 GAMELOAD_AUTH_BOT_API_TOKEN");
    }

    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;

    if config.notifier.endpoint.is_none() {
        warn!("未配置通知端点，订单事件将不会推送到运营后台");
    }

    let addr = config.server_addr();
    let state = AppState::new(db.pool().clone(), config);
    let app = routes::build_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    // 优雅关闭：收到 SIGTERM（K8s 停止 Pod）或 Ctrl+C 时，
    // 停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

//! Bot 订单服务
//!
//! 面向聊天机器人（Telegram/Discord 前端）的游戏充值订单后端，
//! 提供订单创建、支付凭证上传、提现预览、推荐收益等 REST API。
//!
//! ## 核心功能
//!
//! - **订单生命周期**：幂等创建、凭证上传、状态守卫
//! - **奖励计算**：首充/默认规则集、封顶、推荐特权加成
//! - **提现预览**：基于最近已确认充值的倍数规则
//! - **推荐体系**：档位解析与即时收益估算
//! - **审计与通知**：订单事件落审计表并推送运营后台
//!
//! ## 模块结构
//!
//! - `models`: 实体模型与状态枚举
//! - `repository`: sqlx 数据访问层（trait + Pg 实现）
//! - `service`: 纯计算与编排服务
//! - `notification`: 运营后台事件推送
//! - `auth` / `middleware`: Bot 令牌认证与 magic link
//! - `dto` / `handlers` / `routes`: HTTP 层
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据库：sqlx + PostgreSQL
//! - 数据验证：validator
//! - 序列化：serde (snake_case)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notification;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

// 重新导出核心类型
pub use error::{BotApiError, Result};
pub use models::{Game, Order, OrderStatus, OrderType, User};
pub use service::{
    derive_idempotency_key, AccountService, CreateOrderCommand, OrderCreation,
    OrderLifecycleService,
};
pub use state::AppState;

//! API 处理器

pub mod account;
pub mod auth;
pub mod game;
pub mod health;
pub mod order;
pub mod webhook;
pub mod withdrawal;

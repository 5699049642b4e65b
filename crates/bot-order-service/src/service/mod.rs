//! 业务服务层
//!
//! 纯计算（bonus、withdrawal、referral）与编排（order_lifecycle、account）分离：
//! 纯函数不触库，编排服务只取数和落库。

pub mod account;
pub mod bonus;
pub mod order_lifecycle;
pub mod referral;
pub mod withdrawal;

pub use account::AccountService;
pub use order_lifecycle::{derive_idempotency_key, CreateOrderCommand, OrderCreation, OrderLifecycleService};

//! 领域模型
//!
//! 实体结构体（sqlx::FromRow）与枚举定义。

mod account;
mod enums;
mod game;
mod order;
mod user;

pub use account::{AuditEntry, GameAccount, PaymentMethod, Webhook};
pub use enums::{OrderStatus, OrderType, CONFIRMED_DEPOSIT_STATUSES, PENDING_STATUSES};
pub use game::{BonusRuleSet, BonusRules, Game, WithdrawalRules};
pub use order::{merge_metadata, NewOrder, Order, ReferralPerk};
pub use user::User;

//! 数据访问层
//!
//! 仓储按实体划分，服务层通过 traits 依赖抽象。

mod audit_repo;
mod game_repo;
mod order_repo;
mod referral_repo;
pub mod traits;
mod user_repo;

pub use audit_repo::AuditRepository;
pub use game_repo::GameRepository;
pub use order_repo::OrderRepository;
pub use referral_repo::ReferralRepository;
pub use user_repo::UserRepository;

//! 用户实体

use sqlx::FromRow;

/// 用户实体
///
/// `referred_by` 保存推荐人的推荐码（非外键所有权关系，不会成环）。
/// `deposit_count` 只在充值审批通过时由审批后台递增，单调不减。
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub real_balance: f64,
    pub bonus_balance: f64,
    pub deposit_count: i32,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
    pub referral_code: String,
    pub referred_by: Option<String>,
    /// 管理侧风控开关，锁定后所有提现资格检查直接拒绝
    pub withdraw_locked: bool,
}

impl User {
    /// 真实余额与奖励余额之和
    pub fn total_balance(&self) -> f64 {
        self.real_balance + self.bonus_balance
    }

    /// 是否为首充用户（决定奖励规则集的选择）
    pub fn is_first_deposit(&self) -> bool {
        self.deposit_count == 0
    }
}

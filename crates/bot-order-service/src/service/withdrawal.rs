//! 提现资格预览计算
//!
//! 纯函数：基于最近一笔已确认充值和倍数规则计算可提额度。
//! 不触库、不写状态，金额统一在出口处四舍五入到两位小数。

use serde::Serialize;

use crate::models::{User, WithdrawalRules};

pub const VOID_REASON_EXCEEDS_MAX: &str = "EXCEEDS_MAX_CASHOUT";

/// 余额快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSnapshot {
    pub real: f64,
    pub bonus: f64,
    pub total: f64,
}

/// 提现预览结果
///
/// `can_withdraw == false` 时 `block_reason` 必有值。
/// 额度字段始终按最近充值计算并返回，即使资格不成立，
/// 调用方据此向用户解释门槛在哪里。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalPreview {
    pub can_withdraw: bool,
    pub block_reason: Option<String>,
    pub current_balance: BalanceSnapshot,
    pub last_deposit_amount: f64,
    pub min_cashout: f64,
    pub max_cashout: f64,
    pub payout_amount: f64,
    pub void_amount: f64,
    pub void_reason: Option<String>,
}

/// 计算提现预览
///
/// `last_deposit_amount` 为用户在该游戏下最近一笔已确认充值金额，
/// None 表示从未有已确认充值。资格检查短路顺序：
/// 锁定 → 无充值 → 未达下限。
pub fn preview(
    user: &User,
    last_deposit_amount: Option<f64>,
    rules: &WithdrawalRules,
) -> WithdrawalPreview {
    let total = user.total_balance();
    let last_deposit = last_deposit_amount.unwrap_or(0.0);
    let min_cashout = last_deposit * rules.min_multiplier_of_deposit;
    let max_cashout = last_deposit * rules.max_multiplier_of_deposit;

    let block_reason = if user.withdraw_locked {
        Some("提现功能已被锁定，请联系客服".to_string())
    } else if last_deposit <= 0.0 {
        Some("完成一笔充值后才能提现".to_string())
    } else if total < min_cashout {
        Some(format!(
            "余额 ${:.2} 未达到最低提现额 ${:.2}",
            round2(total),
            round2(min_cashout)
        ))
    } else {
        None
    };
    let can_withdraw = block_reason.is_none();

    let payout = if can_withdraw { total.min(max_cashout) } else { 0.0 };
    let void = if can_withdraw {
        (total - max_cashout).max(0.0)
    } else {
        0.0
    };

    WithdrawalPreview {
        can_withdraw,
        block_reason,
        current_balance: BalanceSnapshot {
            real: round2(user.real_balance),
            bonus: round2(user.bonus_balance),
            total: round2(total),
        },
        last_deposit_amount: round2(last_deposit),
        min_cashout: round2(min_cashout),
        max_cashout: round2(max_cashout),
        payout_amount: round2(payout),
        void_amount: round2(void),
        void_reason: (void > 0.0).then(|| VOID_REASON_EXCEEDS_MAX.to_string()),
    }
}

/// 金额出口处统一四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(real: f64, bonus: f64, locked: bool) -> User {
        User {
            user_id: "u-1".to_string(),
            username: "juan".to_string(),
            display_name: None,
            real_balance: real,
            bonus_balance: bonus,
            deposit_count: 1,
            total_deposited: 100.0,
            total_withdrawn: 0.0,
            referral_code: "JUAN123".to_string(),
            referred_by: None,
            withdraw_locked: locked,
        }
    }

    fn rules(min: f64, max: f64) -> WithdrawalRules {
        WithdrawalRules {
            min_multiplier_of_deposit: min,
            max_multiplier_of_deposit: max,
        }
    }

    /// 余额 500、最近充值 100、倍数上限 3.0 → 可提 300、作废 200
    #[test]
    fn test_void_amount_above_max_cashout() {
        let preview = preview(&user(400.0, 100.0, false), Some(100.0), &rules(1.0, 3.0));
        assert!(preview.can_withdraw);
        assert_eq!(preview.current_balance.real, 400.0);
        assert_eq!(preview.current_balance.bonus, 100.0);
        assert_eq!(preview.current_balance.total, 500.0);
        assert_eq!(preview.min_cashout, 100.0);
        assert_eq!(preview.max_cashout, 300.0);
        assert_eq!(preview.payout_amount, 300.0);
        assert_eq!(preview.void_amount, 200.0);
        assert_eq!(preview.void_reason.as_deref(), Some(VOID_REASON_EXCEEDS_MAX));
    }

    #[test]
    fn test_full_payout_within_max() {
        let preview = preview(&user(250.0, 0.0, false), Some(100.0), &rules(1.0, 3.0));
        assert!(preview.can_withdraw);
        assert_eq!(preview.payout_amount, 250.0);
        assert_eq!(preview.void_amount, 0.0);
        assert!(preview.void_reason.is_none());
    }

    /// 锁定优先于其他检查，即使用户同时没有充值记录
    #[test]
    fn test_lock_takes_precedence() {
        let preview = preview(&user(500.0, 0.0, true), None, &rules(1.0, 3.0));
        assert!(!preview.can_withdraw);
        assert!(preview.block_reason.as_deref().unwrap().contains("锁定"));
    }

    #[test]
    fn test_no_confirmed_deposit() {
        let preview = preview(&user(50.0, 0.0, false), None, &rules(1.0, 3.0));
        assert!(!preview.can_withdraw);
        assert!(preview.block_reason.as_deref().unwrap().contains("充值"));
        assert_eq!(preview.last_deposit_amount, 0.0);
        assert_eq!(preview.min_cashout, 0.0);
        assert_eq!(preview.payout_amount, 0.0);
    }

    #[test]
    fn test_zero_deposit_amount_treated_as_none() {
        let preview = preview(&user(50.0, 0.0, false), Some(0.0), &rules(1.0, 3.0));
        assert!(!preview.can_withdraw);
    }

    /// 资格不成立时额度字段仍按最近充值计算返回
    #[test]
    fn test_below_min_cashout_carries_bounds() {
        let preview = preview(&user(80.0, 0.0, false), Some(100.0), &rules(1.0, 3.0));
        assert!(!preview.can_withdraw);
        assert_eq!(preview.last_deposit_amount, 100.0);
        assert_eq!(preview.min_cashout, 100.0);
        assert_eq!(preview.max_cashout, 300.0);
        assert_eq!(preview.payout_amount, 0.0);
        assert_eq!(preview.void_amount, 0.0);
        assert!(preview.void_reason.is_none());
    }

    /// 锁定时额度字段同样返回计算值而非清零
    #[test]
    fn test_locked_still_reports_cashout_bounds() {
        let preview = preview(&user(500.0, 0.0, true), Some(100.0), &rules(1.0, 3.0));
        assert!(!preview.can_withdraw);
        assert_eq!(preview.min_cashout, 100.0);
        assert_eq!(preview.max_cashout, 300.0);
        assert_eq!(preview.payout_amount, 0.0);
    }

    /// 余额恰好等于下限时资格成立
    #[test]
    fn test_exact_min_cashout_is_eligible() {
        let preview = preview(&user(100.0, 0.0, false), Some(100.0), &rules(1.0, 3.0));
        assert!(preview.can_withdraw);
        assert_eq!(preview.payout_amount, 100.0);
    }

    #[test]
    fn test_rounding_at_boundary() {
        let preview = preview(&user(333.333, 0.0, false), Some(111.111), &rules(1.0, 3.0));
        assert!(preview.can_withdraw);
        assert_eq!(preview.current_balance.total, 333.33);
        assert_eq!(preview.min_cashout, 111.11);
        assert_eq!(preview.max_cashout, 333.33);
    }
}

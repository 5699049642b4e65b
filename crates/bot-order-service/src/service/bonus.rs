//! 奖励规则计算
//!
//! 纯函数：(游戏规则, 用户充值历史, 金额, 推荐特权) → 奖励明细。
//! 无副作用、无时间依赖、无随机性，相同输入产生逐字节相同的结果。
//!
//! ## 计算口径
//!
//! 1. 金额必须落在游戏的 `[min_deposit_amount, max_deposit_amount]` 区间；
//! 2. `deposit_count == 0` 选 `first_deposit` 规则集，否则选 `default`，
//!    缺失的规则集按全零奖励处理；
//! 3. `percent + flat` 超出 `max_bonus` 时封顶；
//! 4. 推荐特权按自己的规则独立计算并独立封顶，两个封顶互不嵌套。

use serde::Serialize;

use crate::models::{BonusRuleSet, Game, ReferralPerk, User};

/// 应用的规则集名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedRule {
    FirstDeposit,
    Default,
}

impl AppliedRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstDeposit => "first_deposit",
            Self::Default => "default",
        }
    }
}

/// 奖励计算明细
///
/// `percent_bonus` 和 `flat_bonus` 是封顶前的分项值，
/// `base_bonus` 是封顶后的基础小计，`total_bonus` 含推荐加成。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusBreakdown {
    pub percent_bonus: f64,
    pub flat_bonus: f64,
    pub base_bonus: f64,
    pub referral_bonus: f64,
    pub total_bonus: f64,
    pub rule_applied: AppliedRule,
    pub total_amount: f64,
}

/// 金额越界的结构化拒绝
///
/// 低于下限和高于上限携带不同的消息，并附带两端边界供调用方自我纠正。
/// 这是校验结果而不是系统错误：不会产生任何状态写入。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundsViolation {
    pub message: String,
    pub min_amount: f64,
    pub max_amount: f64,
}

/// 计算充值奖励
///
/// `perk` 为调用方预先查出的有效推荐特权（匹配推荐码且作用域为
/// 全游戏或当前游戏）；None 表示无特权参与。
pub fn evaluate(
    game: &Game,
    user: &User,
    amount: f64,
    perk: Option<&ReferralPerk>,
) -> Result<BonusBreakdown, BoundsViolation> {
    if amount < game.min_deposit_amount {
        return Err(BoundsViolation {
            message: format!("金额低于最低限额 (${})", game.min_deposit_amount),
            min_amount: game.min_deposit_amount,
            max_amount: game.max_deposit_amount,
        });
    }
    if amount > game.max_deposit_amount {
        return Err(BoundsViolation {
            message: format!("金额高于最高限额 (${})", game.max_deposit_amount),
            min_amount: game.min_deposit_amount,
            max_amount: game.max_deposit_amount,
        });
    }

    let rules = game.bonus_rules();
    let (rule, applied) = if user.is_first_deposit() {
        (rules.first_deposit, AppliedRule::FirstDeposit)
    } else {
        (rules.default, AppliedRule::Default)
    };
    let rule = rule.unwrap_or_default();

    let percent_bonus = amount * (rule.percent_bonus / 100.0);
    let flat_bonus = rule.flat_bonus;
    let base_bonus = clamp_to_cap(percent_bonus + flat_bonus, rule.max_bonus);

    let referral_bonus = perk
        .map(|p| apply_rule(&p.bonus_rule(), amount))
        .unwrap_or(0.0);

    let total_bonus = base_bonus + referral_bonus;

    Ok(BonusBreakdown {
        percent_bonus,
        flat_bonus,
        base_bonus,
        referral_bonus,
        total_bonus,
        rule_applied: applied,
        total_amount: amount + total_bonus,
    })
}

/// 按单个规则集计算封顶后的奖励小计
fn apply_rule(rule: &BonusRuleSet, amount: f64) -> f64 {
    let subtotal = amount * (rule.percent_bonus / 100.0) + rule.flat_bonus;
    clamp_to_cap(subtotal, rule.max_bonus)
}

fn clamp_to_cap(subtotal: f64, cap: Option<f64>) -> f64 {
    match cap {
        Some(max) if subtotal > max => max,
        _ => subtotal,
    }
}

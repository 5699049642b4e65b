//! 推荐等级与收益估算
//!
//! 等级表是固定的升序表，按"已确认推荐数"取最后一个满足门槛的档位。
//! 收益是按当前档位百分比对历史充值额的即时估算，不是记账值。

use serde::Serialize;

use crate::service::withdrawal::round2;

/// 单个推荐档位
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    /// 档位序号，从 0 开始
    pub tier: i64,
    pub name: &'static str,
    /// 达到该档位所需的已确认推荐数
    pub min_referrals: i64,
    /// 档位生效的返佣百分比
    pub percent: f64,
}

/// 升序档位表，first 档门槛必须为 0 保证任何计数都有归属
pub const TIERS: [Tier; 6] = [
    Tier { tier: 0, name: "Starter", min_referrals: 0, percent: 5.0 },
    Tier { tier: 1, name: "Bronze", min_referrals: 10, percent: 10.0 },
    Tier { tier: 2, name: "Silver", min_referrals: 25, percent: 15.0 },
    Tier { tier: 3, name: "Gold", min_referrals: 50, percent: 20.0 },
    Tier { tier: 4, name: "Platinum", min_referrals: 100, percent: 25.0 },
    Tier { tier: 5, name: "Diamond", min_referrals: 200, percent: 30.0 },
];

/// 解析推荐数对应的档位
pub fn resolve_tier(confirmed_referrals: i64) -> &'static Tier {
    let mut current = &TIERS[0];
    for tier in &TIERS {
        if confirmed_referrals >= tier.min_referrals {
            current = tier;
        } else {
            break;
        }
    }
    current
}

/// 距下一档位还差多少推荐数，已达顶档返回 None
pub fn next_tier(confirmed_referrals: i64) -> Option<(&'static Tier, i64)> {
    TIERS
        .iter()
        .find(|t| t.min_referrals > confirmed_referrals)
        .map(|t| (t, t.min_referrals - confirmed_referrals))
}

/// 推荐收益估算
///
/// pending 与 confirmed 按充值状态集切分，均按当前档位百分比折算。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferralEarnings {
    pub tier_name: String,
    pub tier_level: i64,
    pub commission_percent: f64,
    pub confirmed_referrals: i64,
    pub pending_earnings: f64,
    pub confirmed_earnings: f64,
    pub total_earnings: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_tier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrals_to_next_tier: Option<i64>,
}

/// 按当前档位对被推荐人的充值总额做即时估算
pub fn estimate_earnings(
    confirmed_referrals: i64,
    confirmed_deposit_total: f64,
    pending_deposit_total: f64,
) -> ReferralEarnings {
    let tier = resolve_tier(confirmed_referrals);
    let rate = tier.percent / 100.0;
    let confirmed = round2(confirmed_deposit_total * rate);
    let pending = round2(pending_deposit_total * rate);
    let next = next_tier(confirmed_referrals);

    ReferralEarnings {
        tier_name: tier.name.to_string(),
        tier_level: tier.tier,
        commission_percent: tier.percent,
        confirmed_referrals,
        pending_earnings: pending,
        confirmed_earnings: confirmed,
        total_earnings: round2(confirmed + pending),
        next_tier_name: next.map(|(t, _)| t.name.to_string()),
        referrals_to_next_tier: next.map(|(_, gap)| gap),
    }
}

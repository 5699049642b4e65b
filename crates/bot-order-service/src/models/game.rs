//! 游戏实体与规则配置
//!
//! 奖励规则和提现规则以 JSONB 存储，读取时解析为强类型结构。
//! 缺失的规则集按全零处理，不视为错误。

use serde::{Deserialize, Serialize};
use sqlx::types::JsonValue;

/// 游戏实体
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Game {
    pub game_id: String,
    /// 规范小写键，全局唯一
    pub game_name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub min_deposit_amount: f64,
    pub max_deposit_amount: f64,
    pub min_withdrawal_amount: f64,
    pub max_withdrawal_amount: f64,
    pub bonus_rules: JsonValue,
    pub withdrawal_rules: JsonValue,
    pub is_active: bool,
}

/// 单个奖励规则集
///
/// `percent_bonus` 为百分比（50 表示 50%），`max_bonus` 为可选封顶。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusRuleSet {
    #[serde(default)]
    pub percent_bonus: f64,
    #[serde(default)]
    pub flat_bonus: f64,
    #[serde(default)]
    pub max_bonus: Option<f64>,
}

/// 游戏的奖励规则：首充与默认两套
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusRules {
    #[serde(default)]
    pub first_deposit: Option<BonusRuleSet>,
    #[serde(default)]
    pub default: Option<BonusRuleSet>,
}

/// 提现倍数规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRules {
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier_of_deposit: f64,
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier_of_deposit: f64,
}

fn default_min_multiplier() -> f64 {
    1.0
}

fn default_max_multiplier() -> f64 {
    3.0
}

impl Default for WithdrawalRules {
    fn default() -> Self {
        Self {
            min_multiplier_of_deposit: default_min_multiplier(),
            max_multiplier_of_deposit: default_max_multiplier(),
        }
    }
}

impl Game {
    /// 解析奖励规则，非法 JSON 按空规则处理
    pub fn bonus_rules(&self) -> BonusRules {
        serde_json::from_value(self.bonus_rules.clone()).unwrap_or_default()
    }

    /// 解析提现规则，缺失字段落回默认倍数 1.0 / 3.0
    pub fn withdrawal_rules(&self) -> WithdrawalRules {
        serde_json::from_value(self.withdrawal_rules.clone()).unwrap_or_default()
    }
}

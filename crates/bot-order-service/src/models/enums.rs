//! 订单枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化。
//! 订单状态的历史同义词只在本模块的存储边界翻译表中出现，
//! 其余代码一律使用规范枚举值。

use serde::{Deserialize, Serialize};

/// 订单类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum OrderType {
    /// 充值 - bot 创建的订单均为此类型，需要审批流
    #[default]
    Deposit,
    /// 提现 - 由审批后台创建，bot 侧只读
    Withdrawal,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// 订单状态（规范值）
///
/// 状态机：`pending_approval`（唯一入口）→ `approved`/`rejected`；
/// `approved` 在资金实际入账后进入 `completed`。
/// 支付凭证上传是 `pending_approval` 上的自环，只改元数据不改状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// 待审批 - 创建后的唯一初始状态
    #[default]
    PendingApproval,
    /// 已批准 - 审批人确认，资金尚未入账
    Approved,
    /// 已拒绝 - 终态
    Rejected,
    /// 已完成 - 资金已实际入账
    Completed,
}

/// 历史库中"算作已确认充值"的状态字面量
///
/// `APPROVED_EXECUTED` 是术语演进留下的旧值，与 `completed` 同义。
/// 技术债：聚合查询必须带上全部同义词，修改本表需与产品确认口径。
pub const CONFIRMED_DEPOSIT_STATUSES: [&str; 3] = ["approved", "completed", "APPROVED_EXECUTED"];

/// 历史库中"审批前"的状态字面量
pub const PENDING_STATUSES: [&str; 3] =
    ["pending_review", "pending_approval", "awaiting_payment_proof"];

impl OrderStatus {
    /// 规范值的存储字面量
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// 存储边界翻译表：把历史同义词归一到规范枚举
    ///
    /// 未知字面量返回 None，由调用方决定是报错还是按原样透传。
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw {
            "pending_approval" | "pending_review" | "awaiting_payment_proof" => {
                Some(Self::PendingApproval)
            }
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" | "APPROVED_EXECUTED" => Some(Self::Completed),
            _ => None,
        }
    }

    /// 是否算作已确认的充值（用于推荐收益、提现资格等聚合口径）
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }

    /// 是否处于审批前阶段（允许上传支付凭证）
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingApproval)
    }
}

// ==========================================
// 采购预测分析引擎 - 领域类型定义
// ==========================================
// 职责: 优先级/风险等级/预测类型/采购订单列等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 成本优化优先级 (Priority)
// ==========================================
// 按节省金额分档: > 高阈值 => High, >= 中阈值 => Medium, 其余 Low
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// 依据节省金额判定优先级
    ///
    /// 高档边界不含（恰好等于高阈值仍为 Medium），中档边界含（恰好等于中阈值为 Medium）
    pub fn from_savings(savings_amount: f64, high_threshold: f64, medium_threshold: f64) -> Self {
        if savings_amount > high_threshold {
            Priority::High
        } else if savings_amount >= medium_threshold {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// 看板展示标签
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High Priority",
            Priority::Medium => "Medium Priority",
            Priority::Low => "Low Priority",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

// ==========================================
// 执行风险等级 (Risk Level)
// ==========================================
// 节省空间越大，谈判动作越明确，执行风险越低
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl From<Priority> for RiskLevel {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => RiskLevel::Low,
            Priority::Medium => RiskLevel::Medium,
            Priority::Low => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

// ==========================================
// 预测类型 (Forecast Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastType {
    TrendBased, // 末两期差分外推
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastType::TrendBased => write!(f, "trend_based"),
        }
    }
}

// ==========================================
// 采购订单列 (PO Column)
// ==========================================
// 用于判断源表是否携带某列（缺列 => MissingColumns）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoColumn {
    ItemId,
    SupplierId,
    OrderDate,
    Quantity,
    UnitPrice,
}

impl PoColumn {
    pub const ALL: [PoColumn; 5] = [
        PoColumn::ItemId,
        PoColumn::SupplierId,
        PoColumn::OrderDate,
        PoColumn::Quantity,
        PoColumn::UnitPrice,
    ];

    /// 标准列名
    pub fn as_str(&self) -> &'static str {
        match self {
            PoColumn::ItemId => "item_id",
            PoColumn::SupplierId => "supplier_id",
            PoColumn::OrderDate => "order_date",
            PoColumn::Quantity => "quantity",
            PoColumn::UnitPrice => "unit_price",
        }
    }
}

impl fmt::Display for PoColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

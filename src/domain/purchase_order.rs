// ==========================================
// 采购预测分析引擎 - 采购订单行
// ==========================================
// 职责: 定义采购订单行实体与订单表（含列存在性）
// 红线: 分析引擎只读源行，派生列在构造时一次性计算
// ==========================================

use crate::domain::types::PoColumn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 采购订单行 (PurchaseOrderLine)
///
/// 源数据允许缺失值（空单元格），因此除派生列外字段均为 Option。
/// `order_date` 保留原始文本，由各分析器按需解析（无法解析视为缺失）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    /// 物料 ID
    pub item_id: Option<String>,

    /// 供应商 ID
    pub supplier_id: Option<String>,

    /// 下单日期（原始文本）
    pub order_date: Option<String>,

    /// 数量 (>= 0)
    pub quantity: Option<f64>,

    /// 单价 (>= 0)
    pub unit_price: Option<f64>,

    /// 行金额 = 单价 × 数量（派生列，任一缺失则为 None）
    #[serde(default)]
    pub line_total: Option<f64>,
}

impl PurchaseOrderLine {
    pub fn new(
        item_id: Option<String>,
        supplier_id: Option<String>,
        order_date: Option<String>,
        quantity: Option<f64>,
        unit_price: Option<f64>,
    ) -> Self {
        let mut line = Self {
            item_id,
            supplier_id,
            order_date,
            quantity,
            unit_price,
            line_total: None,
        };
        line.refresh_line_total();
        line
    }

    /// 重新计算派生列
    pub(crate) fn refresh_line_total(&mut self) {
        self.line_total = match (self.unit_price, self.quantity) {
            (Some(price), Some(qty)) => Some(price * qty),
            _ => None,
        };
    }

    /// 解析下单日期（无法解析 => None）
    pub fn parsed_order_date(&self) -> Option<NaiveDate> {
        self.order_date.as_deref().and_then(parse_order_date)
    }
}

/// 解析日期文本
///
/// 支持: YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD / 带时间后缀的 ISO 格式
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // 截掉时间部分（"2024-01-05 10:00:00" / "2024-01-05T10:00:00"）
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

// ==========================================
// PurchaseOrderTable - 采购订单表
// ==========================================

/// 采购订单表：行 + 源表实际携带的列
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseOrderTable {
    columns: BTreeSet<PoColumn>,
    rows: Vec<PurchaseOrderLine>,
}

impl PurchaseOrderTable {
    /// 构造订单表，并一次性预计算行金额
    pub fn new(columns: impl IntoIterator<Item = PoColumn>, rows: Vec<PurchaseOrderLine>) -> Self {
        let mut rows = rows;
        for row in rows.iter_mut() {
            row.refresh_line_total();
        }
        Self {
            columns: columns.into_iter().collect(),
            rows,
        }
    }

    /// 全列订单表（测试/程序化构造常用）
    pub fn with_all_columns(rows: Vec<PurchaseOrderLine>) -> Self {
        Self::new(PoColumn::ALL, rows)
    }

    pub fn rows(&self) -> &[PurchaseOrderLine] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: PoColumn) -> bool {
        self.columns.contains(&column)
    }

    /// 返回缺失的必需列（保持调用方给出的顺序）
    pub fn missing_columns(&self, required: &[PoColumn]) -> Vec<PoColumn> {
        required
            .iter()
            .copied()
            .filter(|c| !self.has_column(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_precomputed() {
        let table = PurchaseOrderTable::with_all_columns(vec![
            PurchaseOrderLine::new(Some("X1".into()), None, None, Some(5.0), Some(10.0)),
            PurchaseOrderLine::new(Some("X2".into()), None, None, None, Some(10.0)),
        ]);
        assert_eq!(table.rows()[0].line_total, Some(50.0));
        assert_eq!(table.rows()[1].line_total, None);
    }

    #[test]
    fn test_parse_order_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_order_date("2024-03-15"), Some(expected));
        assert_eq!(parse_order_date("2024/03/15"), Some(expected));
        assert_eq!(parse_order_date("20240315"), Some(expected));
        assert_eq!(parse_order_date("2024-03-15 08:30:00"), Some(expected));
        assert_eq!(parse_order_date("2024-03-15T08:30:00"), Some(expected));
        assert_eq!(parse_order_date("not a date"), None);
        assert_eq!(parse_order_date("  "), None);
    }

    #[test]
    fn test_missing_columns_keeps_requested_order() {
        let table = PurchaseOrderTable::new([PoColumn::ItemId], vec![]);
        let missing = table.missing_columns(&[PoColumn::UnitPrice, PoColumn::Quantity, PoColumn::ItemId]);
        assert_eq!(missing, vec![PoColumn::UnitPrice, PoColumn::Quantity]);
    }
}

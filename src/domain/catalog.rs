// ==========================================
// 采购预测分析引擎 - 主数据表
// ==========================================
// 职责: 供应商表、物料目录、其他辅助表（交货/发票/合同/预算/询价）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 供应商记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub supplier_id: String,
    pub supplier_name: Option<String>,
    pub category: Option<String>,
}

/// 供应商表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierTable {
    pub suppliers: Vec<SupplierRecord>,
}

impl SupplierTable {
    /// 按 supplier_id 查显示名称
    pub fn display_name(&self, supplier_id: &str) -> Option<&str> {
        self.suppliers
            .iter()
            .find(|s| s.supplier_id == supplier_id)
            .and_then(|s| s.supplier_name.as_deref())
    }
}

/// 物料记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_id: String,
    pub item_name: Option<String>,
    pub category: Option<String>,
}

/// 物料目录
///
/// `has_name_column = false` 表示源表没有 item_name 列，此时一律回退为 item_id。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub has_name_column: bool,
    pub items: Vec<ItemRecord>,
}

impl ItemCatalog {
    pub fn new(has_name_column: bool, items: Vec<ItemRecord>) -> Self {
        Self {
            has_name_column,
            items,
        }
    }

    /// item_id → item_name 索引（左连接用；重复 item_id 取首条）
    pub fn name_index(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::new();
        if !self.has_name_column {
            return index;
        }
        for item in &self.items {
            if let Some(name) = item.item_name.as_deref() {
                index.entry(item.item_id.as_str()).or_insert(name);
            }
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 辅助表（交货/发票/合同/预算/询价）
///
/// 当前五个分析器均不读取，仅按原始行透传，保持门面构造签名向前兼容。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuxiliaryTable {
    pub rows: Vec<HashMap<String, String>>,
}

impl AuxiliaryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

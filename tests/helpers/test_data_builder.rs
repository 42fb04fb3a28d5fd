// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use procurement_analytics::domain::catalog::{
    ItemCatalog, ItemRecord, SupplierRecord, SupplierTable,
};
use procurement_analytics::domain::purchase_order::{PurchaseOrderLine, PurchaseOrderTable};
use procurement_analytics::domain::snapshot::TableStore;

// ==========================================
// PurchaseOrderLine 构建器
// ==========================================

pub struct PurchaseOrderBuilder {
    item_id: Option<String>,
    supplier_id: Option<String>,
    order_date: Option<String>,
    quantity: Option<f64>,
    unit_price: Option<f64>,
}

impl PurchaseOrderBuilder {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: Some(item_id.to_string()),
            supplier_id: Some("SUP-001".to_string()),
            order_date: Some("2024-01-15".to_string()),
            quantity: Some(1.0),
            unit_price: Some(10.0),
        }
    }

    pub fn supplier(mut self, supplier_id: &str) -> Self {
        self.supplier_id = Some(supplier_id.to_string());
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.order_date = Some(date.to_string());
        self
    }

    pub fn no_date(mut self) -> Self {
        self.order_date = None;
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn no_price(mut self) -> Self {
        self.unit_price = None;
        self
    }

    pub fn build(self) -> PurchaseOrderLine {
        PurchaseOrderLine::new(
            self.item_id,
            self.supplier_id,
            self.order_date,
            self.quantity,
            self.unit_price,
        )
    }
}

// ==========================================
// 快照构建辅助
// ==========================================

pub fn orders(lines: Vec<PurchaseOrderLine>) -> PurchaseOrderTable {
    PurchaseOrderTable::with_all_columns(lines)
}

pub fn supplier_table(entries: &[(&str, &str)]) -> SupplierTable {
    SupplierTable {
        suppliers: entries
            .iter()
            .map(|(id, name)| SupplierRecord {
                supplier_id: id.to_string(),
                supplier_name: Some(name.to_string()),
                category: None,
            })
            .collect(),
    }
}

pub fn item_catalog(entries: &[(&str, &str)]) -> ItemCatalog {
    ItemCatalog::new(
        true,
        entries
            .iter()
            .map(|(id, name)| ItemRecord {
                item_id: id.to_string(),
                item_name: Some(name.to_string()),
                category: None,
            })
            .collect(),
    )
}

/// 一年期多物料、多供应商的常规采购快照（价格在小幅区间内波动）
pub fn year_of_orders(rows: usize) -> TableStore {
    let lines = (0..rows)
        .map(|i| {
            PurchaseOrderBuilder::new(&format!("ITEM-{:03}", i % 6))
                .supplier(&format!("SUP-{:03}", i % 4))
                .date(&format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1))
                .quantity((i % 10 + 1) as f64 * 5.0)
                .price(20.0 + (i % 13) as f64 * 0.5)
                .build()
        })
        .collect();

    TableStore::new(orders(lines))
        .with_suppliers(supplier_table(&[
            ("SUP-000", "Acme Components"),
            ("SUP-001", "Borealis Supply"),
        ]))
        .with_items(item_catalog(&[("ITEM-000", "Hex Bolt M8"), ("ITEM-001", "Flat Washer")]))
}

/// 物料 X1：单价 [10, 10, 10, 100]，数量各 5
pub fn x1_lines() -> Vec<PurchaseOrderLine> {
    [10.0, 10.0, 10.0, 100.0]
        .iter()
        .enumerate()
        .map(|(i, price)| {
            PurchaseOrderBuilder::new("X1")
                .date(&format!("2024-0{}-10", i + 1))
                .quantity(5.0)
                .price(*price)
                .build()
        })
        .collect()
}

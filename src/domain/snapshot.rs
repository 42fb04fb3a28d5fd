// ==========================================
// 采购预测分析引擎 - 表快照 (TableStore)
// ==========================================
// 职责: 一次分析请求所用的只读数据快照
// 生命周期: 每次分析请求构造一次，分析结束即丢弃
// ==========================================

use crate::domain::catalog::{AuxiliaryTable, ItemCatalog, SupplierTable};
use crate::domain::purchase_order::PurchaseOrderTable;

/// 表快照
///
/// 仅采购订单表为必需，其余为可选。
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    pub purchase_orders: PurchaseOrderTable,
    pub suppliers: Option<SupplierTable>,
    pub items: Option<ItemCatalog>,
    pub deliveries: Option<AuxiliaryTable>,
    pub invoices: Option<AuxiliaryTable>,
    pub contracts: Option<AuxiliaryTable>,
    pub budgets: Option<AuxiliaryTable>,
    pub rfqs: Option<AuxiliaryTable>,
}

impl TableStore {
    pub fn new(purchase_orders: PurchaseOrderTable) -> Self {
        Self {
            purchase_orders,
            ..Default::default()
        }
    }

    pub fn with_suppliers(mut self, suppliers: SupplierTable) -> Self {
        self.suppliers = Some(suppliers);
        self
    }

    pub fn with_items(mut self, items: ItemCatalog) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_deliveries(mut self, table: AuxiliaryTable) -> Self {
        self.deliveries = Some(table);
        self
    }

    pub fn with_invoices(mut self, table: AuxiliaryTable) -> Self {
        self.invoices = Some(table);
        self
    }

    pub fn with_contracts(mut self, table: AuxiliaryTable) -> Self {
        self.contracts = Some(table);
        self
    }

    pub fn with_budgets(mut self, table: AuxiliaryTable) -> Self {
        self.budgets = Some(table);
        self
    }

    pub fn with_rfqs(mut self, table: AuxiliaryTable) -> Self {
        self.rfqs = Some(table);
        self
    }
}

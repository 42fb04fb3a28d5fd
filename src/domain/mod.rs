// ==========================================
// 采购预测分析引擎 - 领域层
// ==========================================
// 职责: 实体、枚举、只读数据快照
// ==========================================

pub mod catalog;
pub mod purchase_order;
pub mod results;
pub mod snapshot;
pub mod types;

pub use catalog::{AuxiliaryTable, ItemCatalog, ItemRecord, SupplierRecord, SupplierTable};
pub use purchase_order::{parse_order_date, PurchaseOrderLine, PurchaseOrderTable};
pub use results::{
    AnomalyRecord, DemandBucket, ForecastPoint, ItemCostProfile, MonthlyAggregate, SupplierScore,
};
pub use snapshot::TableStore;
pub use types::{ForecastType, PoColumn, Priority, RiskLevel};

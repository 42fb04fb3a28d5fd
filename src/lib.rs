// ==========================================
// 采购预测分析引擎 - 核心库
// ==========================================
// 技术栈: Rust + tokio + calamine/csv
// 系统定位: 决策支持（只读分析，不修改任何源数据）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分析规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ForecastType, PoColumn, Priority, RiskLevel};

// 领域实体
pub use domain::{
    AnomalyRecord, DemandBucket, ForecastPoint, ItemCatalog, ItemCostProfile, MonthlyAggregate,
    PurchaseOrderLine, PurchaseOrderTable, SupplierScore, SupplierTable, TableStore,
};

// 引擎
pub use engine::{
    AnalysisOutcome, AnalyticsError, AnalyticsReport, CostOptimizationAnalyzer,
    DemandPatternAnalyzer, PredictiveAnalytics, PriceAnomalyDetector, SupplierPerformanceScorer,
    TrendForecaster,
};

// 配置
pub use config::{AnalyticsConfig, ConfigManager};

// 导入
pub use importer::{ImportError, SnapshotImporter, SnapshotSources};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "procurement-analytics";

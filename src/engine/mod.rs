// ==========================================
// 采购预测分析引擎 - 引擎层
// ==========================================
// 职责: 基于只读快照实现五项分析，不做任何 IO
// 红线: 分析器不抛错，空结果必须伴随原因说明
// ==========================================

pub mod cost_optimization;
pub mod demand_pattern;
pub mod error;
pub mod orchestrator;
pub mod outlier;
pub mod price_anomaly;
pub mod report;
pub mod stats;
pub mod summary;
pub mod supplier_performance;
pub mod trend_forecast;

// 重导出核心引擎
pub use cost_optimization::CostOptimizationAnalyzer;
pub use demand_pattern::DemandPatternAnalyzer;
pub use error::{AnalysisOutcome, AnalyticsError, AnalyticsResult};
pub use orchestrator::PredictiveAnalytics;
pub use outlier::{IsolationForest, IsolationForestModel, OutlierDetector};
pub use price_anomaly::PriceAnomalyDetector;
pub use report::AnalyticsReport;
pub use summary::{AnomalySummary, CostSummary, DemandSummary, ForecastSummary, SupplierSummary};
pub use supplier_performance::SupplierPerformanceScorer;
pub use trend_forecast::TrendForecaster;

// ==========================================
// 采购预测分析引擎 - 分析报告
// ==========================================
// 用途: run_all 的汇总输出（可序列化为 JSON）
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::results::{
    AnomalyRecord, DemandBucket, ForecastPoint, ItemCostProfile, MonthlyAggregate, SupplierScore,
};
use crate::engine::error::AnalysisOutcome;
use crate::engine::summary::{
    AnomalySummary, CostSummary, DemandSummary, ForecastSummary, SupplierSummary,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 一次全量分析的结果
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: AnalyticsConfig,
    pub total_orders: usize,

    pub cost_optimization: AnalysisOutcome<ItemCostProfile>,
    pub cost_summary: Option<CostSummary>,

    pub demand_patterns: AnalysisOutcome<DemandBucket>,
    pub demand_summary: Option<DemandSummary>,

    pub price_anomalies: AnalysisOutcome<AnomalyRecord>,
    pub anomaly_summary: Option<AnomalySummary>,

    pub supplier_performance: AnalysisOutcome<SupplierScore>,
    pub supplier_summary: Option<SupplierSummary>,

    pub forecasts: AnalysisOutcome<ForecastPoint>,
    pub forecast_summary: Option<ForecastSummary>,

    /// 月度历史（含移动平均），与预测配套展示
    pub history: AnalysisOutcome<MonthlyAggregate>,
}

impl AnalyticsReport {
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        config: AnalyticsConfig,
        total_orders: usize,
        cost_optimization: AnalysisOutcome<ItemCostProfile>,
        demand_patterns: AnalysisOutcome<DemandBucket>,
        price_anomalies: AnalysisOutcome<AnomalyRecord>,
        supplier_performance: AnalysisOutcome<SupplierScore>,
        forecasts: AnalysisOutcome<ForecastPoint>,
        history: AnalysisOutcome<MonthlyAggregate>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            config,
            total_orders,
            cost_summary: CostSummary::from_rows(&cost_optimization.rows),
            cost_optimization,
            demand_summary: DemandSummary::from_rows(&demand_patterns.rows),
            demand_patterns,
            anomaly_summary: AnomalySummary::from_rows(&price_anomalies.rows, total_orders),
            price_anomalies,
            supplier_summary: SupplierSummary::from_rows(&supplier_performance.rows),
            supplier_performance,
            forecast_summary: ForecastSummary::from_rows(&forecasts.rows),
            forecasts,
            history,
        }
    }

    /// 产出空结果的分析数
    ///
    /// 异常检测在价格全部正常时也可能为空，按消息判定是否成功
    pub fn failed_sections(&self) -> usize {
        let anomaly_failed = !self
            .price_anomalies
            .message
            .starts_with("Anomaly detection completed");
        [
            self.cost_optimization.is_empty(),
            self.demand_patterns.is_empty(),
            self.supplier_performance.is_empty(),
            self.forecasts.is_empty(),
            anomaly_failed,
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::AnalyticsError;

    #[test]
    fn test_failed_sections_counts_empty_outcomes() {
        let report = AnalyticsReport::assemble(
            AnalyticsConfig::default(),
            0,
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::success(Vec::new(), "Anomaly detection completed. Found 0 anomalies."),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
        );
        assert_eq!(report.failed_sections(), 4);
        assert!(report.cost_summary.is_none());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = AnalyticsReport::assemble(
            AnalyticsConfig::default(),
            0,
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
            AnalysisOutcome::failure(&AnalyticsError::EmptyInput),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["cost_optimization"]["message"],
            "No purchase order data available"
        );
        assert!(json["run_id"].is_string());
        assert!(json["cost_summary"].is_null());
    }
}

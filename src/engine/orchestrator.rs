// ==========================================
// 采购预测分析引擎 - 分析门面
// ==========================================
// 用途: 在同一份只读快照上编排五个分析器
// 约定: 分析器之间互不依赖；任一失败只影响自身结果
// 并发: run_all 将各分析器放入阻塞线程池并行执行，仅异常检测设超时
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::results::{
    AnomalyRecord, DemandBucket, ForecastPoint, ItemCostProfile, MonthlyAggregate, SupplierScore,
};
use crate::domain::snapshot::TableStore;
use crate::engine::error::{AnalysisOutcome, AnalyticsError};
use crate::engine::report::AnalyticsReport;
use crate::engine::{
    CostOptimizationAnalyzer, DemandPatternAnalyzer, PriceAnomalyDetector,
    SupplierPerformanceScorer, TrendForecaster,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::{info, warn};

// ==========================================
// PredictiveAnalytics - 分析门面
// ==========================================
pub struct PredictiveAnalytics {
    store: Arc<TableStore>,
    config: AnalyticsConfig,
}

impl PredictiveAnalytics {
    /// 创建门面（行金额等派生列已在订单表构造时预计算）
    pub fn new(store: TableStore, config: AnalyticsConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// 基于共享快照创建
    pub fn from_shared(store: Arc<TableStore>, config: AnalyticsConfig) -> Self {
        info!(
            purchase_orders = store.purchase_orders.len(),
            has_suppliers = store.suppliers.is_some(),
            has_items = store.items.is_some(),
            "分析门面已就绪"
        );
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    // ==========================================
    // 单项分析（同步）
    // ==========================================

    pub fn predict_cost_optimization(&self) -> AnalysisOutcome<ItemCostProfile> {
        CostOptimizationAnalyzer::new(&self.config)
            .analyze(&self.store.purchase_orders, self.store.items.as_ref())
    }

    pub fn predict_demand_patterns(&self) -> AnalysisOutcome<DemandBucket> {
        DemandPatternAnalyzer::new().analyze(&self.store.purchase_orders)
    }

    pub fn detect_price_anomalies(&self) -> AnalysisOutcome<AnomalyRecord> {
        PriceAnomalyDetector::new(&self.config).detect(&self.store.purchase_orders)
    }

    pub fn detect_price_anomalies_with(&self, contamination: f64) -> AnalysisOutcome<AnomalyRecord> {
        PriceAnomalyDetector::new(&self.config)
            .detect_with_contamination(&self.store.purchase_orders, contamination)
    }

    pub fn predict_supplier_performance(&self) -> AnalysisOutcome<SupplierScore> {
        SupplierPerformanceScorer::new()
            .score(&self.store.purchase_orders, self.store.suppliers.as_ref())
    }

    pub fn generate_forecasts(&self, periods: usize) -> AnalysisOutcome<ForecastPoint> {
        TrendForecaster::new(self.config.min_forecast_months)
            .forecast(&self.store.purchase_orders, periods)
    }

    pub fn monthly_history(&self) -> AnalysisOutcome<MonthlyAggregate> {
        TrendForecaster::new(self.config.min_forecast_months).history(&self.store.purchase_orders)
    }

    // ==========================================
    // 全量分析（并行）
    // ==========================================

    /// 并行执行全部分析并汇总报告
    pub async fn run_all(&self) -> AnalyticsReport {
        let _perf = crate::perf::PerfGuard::new("run_all", self.store.purchase_orders.len());
        info!(
            contamination = self.config.contamination,
            periods = self.config.forecast_periods,
            seed = self.config.random_seed,
            "开始执行全量分析"
        );

        let cost = self.spawn(|facade| facade.predict_cost_optimization());
        let demand = self.spawn(|facade| facade.predict_demand_patterns());
        let supplier = self.spawn(|facade| facade.predict_supplier_performance());
        let periods = self.config.forecast_periods;
        let forecast = self.spawn(move |facade| facade.generate_forecasts(periods));
        let history = self.spawn(|facade| facade.monthly_history());
        let anomaly = self.spawn(|facade| facade.detect_price_anomalies());

        let timeout_ms = self.config.anomaly_timeout_ms;
        let anomaly = async move {
            match tokio::time::timeout(Duration::from_millis(timeout_ms), anomaly).await {
                Ok(joined) => settle(joined),
                Err(_) => {
                    warn!(timeout_ms, "价格异常检测超时");
                    AnalysisOutcome::failure(&AnalyticsError::Timeout {
                        stage: "Anomaly detection",
                        timeout_ms,
                    })
                }
            }
        };

        let (cost, demand, supplier, forecast, history, anomaly) =
            tokio::join!(cost, demand, supplier, forecast, history, anomaly);

        let report = AnalyticsReport::assemble(
            self.config.clone(),
            self.store.purchase_orders.len(),
            settle(cost),
            settle(demand),
            anomaly,
            settle(supplier),
            settle(forecast),
            settle(history),
        );

        info!(run_id = %report.run_id, "全量分析完成");
        report
    }

    /// 在阻塞线程池中对一份克隆的门面执行分析
    fn spawn<T, F>(&self, job: F) -> tokio::task::JoinHandle<AnalysisOutcome<T>>
    where
        T: Send + 'static,
        F: FnOnce(&PredictiveAnalytics) -> AnalysisOutcome<T> + Send + 'static,
    {
        let facade = PredictiveAnalytics {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        };
        tokio::task::spawn_blocking(move || job(&facade))
    }
}

/// 线程池任务结果落地；分析器内 panic 视为程序错误，原样继续传播
fn settle<T>(joined: Result<AnalysisOutcome<T>, JoinError>) -> AnalysisOutcome<T> {
    match joined {
        Ok(outcome) => outcome,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => AnalysisOutcome::failure(&AnalyticsError::computation(
            "analysis task",
            err.to_string(),
        )),
    }
}

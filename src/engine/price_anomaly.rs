// ==========================================
// 采购预测分析引擎 - 价格异常检测
// ==========================================
// 输入: 采购订单表（需 unit_price 列）
// 输出: 被判为离群的订单行 + 异常分数
// 流程: 剔除缺失价格 → 标准化 → 拟合离群模型 → 按 contamination 分位切分
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::purchase_order::PurchaseOrderTable;
use crate::domain::results::AnomalyRecord;
use crate::domain::types::PoColumn;
use crate::engine::error::{AnalysisOutcome, AnalyticsError, AnalyticsResult};
use crate::engine::outlier::{IsolationForest, OutlierDetector};
use crate::engine::stats;
use tracing::debug;

const STAGE: &str = "anomaly detection";

// ==========================================
// PriceAnomalyDetector - 价格异常检测器
// ==========================================
pub struct PriceAnomalyDetector<D: OutlierDetector = IsolationForest> {
    detector: D,
    contamination: f64,
    min_observations: usize,
}

impl PriceAnomalyDetector<IsolationForest> {
    /// 使用孤立森林构造（种子/树数/子采样取自配置）
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self::with_detector(
            IsolationForest::new(config.n_estimators, config.max_samples, config.random_seed),
            config.contamination,
            config.min_anomaly_observations,
        )
    }
}

impl<D: OutlierDetector> PriceAnomalyDetector<D> {
    /// 注入任意离群检测实现
    pub fn with_detector(detector: D, contamination: f64, min_observations: usize) -> Self {
        Self {
            detector,
            contamination,
            min_observations,
        }
    }

    /// 按配置的 contamination 检测
    pub fn detect(&self, orders: &PurchaseOrderTable) -> AnalysisOutcome<AnomalyRecord> {
        self.detect_with_contamination(orders, self.contamination)
    }

    /// 指定 contamination 检测（不抛错，失败折叠为空表 + 消息）
    pub fn detect_with_contamination(
        &self,
        orders: &PurchaseOrderTable,
        contamination: f64,
    ) -> AnalysisOutcome<AnomalyRecord> {
        let _perf = crate::perf::PerfGuard::new("detect_price_anomalies", orders.len());
        AnalysisOutcome::from_result("price_anomaly", self.try_detect(orders, contamination))
    }

    /// 检测主流程
    pub fn try_detect(
        &self,
        orders: &PurchaseOrderTable,
        contamination: f64,
    ) -> AnalyticsResult<(Vec<AnomalyRecord>, String)> {
        if orders.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }
        let missing = orders.missing_columns(&[PoColumn::UnitPrice]);
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingColumns(missing));
        }
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "contamination must be in (0, 0.5], got {}",
                contamination
            )));
        }

        // 1. 剔除缺失价格（保留原行下标）
        let priced: Vec<(usize, f64)> = orders
            .rows()
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.unit_price.filter(|p| p.is_finite()).map(|p| (i, p)))
            .collect();

        if priced.len() < self.min_observations {
            return Err(AnalyticsError::InsufficientData(format!(
                "Insufficient data for anomaly detection (need at least {} records)",
                self.min_observations
            )));
        }

        // 2. 标准化（零均值、单位方差）
        let prices: Vec<f64> = priced.iter().map(|(_, p)| *p).collect();
        let mean = stats::mean(&prices).unwrap_or(0.0);
        let std = stats::population_std(&prices);
        if std <= 0.0 {
            return Err(AnalyticsError::computation(
                STAGE,
                "degenerate price distribution (all unit prices are identical)",
            ));
        }
        let samples: Vec<Vec<f64>> = prices.iter().map(|p| vec![(p - mean) / std]).collect();

        // 3. 拟合并打分
        let model = self.detector.fit(&samples)?;
        let scores = self.detector.score(&model, &samples);
        if scores.len() != samples.len() {
            return Err(AnalyticsError::computation(
                STAGE,
                format!("detector returned {} scores for {} samples", scores.len(), samples.len()),
            ));
        }

        // 4. 以 contamination 分位为阈值，低于阈值即离群
        let offset = stats::percentile(&scores, contamination * 100.0)
            .ok_or_else(|| AnalyticsError::computation(STAGE, "empty score set"))?;

        let mut flagged: Vec<(usize, f64)> = priced
            .iter()
            .zip(scores.iter())
            .map(|((row_idx, _), score)| (*row_idx, score - offset))
            .filter(|(_, decision)| *decision < 0.0)
            .collect();

        // 标记比例不超过一半
        let cap = priced.len() / 2;
        if flagged.len() > cap {
            flagged.sort_by(|a, b| a.1.total_cmp(&b.1));
            flagged.truncate(cap);
            flagged.sort_by_key(|(row_idx, _)| *row_idx);
        }

        debug!(
            observations = priced.len(),
            flagged = flagged.len(),
            offset,
            "价格异常检测完成"
        );

        let records: Vec<AnomalyRecord> = flagged
            .into_iter()
            .map(|(row_idx, decision)| AnomalyRecord {
                line: orders.rows()[row_idx].clone(),
                is_anomaly: true,
                anomaly_score: decision,
            })
            .collect();

        let message = format!("Anomaly detection completed. Found {} anomalies.", records.len());
        Ok((records, message))
    }
}

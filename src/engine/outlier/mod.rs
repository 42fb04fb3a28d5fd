// ==========================================
// 采购预测分析引擎 - 离群检测模型抽象
// ==========================================
// 职责: fit(samples) -> Model, score(Model, samples) -> scores
// 约定: 分数越低越异常（与 decision function 口径一致前的原始分）
// ==========================================

pub mod isolation_forest;

pub use isolation_forest::{IsolationForest, IsolationForestModel};

use crate::engine::error::AnalyticsResult;

/// 离群检测能力
///
/// 任何满足 contamination/确定性要求的集成或密度类检测器都可替换实现。
pub trait OutlierDetector: Send + Sync {
    type Model: Send + Sync;

    /// 在样本上拟合模型（每个样本为一个特征向量）
    fn fit(&self, samples: &[Vec<f64>]) -> AnalyticsResult<Self::Model>;

    /// 样本正常度分数，越低越异常
    fn score(&self, model: &Self::Model, samples: &[Vec<f64>]) -> Vec<f64>;
}

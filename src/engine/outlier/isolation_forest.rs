// ==========================================
// 采购预测分析引擎 - 孤立森林
// ==========================================
// 算法: 随机划分树集成，平均路径长度越短越容易被孤立（越异常）
// 分数: score = -2^(-E[h(x)] / c(ψ))，越低越异常
// 确定性: 同一种子 + 同一输入 => 同一结果
// ==========================================

use crate::engine::error::{AnalyticsError, AnalyticsResult};
use crate::engine::outlier::OutlierDetector;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// c(n): n 个样本的二叉搜索树中不成功查找的平均路径长度
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

// ==========================================
// 孤立树
// ==========================================

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn build(points: Vec<&[f64]>, depth: usize, height_limit: usize, rng: &mut StdRng) -> Node {
        if points.len() <= 1 || depth >= height_limit {
            return Node::Leaf { size: points.len() };
        }

        // 只在取值有跨度的特征上划分
        let dims = points[0].len();
        let spans: Vec<(usize, f64, f64)> = (0..dims)
            .filter_map(|f| {
                let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[f]), hi.max(p[f]))
                });
                (hi > lo).then_some((f, lo, hi))
            })
            .collect();

        if spans.is_empty() {
            return Node::Leaf { size: points.len() };
        }

        let (feature, lo, hi) = spans[rng.gen_range(0..spans.len())];
        let threshold = rng.gen_range(lo..hi);

        let (left, right): (Vec<&[f64]>, Vec<&[f64]>) =
            points.into_iter().partition(|p| p[feature] < threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Node::build(left, depth + 1, height_limit, rng)),
            right: Box::new(Node::build(right, depth + 1, height_limit, rng)),
        }
    }

    fn path_length(&self, point: &[f64]) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if point[*feature] < *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

// ==========================================
// IsolationForest - 检测器配置
// ==========================================

/// 孤立森林检测器
#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: usize,
    seed: u64,
}

/// 拟合后的孤立森林
#[derive(Debug, Clone)]
pub struct IsolationForestModel {
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForestModel {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl IsolationForest {
    pub fn new(n_estimators: usize, max_samples: usize, seed: u64) -> Self {
        Self {
            n_estimators: n_estimators.max(1),
            max_samples: max_samples.max(2),
            seed,
        }
    }
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new(100, 256, 42)
    }
}

impl OutlierDetector for IsolationForest {
    type Model = IsolationForestModel;

    fn fit(&self, samples: &[Vec<f64>]) -> AnalyticsResult<Self::Model> {
        if samples.len() < 2 {
            return Err(AnalyticsError::computation(
                "isolation forest fitting",
                format!("need at least 2 samples, got {}", samples.len()),
            ));
        }
        let dims = samples[0].len();
        if dims == 0 || samples.iter().any(|s| s.len() != dims) {
            return Err(AnalyticsError::computation(
                "isolation forest fitting",
                "samples must share a non-zero dimension",
            ));
        }
        if samples.iter().flatten().any(|v| !v.is_finite()) {
            return Err(AnalyticsError::computation(
                "isolation forest fitting",
                "samples contain non-finite values",
            ));
        }

        let sample_size = self.max_samples.min(samples.len());
        let height_limit = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let trees = (0..self.n_estimators)
            .map(|_| {
                let picked: Vec<&[f64]> = sample(&mut rng, samples.len(), sample_size)
                    .into_iter()
                    .map(|i| samples[i].as_slice())
                    .collect();
                Node::build(picked, 0, height_limit, &mut rng)
            })
            .collect();

        Ok(IsolationForestModel { trees, sample_size })
    }

    fn score(&self, model: &Self::Model, samples: &[Vec<f64>]) -> Vec<f64> {
        let normalizer = average_path_length(model.sample_size);
        let n_trees = model.trees.len().max(1) as f64;

        samples
            .iter()
            .map(|point| {
                let mean_path =
                    model.trees.iter().map(|t| t.path_length(point)).sum::<f64>() / n_trees;
                let anomaly = if normalizer > 0.0 {
                    2f64.powf(-mean_path / normalizer)
                } else {
                    0.5
                };
                -anomaly
            })
            .collect()
    }
}

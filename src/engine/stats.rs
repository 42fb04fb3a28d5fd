// ==========================================
// 采购预测分析引擎 - 统计工具
// ==========================================
// 职责: 均值/样本标准差/分位数/舍入，以及饱和除法
// 红线: 除零保护集中在此处，分析器内不写零值特判
// 说明: 均值/标准差基于 statrs；分位数需按秩线性插值，保留手写实现
// ==========================================

use statrs::statistics::Statistics;

/// 算术平均（空集 => None）
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// 样本标准差 (ddof = 1)
///
/// 少于 2 个观测时样本标准差无定义，按 0 处理。
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().std_dev()
}

/// 总体标准差 (ddof = 0)，用于标准化
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}

/// 饱和比值: 分母非正或结果非有限时返回 `fallback`
pub fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator <= 0.0 {
        return fallback;
    }
    let r = numerator / denominator;
    if r.is_finite() {
        r
    } else {
        fallback
    }
}

/// 变异系数 std / mean（均值为 0 时为 0）
pub fn coefficient_of_variation(std: f64, mean: f64) -> f64 {
    ratio_or(std, mean, 0.0).max(0.0)
}

/// 价格效率 1 / (1 + std/mean)，std 为 0 或 mean 为 0 时为 1
pub fn price_efficiency(std: f64, mean: f64) -> f64 {
    let cv = ratio_or(std, mean, 0.0).max(0.0);
    1.0 / (1.0 + cv)
}

/// 线性插值分位数（q ∈ [0, 100]），输入无需有序
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 100.0);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 尾随滑动平均（窗口 `window`，min_periods = 1）
pub fn trailing_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 分析参数（一次分析请求的有效配置）
///
/// 所有字段均有默认值，JSON 中缺省的字段按默认值补齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 异常比例（孤立森林 contamination），(0, 0.5]
    pub contamination: f64,

    /// 预测月数
    pub forecast_periods: usize,

    /// 随机种子（孤立森林抽样 + 节省比例估算）
    pub random_seed: u64,

    /// 孤立树数量
    pub n_estimators: usize,

    /// 每棵树的子采样上限
    pub max_samples: usize,

    /// 异常检测超时（毫秒），仅作用于异常检测步骤
    pub anomaly_timeout_ms: u64,

    /// 节省比例区间下限（%）
    pub savings_pct_min: f64,

    /// 节省比例区间上限（%）
    pub savings_pct_max: f64,

    /// 高优先级节省金额阈值（严格大于）
    pub high_priority_threshold: f64,

    /// 中优先级节省金额阈值（大于等于）
    pub medium_priority_threshold: f64,

    /// 异常检测所需最少有效价格数
    pub min_anomaly_observations: usize,

    /// 趋势预测所需最少历史月数
    pub min_forecast_months: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            contamination: 0.1,
            forecast_periods: 12,
            random_seed: 42,
            n_estimators: 100,
            max_samples: 256,
            anomaly_timeout_ms: 5_000,
            savings_pct_min: 10.0,
            savings_pct_max: 20.0,
            high_priority_threshold: 10_000.0,
            medium_priority_threshold: 5_000.0,
            min_anomaly_observations: 10,
            min_forecast_months: 3,
        }
    }
}

impl AnalyticsConfig {
    /// 校验参数取值范围
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(invalid(
                "contamination",
                self.contamination,
                "must be in (0, 0.5]",
            ));
        }
        if self.forecast_periods == 0 {
            return Err(invalid("forecast_periods", 0, "must be >= 1"));
        }
        if self.n_estimators == 0 {
            return Err(invalid("n_estimators", 0, "must be >= 1"));
        }
        if self.max_samples < 2 {
            return Err(invalid("max_samples", self.max_samples, "must be >= 2"));
        }
        if !(0.0..=100.0).contains(&self.savings_pct_min)
            || !(0.0..=100.0).contains(&self.savings_pct_max)
            || self.savings_pct_min > self.savings_pct_max
        {
            return Err(invalid(
                "savings_pct_min/savings_pct_max",
                format!("{}..{}", self.savings_pct_min, self.savings_pct_max),
                "must satisfy 0 <= min <= max <= 100",
            ));
        }
        if self.medium_priority_threshold > self.high_priority_threshold {
            return Err(invalid(
                "medium_priority_threshold",
                self.medium_priority_threshold,
                "must not exceed high_priority_threshold",
            ));
        }
        if self.min_anomaly_observations < 2 {
            return Err(invalid(
                "min_anomaly_observations",
                self.min_anomaly_observations,
                "must be >= 2",
            ));
        }
        if self.min_forecast_months == 0 {
            return Err(invalid("min_forecast_months", 0, "must be >= 1"));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString, message: &str) -> ConfigError {
    ConfigError::ConfigValueError {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalyticsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_contamination_above_half_rejected() {
        let config = AnalyticsConfig {
            contamination: 0.6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_savings_range_rejected() {
        let config = AnalyticsConfig {
            savings_pct_min: 30.0,
            savings_pct_max: 20.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalyticsConfig = serde_json::from_str(r#"{"contamination": 0.05}"#).unwrap();
        assert_eq!(config.contamination, 0.05);
        assert_eq!(config.forecast_periods, 12);
        assert_eq!(config.random_seed, 42);
    }
}

// ==========================================
// 采购预测分析引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::analytics_config::AnalyticsConfig;
use crate::config::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 环境变量前缀（键名转大写后拼接）
pub const ENV_PREFIX: &str = "PROCUREMENT_ANALYTICS_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    values: HashMap<String, String>,
    env_prefix: Option<String>,
    source: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// 空配置（全部走默认值，仍接受环境变量覆写）
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            env_prefix: Some(ENV_PREFIX.to_string()),
            source: None,
        }
    }

    /// 从键值表创建
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values,
            ..Self::new()
        }
    }

    /// 从 JSON 对象文件加载
    ///
    /// 文件格式: `{"contamination": 0.1, "forecast_periods": "6"}`，
    /// 数值与字符串均可，统一按字符串存储。
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let parsed: BTreeMap<String, Value> = serde_json::from_str(&raw)?;
        let values = parsed
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect();

        tracing::info!(path = %path.display(), "已加载配置文件");

        Ok(Self {
            values,
            env_prefix: Some(ENV_PREFIX.to_string()),
            source: Some(path.to_path_buf()),
        })
    }

    /// 加载默认位置的配置文件；文件不存在时使用默认值
    pub fn load_default() -> ConfigResult<Self> {
        let path = default_config_path();
        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            Ok(Self::new())
        }
    }

    /// 替换环境变量前缀（None 表示不读取环境变量）
    pub fn with_env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(|p| p.to_string());
        self
    }

    /// 配置来源文件
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 覆写单个配置值
    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// 读取配置值（环境变量优先）
    fn get_config_value(&self, key: &str) -> Option<String> {
        if let Some(prefix) = &self.env_prefix {
            let env_key = format!("{}{}", prefix, key.to_uppercase());
            if let Ok(v) = std::env::var(&env_key) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 读取并解析配置值，缺失或格式错误时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy,
    {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => match raw.parse::<T>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        "配置值格式错误，使用默认值"
                    );
                    default
                }
            },
        }
    }

    // ===== 异常检测配置 =====

    pub fn get_contamination(&self) -> f64 {
        self.get_parsed_or_default(config_keys::CONTAMINATION, AnalyticsConfig::default().contamination)
    }

    pub fn get_random_seed(&self) -> u64 {
        self.get_parsed_or_default(config_keys::RANDOM_SEED, AnalyticsConfig::default().random_seed)
    }

    pub fn get_n_estimators(&self) -> usize {
        self.get_parsed_or_default(config_keys::N_ESTIMATORS, AnalyticsConfig::default().n_estimators)
    }

    pub fn get_max_samples(&self) -> usize {
        self.get_parsed_or_default(config_keys::MAX_SAMPLES, AnalyticsConfig::default().max_samples)
    }

    pub fn get_anomaly_timeout_ms(&self) -> u64 {
        self.get_parsed_or_default(
            config_keys::ANOMALY_TIMEOUT_MS,
            AnalyticsConfig::default().anomaly_timeout_ms,
        )
    }

    pub fn get_min_anomaly_observations(&self) -> usize {
        self.get_parsed_or_default(
            config_keys::MIN_ANOMALY_OBSERVATIONS,
            AnalyticsConfig::default().min_anomaly_observations,
        )
    }

    // ===== 预测配置 =====

    pub fn get_forecast_periods(&self) -> usize {
        self.get_parsed_or_default(
            config_keys::FORECAST_PERIODS,
            AnalyticsConfig::default().forecast_periods,
        )
    }

    pub fn get_min_forecast_months(&self) -> usize {
        self.get_parsed_or_default(
            config_keys::MIN_FORECAST_MONTHS,
            AnalyticsConfig::default().min_forecast_months,
        )
    }

    // ===== 成本优化配置 =====

    /// 节省比例区间（%），格式 "10,20"
    pub fn get_savings_pct_range(&self) -> (f64, f64) {
        let defaults = AnalyticsConfig::default();
        let fallback = (defaults.savings_pct_min, defaults.savings_pct_max);
        let Some(raw) = self.get_config_value(config_keys::SAVINGS_PCT_RANGE) else {
            return fallback;
        };

        let parts: Vec<f64> = raw
            .split(',')
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .collect();

        match parts.as_slice() {
            [min, max] => (*min, *max),
            _ => {
                tracing::warn!(
                    config_key = config_keys::SAVINGS_PCT_RANGE,
                    raw_value = %raw,
                    "节省比例区间格式错误，使用默认值"
                );
                fallback
            }
        }
    }

    pub fn get_high_priority_threshold(&self) -> f64 {
        self.get_parsed_or_default(
            config_keys::HIGH_PRIORITY_THRESHOLD,
            AnalyticsConfig::default().high_priority_threshold,
        )
    }

    pub fn get_medium_priority_threshold(&self) -> f64 {
        self.get_parsed_or_default(
            config_keys::MEDIUM_PRIORITY_THRESHOLD,
            AnalyticsConfig::default().medium_priority_threshold,
        )
    }

    // ===== 汇总 =====

    /// 组装并校验有效分析参数
    pub fn analytics_config(&self) -> ConfigResult<AnalyticsConfig> {
        let (savings_pct_min, savings_pct_max) = self.get_savings_pct_range();
        let config = AnalyticsConfig {
            contamination: self.get_contamination(),
            forecast_periods: self.get_forecast_periods(),
            random_seed: self.get_random_seed(),
            n_estimators: self.get_n_estimators(),
            max_samples: self.get_max_samples(),
            anomaly_timeout_ms: self.get_anomaly_timeout_ms(),
            savings_pct_min,
            savings_pct_max,
            high_priority_threshold: self.get_high_priority_threshold(),
            medium_priority_threshold: self.get_medium_priority_threshold(),
            min_anomaly_observations: self.get_min_anomaly_observations(),
            min_forecast_months: self.get_min_forecast_months(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 有效配置快照（JSON），随报告一起输出便于复现
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config = self.analytics_config()?;
        Ok(serde_json::to_string(&config)?)
    }
}

/// 默认配置文件路径
///
/// 可通过 `PROCUREMENT_ANALYTICS_CONFIG` 显式指定；否则使用用户配置目录。
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("PROCUREMENT_ANALYTICS_CONFIG") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("procurement-analytics").join("config.json"),
        None => PathBuf::from("./procurement_analytics.json"),
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 异常检测
    pub const CONTAMINATION: &str = "contamination";
    pub const RANDOM_SEED: &str = "random_seed";
    pub const N_ESTIMATORS: &str = "n_estimators";
    pub const MAX_SAMPLES: &str = "max_samples";
    pub const ANOMALY_TIMEOUT_MS: &str = "anomaly_timeout_ms";
    pub const MIN_ANOMALY_OBSERVATIONS: &str = "min_anomaly_observations";

    // 趋势预测
    pub const FORECAST_PERIODS: &str = "forecast_periods";
    pub const MIN_FORECAST_MONTHS: &str = "min_forecast_months";

    // 成本优化
    pub const SAVINGS_PCT_RANGE: &str = "savings_pct_range"; // "10,20"
    pub const HIGH_PRIORITY_THRESHOLD: &str = "high_priority_threshold";
    pub const MEDIUM_PRIORITY_THRESHOLD: &str = "medium_priority_threshold";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn isolated(manager: ConfigManager) -> ConfigManager {
        manager.with_env_prefix(None)
    }

    #[test]
    fn test_empty_manager_yields_defaults() {
        let manager = isolated(ConfigManager::new());
        assert_eq!(manager.analytics_config().unwrap(), AnalyticsConfig::default());
    }

    #[test]
    fn test_from_file_accepts_numbers_and_strings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"contamination": 0.05, "forecast_periods": "6", "savings_pct_range": "5,15"}}"#
        )
        .unwrap();

        let manager = isolated(ConfigManager::from_file(file.path()).unwrap());
        let config = manager.analytics_config().unwrap();
        assert_eq!(config.contamination, 0.05);
        assert_eq!(config.forecast_periods, 6);
        assert_eq!(config.savings_pct_min, 5.0);
        assert_eq!(config.savings_pct_max, 15.0);
        assert_eq!(manager.source(), Some(file.path()));
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let mut values = HashMap::new();
        values.insert(config_keys::RANDOM_SEED.to_string(), "abc".to_string());
        let manager = isolated(ConfigManager::from_map(values));
        assert_eq!(manager.get_random_seed(), 42);
    }

    #[test]
    fn test_invalid_contamination_rejected() {
        let mut manager = isolated(ConfigManager::new());
        manager.set(config_keys::CONTAMINATION, 0.9);
        assert!(matches!(
            manager.analytics_config(),
            Err(ConfigError::ConfigValueError { .. })
        ));
    }

    #[test]
    fn test_env_override_wins_over_file_value() {
        let mut manager = ConfigManager::new().with_env_prefix(Some("PA_CFG_TEST_OVERRIDE_"));
        manager.set(config_keys::N_ESTIMATORS, 50);
        std::env::set_var("PA_CFG_TEST_OVERRIDE_N_ESTIMATORS", "25");
        assert_eq!(manager.get_n_estimators(), 25);
        std::env::remove_var("PA_CFG_TEST_OVERRIDE_N_ESTIMATORS");
        assert_eq!(manager.get_n_estimators(), 50);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = ConfigManager::from_file("/nonexistent/procurement/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigReadError { .. }));
    }

    #[test]
    fn test_config_snapshot_is_json() {
        let manager = isolated(ConfigManager::new());
        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: AnalyticsConfig = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed, AnalyticsConfig::default());
    }
}

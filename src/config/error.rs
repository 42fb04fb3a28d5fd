// ==========================================
// 采购预测分析引擎 - 配置错误类型
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error("配置文件格式错误: {0}")]
    ConfigParseError(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ConfigParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

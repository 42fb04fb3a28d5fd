// ==========================================
// 采购预测分析引擎 - 配置层
// ==========================================
// 职责: 分析参数加载、查询、覆写管理
// 存储: JSON 键值文件 + 环境变量覆写
// ==========================================

pub mod analytics_config;
pub mod config_manager;
pub mod error;

// 重导出核心配置类型
pub use analytics_config::AnalyticsConfig;
pub use config_manager::{config_keys, default_config_path, ConfigManager};
pub use error::{ConfigError, ConfigResult};

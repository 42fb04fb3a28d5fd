// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 日志统一写 stderr，stdout 留给 JSON 报告
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读（默认）
    Pretty,
    /// 每行一个 JSON 事件
    Json,
}

impl LogFormat {
    /// 从 `PROCUREMENT_ANALYTICS_LOG_FORMAT` 读取，未设置或无法识别时为 Pretty
    pub fn from_env() -> Self {
        match std::env::var("PROCUREMENT_ANALYTICS_LOG_FORMAT") {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=procurement_analytics=trace,perf=info
/// - PROCUREMENT_ANALYTICS_LOG_FORMAT: `json` 切换为结构化输出
///
/// # 示例
/// ```no_run
/// use procurement_analytics::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_format(LogFormat::from_env());
}

/// 以指定格式初始化（重复调用安全）
pub fn init_with_format(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test();
        init_with_format(LogFormat::Pretty);
        tracing::debug!("logging still usable");
    }
}

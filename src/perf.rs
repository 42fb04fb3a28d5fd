// ==========================================
// 性能统计
// ==========================================
// 开关:
// - Debug 默认开启；Release 默认关闭
// - `PROCUREMENT_ANALYTICS_PERF=1` 强制开启，`=0` 强制关闭
// ==========================================

use std::sync::OnceLock;
use std::time::Instant;

static PERF_ENABLED: OnceLock<bool> = OnceLock::new();

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 是否输出 perf 日志（首次调用时读取环境变量）
pub fn enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| match std::env::var("PROCUREMENT_ANALYTICS_PERF") {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    })
}

/// 性能统计 Guard：记录 elapsed_ms + 输入行数
///
/// 使用方式：
/// ```ignore
/// let _perf = procurement_analytics::perf::PerfGuard::new("detect_price_anomalies", orders.len());
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    rows: usize,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str, rows: usize) -> Self {
        Self {
            op,
            rows,
            start: Instant::now(),
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if !enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            rows = self.rows,
            "done"
        );
    }
}

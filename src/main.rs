// ==========================================
// 采购预测分析引擎 - 命令行入口
// ==========================================
// 用法:
//   procurement-analytics <purchase_orders> [--suppliers F] [--items F]
//       [--config F] [--periods N] [--contamination X] [--seed N]
// 输出: JSON 报告写 stdout，日志写 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use procurement_analytics::config::{config_keys, ConfigManager};
use procurement_analytics::importer::{SnapshotImporter, SnapshotSources};
use procurement_analytics::{logging, PredictiveAnalytics};
use std::future::Future;
use std::path::PathBuf;

const USAGE: &str = "usage: procurement-analytics <purchase_orders> [--suppliers F] [--items F] \
[--config F] [--periods N] [--contamination X] [--seed N]";

#[derive(Debug, Default)]
struct CliArgs {
    purchase_orders: Option<PathBuf>,
    suppliers: Option<PathBuf>,
    items: Option<PathBuf>,
    config: Option<PathBuf>,
    periods: Option<String>,
    contamination: Option<String>,
    seed: Option<String>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{} requires a value\n{}", flag, USAGE))
            };
            match arg.as_str() {
                "--suppliers" => parsed.suppliers = Some(value("--suppliers")?.into()),
                "--items" => parsed.items = Some(value("--items")?.into()),
                "--config" => parsed.config = Some(value("--config")?.into()),
                "--periods" => parsed.periods = Some(value("--periods")?),
                "--contamination" => parsed.contamination = Some(value("--contamination")?),
                "--seed" => parsed.seed = Some(value("--seed")?),
                "-h" | "--help" => bail!("{}", USAGE),
                flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
                _ if parsed.purchase_orders.is_none() => {
                    parsed.purchase_orders = Some(PathBuf::from(&arg))
                }
                _ => bail!("unexpected argument {}\n{}", arg, USAGE),
            }
        }

        Ok(parsed)
    }
}

/// 在多线程运行时上执行 `future`，结束后不等待仍在阻塞线程池中的任务
///
/// 超时的异常检测任务无法被取消，若随运行时析构等待，进程会一直挂起到其算完。
fn block_on_detached<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    block_on_detached(run(args))?
}

async fn run(args: CliArgs) -> Result<()> {
    let purchase_orders = args
        .purchase_orders
        .clone()
        .with_context(|| format!("missing purchase order file\n{}", USAGE))?;

    tracing::info!("==================================================");
    tracing::info!("采购预测分析引擎 v{}", procurement_analytics::VERSION);
    tracing::info!("==================================================");

    // 配置：文件 → 命令行覆写 → 校验
    let mut manager = match &args.config {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConfigManager::load_default().context("failed to load default config")?,
    };
    if let Some(periods) = &args.periods {
        manager.set(config_keys::FORECAST_PERIODS, periods);
    }
    if let Some(contamination) = &args.contamination {
        manager.set(config_keys::CONTAMINATION, contamination);
    }
    if let Some(seed) = &args.seed {
        manager.set(config_keys::RANDOM_SEED, seed);
    }
    let config = manager.analytics_config().context("invalid analytics config")?;

    // 快照
    let mut sources = SnapshotSources::new(purchase_orders);
    if let Some(path) = args.suppliers {
        sources = sources.with_suppliers(path);
    }
    if let Some(path) = args.items {
        sources = sources.with_items(path);
    }
    let store = tokio::task::spawn_blocking(move || SnapshotImporter::default().load(&sources))
        .await
        .context("snapshot loading task failed")?
        .context("failed to load snapshot")?;

    let report = PredictiveAnalytics::new(store, config).run_all().await;
    if report.failed_sections() > 0 {
        tracing::warn!(failed = report.failed_sections(), "部分分析未产出结果");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let parsed = CliArgs::parse(args(&[
            "po.csv",
            "--items",
            "items.xlsx",
            "--periods",
            "6",
            "--seed",
            "7",
        ]))
        .unwrap();

        assert_eq!(parsed.purchase_orders, Some(PathBuf::from("po.csv")));
        assert_eq!(parsed.items, Some(PathBuf::from("items.xlsx")));
        assert_eq!(parsed.periods.as_deref(), Some("6"));
        assert_eq!(parsed.seed.as_deref(), Some("7"));
        assert!(parsed.suppliers.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        assert!(CliArgs::parse(args(&["po.csv", "--verbose"])).is_err());
    }

    #[test]
    fn test_parse_flag_without_value() {
        assert!(CliArgs::parse(args(&["po.csv", "--periods"])).is_err());
    }

    #[test]
    fn test_block_on_detached_does_not_wait_for_blocking_tasks() {
        let started = std::time::Instant::now();
        let output = block_on_detached(async {
            // 模拟超时后仍在计算的分析任务
            drop(tokio::task::spawn_blocking(|| {
                std::thread::sleep(std::time::Duration::from_secs(5))
            }));
            42
        })
        .unwrap();

        assert_eq!(output, 42);
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }
}

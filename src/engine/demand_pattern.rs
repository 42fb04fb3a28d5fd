// ==========================================
// 采购预测分析引擎 - 需求模式分析
// ==========================================
// 输入: 采购订单表（需 order_date / item_id）
// 输出: (item_id, year, quarter) 季度桶，按 (item_id, bucket_date) 升序
// 约定: 无法解析的日期视为缺失并剔除，不作为致命错误
// ==========================================

use crate::domain::purchase_order::PurchaseOrderTable;
use crate::domain::results::DemandBucket;
use crate::domain::types::PoColumn;
use crate::engine::error::{AnalysisOutcome, AnalyticsError, AnalyticsResult};
use crate::engine::stats;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

const REQUIRED: [PoColumn; 2] = [PoColumn::OrderDate, PoColumn::ItemId];

/// 日期 → 季度 (1-4)
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// 季度代表月（quarter × 3）的 1 号
pub fn quarter_bucket_date(year: i32, quarter: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, quarter * 3, 1)
}

#[derive(Default)]
struct BucketAccumulator {
    total_quantity: f64,
    prices: Vec<f64>,
}

// ==========================================
// DemandPatternAnalyzer - 需求模式分析器
// ==========================================
#[derive(Debug, Default)]
pub struct DemandPatternAnalyzer {
    // 无状态分析器
}

impl DemandPatternAnalyzer {
    pub fn new() -> Self {
        Self {}
    }

    /// 分析入口（不抛错，失败折叠为空表 + 消息）
    pub fn analyze(&self, orders: &PurchaseOrderTable) -> AnalysisOutcome<DemandBucket> {
        let _perf = crate::perf::PerfGuard::new("predict_demand_patterns", orders.len());
        AnalysisOutcome::from_result("demand_pattern", self.try_analyze(orders))
    }

    /// 分析主流程
    pub fn try_analyze(
        &self,
        orders: &PurchaseOrderTable,
    ) -> AnalyticsResult<(Vec<DemandBucket>, String)> {
        if orders.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }
        let missing = orders.missing_columns(&REQUIRED);
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingColumns(missing));
        }

        // 键序 (item_id, year, quarter) 即输出序 (item_id, bucket_date)
        let mut buckets: BTreeMap<(String, i32, u32), BucketAccumulator> = BTreeMap::new();
        let mut valid_rows = 0usize;

        for row in orders.rows() {
            let Some(date) = row.parsed_order_date() else {
                continue;
            };
            valid_rows += 1;
            let Some(item_id) = row.item_id.as_deref() else {
                continue;
            };

            let acc = buckets
                .entry((item_id.to_string(), date.year(), quarter_of(date)))
                .or_default();
            acc.total_quantity += row.quantity.unwrap_or(0.0);
            if let Some(price) = row.unit_price {
                acc.prices.push(price);
            }
        }

        if valid_rows == 0 {
            return Err(AnalyticsError::InsufficientData(
                "No valid date data available".to_string(),
            ));
        }

        let mut result = Vec::with_capacity(buckets.len());
        for ((item_id, year, quarter), acc) in buckets {
            let bucket_date = quarter_bucket_date(year, quarter).ok_or_else(|| {
                AnalyticsError::computation(
                    "demand pattern analysis",
                    format!("invalid quarter {} for year {}", quarter, year),
                )
            })?;
            result.push(DemandBucket {
                item_id,
                year,
                quarter,
                total_quantity: acc.total_quantity,
                avg_unit_price: stats::mean(&acc.prices),
                bucket_date,
            });
        }

        debug!(valid_rows, buckets = result.len(), "需求模式分析完成");

        Ok((
            result,
            "Demand pattern analysis completed successfully".to_string(),
        ))
    }
}

// ==========================================
// 采购预测分析引擎 - 报告摘要指标
// ==========================================
// 职责: 各分析结果表的看板 KPI 汇总
// 约定: 空表不出摘要（由调用方返回 None）
// ==========================================

use crate::domain::results::{AnomalyRecord, DemandBucket, ForecastPoint, ItemCostProfile, SupplierScore};
use crate::domain::types::Priority;
use crate::engine::stats;
use serde::Serialize;
use std::collections::BTreeMap;

const TOP_DEMAND_ITEMS: usize = 5;

/// 成本优化摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub total_savings: f64,
    pub high_priority_items: usize,
    pub average_savings: f64,
    pub max_savings: f64,
}

impl CostSummary {
    pub fn from_rows(rows: &[ItemCostProfile]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let savings: Vec<f64> = rows.iter().map(|r| r.savings_amount).collect();
        Some(Self {
            total_savings: stats::round_to(savings.iter().sum(), 2),
            high_priority_items: rows.iter().filter(|r| r.priority == Priority::High).count(),
            average_savings: stats::round_to(stats::mean(&savings).unwrap_or(0.0), 2),
            max_savings: savings.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// 需求模式摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandSummary {
    pub total_demand: f64,
    pub average_unit_price: Option<f64>,
    pub items_analyzed: usize,
    /// 季度桶最多的物料（最多 5 个）
    pub top_items: Vec<String>,
}

impl DemandSummary {
    pub fn from_rows(rows: &[DemandBucket]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let prices: Vec<f64> = rows.iter().filter_map(|r| r.avg_unit_price).collect();

        let mut bucket_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for r in rows {
            *bucket_counts.entry(r.item_id.as_str()).or_default() += 1;
        }
        let items_analyzed = bucket_counts.len();

        let mut ranked: Vec<(&str, usize)> = bucket_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Some(Self {
            total_demand: rows.iter().map(|r| r.total_quantity).sum(),
            average_unit_price: stats::mean(&prices),
            items_analyzed,
            top_items: ranked
                .into_iter()
                .take(TOP_DEMAND_ITEMS)
                .map(|(id, _)| id.to_string())
                .collect(),
        })
    }
}

/// 价格异常摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalySummary {
    pub anomaly_count: usize,
    /// 占全部订单行的百分比
    pub share_of_orders_pct: f64,
    pub average_anomaly_score: f64,
    /// 异常行金额合计
    pub total_anomaly_value: f64,
}

impl AnomalySummary {
    pub fn from_rows(rows: &[AnomalyRecord], total_orders: usize) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let scores: Vec<f64> = rows.iter().map(|r| r.anomaly_score).collect();
        Some(Self {
            anomaly_count: rows.len(),
            share_of_orders_pct: stats::round_to(
                stats::ratio_or(rows.len() as f64, total_orders as f64, 0.0) * 100.0,
                1,
            ),
            average_anomaly_score: stats::mean(&scores).unwrap_or(0.0),
            total_anomaly_value: stats::round_to(
                rows.iter().filter_map(|r| r.line.line_total).sum(),
                2,
            ),
        })
    }
}

/// 供应商绩效摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierSummary {
    pub top_performer: String,
    pub top_score: f64,
    pub average_score: f64,
    pub total_suppliers: usize,
    pub score_range: f64,
}

impl SupplierSummary {
    /// rows 需已按 overall_score 降序
    pub fn from_rows(rows: &[SupplierScore]) -> Option<Self> {
        let top = rows.first()?;
        let scores: Vec<f64> = rows.iter().map(|r| r.overall_score).collect();
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        Some(Self {
            top_performer: top.supplier_id.clone(),
            top_score: top.overall_score,
            average_score: stats::mean(&scores).unwrap_or(0.0),
            total_suppliers: rows.len(),
            score_range: max - min,
        })
    }
}

/// 预测摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub average_quantity: f64,
    pub average_price: f64,
    /// Σ 预测数量 × 预测单价
    pub total_forecast_value: f64,
}

impl ForecastSummary {
    pub fn from_rows(rows: &[ForecastPoint]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let quantities: Vec<f64> = rows.iter().map(|r| r.forecasted_quantity).collect();
        let prices: Vec<f64> = rows.iter().map(|r| r.forecasted_price).collect();
        Some(Self {
            average_quantity: stats::mean(&quantities).unwrap_or(0.0),
            average_price: stats::mean(&prices).unwrap_or(0.0),
            total_forecast_value: rows
                .iter()
                .map(|r| r.forecasted_quantity * r.forecasted_price)
                .sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::purchase_order::PurchaseOrderLine;
    use crate::domain::types::ForecastType;
    use chrono::NaiveDate;

    fn bucket(item: &str, quarter: u32, qty: f64) -> DemandBucket {
        DemandBucket {
            item_id: item.to_string(),
            year: 2024,
            quarter,
            total_quantity: qty,
            avg_unit_price: Some(10.0),
            bucket_date: NaiveDate::from_ymd_opt(2024, quarter * 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_demand_summary_ranks_items_by_bucket_count() {
        let rows = vec![
            bucket("B", 1, 5.0),
            bucket("A", 1, 1.0),
            bucket("B", 2, 5.0),
            bucket("C", 3, 2.0),
        ];
        let summary = DemandSummary::from_rows(&rows).unwrap();
        assert_eq!(summary.total_demand, 13.0);
        assert_eq!(summary.items_analyzed, 3);
        assert_eq!(summary.top_items, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_anomaly_summary_share_and_value() {
        let rows = vec![AnomalyRecord {
            line: PurchaseOrderLine::new(None, None, None, Some(2.0), Some(500.0)),
            is_anomaly: true,
            anomaly_score: -0.2,
        }];
        let summary = AnomalySummary::from_rows(&rows, 40).unwrap();
        assert_eq!(summary.anomaly_count, 1);
        assert_eq!(summary.share_of_orders_pct, 2.5);
        assert_eq!(summary.total_anomaly_value, 1000.0);
    }

    #[test]
    fn test_forecast_summary_value() {
        let rows = vec![
            ForecastPoint {
                forecast_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                forecasted_quantity: 10.0,
                forecasted_price: 2.0,
                forecast_type: ForecastType::TrendBased,
            },
            ForecastPoint {
                forecast_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                forecasted_quantity: 20.0,
                forecasted_price: 3.0,
                forecast_type: ForecastType::TrendBased,
            },
        ];
        let summary = ForecastSummary::from_rows(&rows).unwrap();
        assert_eq!(summary.average_quantity, 15.0);
        assert_eq!(summary.total_forecast_value, 80.0);
    }

    #[test]
    fn test_empty_rows_have_no_summary() {
        assert!(CostSummary::from_rows(&[]).is_none());
        assert!(SupplierSummary::from_rows(&[]).is_none());
        assert!(AnomalySummary::from_rows(&[], 10).is_none());
    }
}

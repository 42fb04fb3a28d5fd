// ==========================================
// 采购预测分析引擎 - 供应商绩效评分
// ==========================================
// 输入: 采购订单表（需 supplier_id）+ 可选供应商表（显示名称）
// 输出: 供应商得分，按 overall_score 降序、order_count 降序
//       order_count 仅统计有单价的行；采购量统计全部行
// 公式:
//   price_efficiency = 1 / (1 + std/mean)
//   volume_score     = total_quantity / max(total_quantity)
//   overall_score    = (price_efficiency + volume_score) / 2
// ==========================================

use crate::domain::catalog::SupplierTable;
use crate::domain::purchase_order::PurchaseOrderTable;
use crate::domain::results::SupplierScore;
use crate::domain::types::PoColumn;
use crate::engine::error::{AnalysisOutcome, AnalyticsError, AnalyticsResult};
use crate::engine::stats;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Default)]
struct SupplierAccumulator {
    prices: Vec<f64>,
    order_count: usize,
    total_quantity: f64,
}

// ==========================================
// SupplierPerformanceScorer - 供应商绩效评分器
// ==========================================
#[derive(Debug, Default)]
pub struct SupplierPerformanceScorer {
    // 无状态评分器
}

impl SupplierPerformanceScorer {
    pub fn new() -> Self {
        Self {}
    }

    /// 评分入口（不抛错，失败折叠为空表 + 消息）
    pub fn score(
        &self,
        orders: &PurchaseOrderTable,
        suppliers: Option<&SupplierTable>,
    ) -> AnalysisOutcome<SupplierScore> {
        let _perf = crate::perf::PerfGuard::new("predict_supplier_performance", orders.len());
        AnalysisOutcome::from_result("supplier_performance", self.try_score(orders, suppliers))
    }

    /// 评分主流程
    pub fn try_score(
        &self,
        orders: &PurchaseOrderTable,
        suppliers: Option<&SupplierTable>,
    ) -> AnalyticsResult<(Vec<SupplierScore>, String)> {
        if orders.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }
        let missing = orders.missing_columns(&[PoColumn::SupplierId]);
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingColumns(missing));
        }

        // 1. 按供应商分组
        let mut groups: BTreeMap<&str, SupplierAccumulator> = BTreeMap::new();
        for row in orders.rows() {
            let Some(supplier_id) = row.supplier_id.as_deref() else {
                continue;
            };
            let acc = groups.entry(supplier_id).or_default();
            acc.total_quantity += row.quantity.unwrap_or(0.0).max(0.0);
            // 订单数只计有单价的行
            if let Some(price) = row.unit_price {
                acc.prices.push(price);
                acc.order_count += 1;
            }
        }

        if groups.is_empty() {
            return Err(AnalyticsError::InsufficientData(
                "No purchase order lines with a supplier_id".to_string(),
            ));
        }

        // 2. 采购量归一化基准（全为 0 时视为同量，均得 1）
        let max_quantity = groups
            .values()
            .map(|acc| acc.total_quantity)
            .fold(0.0_f64, f64::max);

        let mut scores: Vec<SupplierScore> = groups
            .into_iter()
            .map(|(supplier_id, acc)| {
                let avg_price = stats::mean(&acc.prices).unwrap_or(0.0);
                let price_std = stats::sample_std(&acc.prices);
                let price_efficiency = stats::price_efficiency(price_std, avg_price);
                let volume_score = stats::ratio_or(acc.total_quantity, max_quantity, 1.0).clamp(0.0, 1.0);

                SupplierScore {
                    supplier_id: supplier_id.to_string(),
                    supplier_name: suppliers
                        .and_then(|t| t.display_name(supplier_id))
                        .map(|s| s.to_string()),
                    avg_price,
                    price_std,
                    order_count: acc.order_count,
                    total_quantity: acc.total_quantity,
                    price_efficiency,
                    volume_score,
                    overall_score: (price_efficiency + volume_score) / 2.0,
                }
            })
            .collect();

        // 3. 排序: overall 降序 → order_count 降序 → supplier_id 升序
        scores.sort_by(|a, b| {
            b.overall_score
                .total_cmp(&a.overall_score)
                .then_with(|| b.order_count.cmp(&a.order_count))
                .then_with(|| a.supplier_id.cmp(&b.supplier_id))
        });

        debug!(suppliers = scores.len(), max_quantity, "供应商绩效评分完成");

        Ok((
            scores,
            "Supplier performance analysis completed successfully".to_string(),
        ))
    }
}

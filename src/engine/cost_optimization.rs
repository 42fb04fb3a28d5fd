// ==========================================
// 采购预测分析引擎 - 成本优化分析
// ==========================================
// 输入: 采购订单表（需 unit_price / quantity / item_id）+ 可选物料目录
// 输出: 物料成本画像，按节省金额降序
// ==========================================
// 节省比例为估算占位：在配置区间内按固定种子均匀抽取，
// 同一快照 + 同一种子结果可复现
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::catalog::ItemCatalog;
use crate::domain::purchase_order::PurchaseOrderTable;
use crate::domain::results::ItemCostProfile;
use crate::domain::types::{PoColumn, Priority, RiskLevel};
use crate::engine::error::{AnalysisOutcome, AnalyticsError, AnalyticsResult};
use crate::engine::stats::{self, round_to};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

const REQUIRED: [PoColumn; 3] = [PoColumn::UnitPrice, PoColumn::Quantity, PoColumn::ItemId];

// ==========================================
// 优化建议模板（按优先级）
// ==========================================

struct Playbook {
    recommendation: &'static str,
    steps: [&'static str; 4],
}

fn playbook(priority: Priority) -> Playbook {
    match priority {
        Priority::High => Playbook {
            recommendation: "Immediate action required - high savings potential",
            steps: [
                "Contact supplier for bulk pricing",
                "Request volume discounts",
                "Negotiate payment terms",
                "Consider alternative suppliers",
            ],
        },
        Priority::Medium => Playbook {
            recommendation: "Consider negotiation in next quarter",
            steps: [
                "Review current contracts",
                "Benchmark against market rates",
                "Plan negotiation strategy",
                "Set savings targets",
            ],
        },
        Priority::Low => Playbook {
            recommendation: "Monitor pricing trends",
            steps: [
                "Monitor price trends",
                "Track supplier performance",
                "Regular price reviews",
                "Document cost drivers",
            ],
        },
    }
}

// ==========================================
// CostOptimizationAnalyzer - 成本优化分析器
// ==========================================
pub struct CostOptimizationAnalyzer {
    savings_pct_min: f64,
    savings_pct_max: f64,
    high_threshold: f64,
    medium_threshold: f64,
    seed: u64,
}

/// 单个物料的价格累计
#[derive(Default)]
struct ItemAccumulator {
    prices: Vec<f64>,
    total_spend: f64,
}

impl CostOptimizationAnalyzer {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            savings_pct_min: config.savings_pct_min,
            savings_pct_max: config.savings_pct_max,
            high_threshold: config.high_priority_threshold,
            medium_threshold: config.medium_priority_threshold,
            seed: config.random_seed,
        }
    }

    /// 分析入口（不抛错，失败折叠为空表 + 消息）
    pub fn analyze(
        &self,
        orders: &PurchaseOrderTable,
        catalog: Option<&ItemCatalog>,
    ) -> AnalysisOutcome<ItemCostProfile> {
        let _perf = crate::perf::PerfGuard::new("predict_cost_optimization", orders.len());
        AnalysisOutcome::from_result("cost_optimization", self.try_analyze(orders, catalog))
    }

    /// 分析主流程
    pub fn try_analyze(
        &self,
        orders: &PurchaseOrderTable,
        catalog: Option<&ItemCatalog>,
    ) -> AnalyticsResult<(Vec<ItemCostProfile>, String)> {
        if orders.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }
        let missing = orders.missing_columns(&REQUIRED);
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingColumns(missing));
        }
        if !(0.0..=100.0).contains(&self.savings_pct_min)
            || !(0.0..=100.0).contains(&self.savings_pct_max)
            || self.savings_pct_min > self.savings_pct_max
        {
            return Err(AnalyticsError::InvalidParameter(format!(
                "savings percentage range {}..{} outside [0, 100]",
                self.savings_pct_min, self.savings_pct_max
            )));
        }

        // 1. 按 item_id 分组（BTreeMap 保证物料顺序稳定，抽样可复现）
        let mut groups: BTreeMap<&str, ItemAccumulator> = BTreeMap::new();
        for row in orders.rows() {
            let (Some(item_id), Some(price)) = (row.item_id.as_deref(), row.unit_price) else {
                continue;
            };
            let acc = groups.entry(item_id).or_default();
            acc.prices.push(price);
            if let Some(total) = row.line_total {
                acc.total_spend += total;
            }
        }

        if groups.is_empty() {
            return Err(AnalyticsError::InsufficientData(
                "No priced purchase order lines with an item_id".to_string(),
            ));
        }

        let names = catalog.map(|c| c.name_index()).unwrap_or_default();
        let mut rng = StdRng::seed_from_u64(self.seed);

        // 2. 逐物料计算画像
        let mut profiles: Vec<ItemCostProfile> = groups
            .into_iter()
            .map(|(item_id, acc)| {
                let savings_percentage = round_to(self.draw_savings_pct(&mut rng), 1);
                self.build_profile(item_id, &acc, savings_percentage, names.get(item_id).copied())
            })
            .collect();

        // 3. 节省金额降序（同额按 item_id 升序）
        profiles.sort_by(|a, b| {
            b.savings_amount
                .total_cmp(&a.savings_amount)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        let high_count = profiles.iter().filter(|p| p.priority == Priority::High).count();
        debug!(items = profiles.len(), high_count, "成本优化分析完成");

        Ok((
            profiles,
            "Cost optimization analysis completed successfully".to_string(),
        ))
    }

    fn draw_savings_pct(&self, rng: &mut StdRng) -> f64 {
        if self.savings_pct_max > self.savings_pct_min {
            rng.gen_range(self.savings_pct_min..self.savings_pct_max)
        } else {
            self.savings_pct_min
        }
    }

    fn build_profile(
        &self,
        item_id: &str,
        acc: &ItemAccumulator,
        savings_percentage: f64,
        item_name: Option<&str>,
    ) -> ItemCostProfile {
        let avg_price = stats::mean(&acc.prices).unwrap_or(0.0);
        let price_std = stats::sample_std(&acc.prices);
        let min_price = acc.prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = acc.prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let total_spend = round_to(acc.total_spend.max(0.0), 2);
        let price_variance_ratio = round_to(stats::coefficient_of_variation(price_std, avg_price), 3);

        // 百分比 <= 100 且金额均已舍入到分，故 savings_amount <= total_spend
        let savings_amount = round_to(total_spend * savings_percentage / 100.0, 2).min(total_spend);
        let optimized_cost = round_to(total_spend - savings_amount, 2);

        let priority = Priority::from_savings(savings_amount, self.high_threshold, self.medium_threshold);
        let book = playbook(priority);

        ItemCostProfile {
            item_id: item_id.to_string(),
            item_name: item_name.unwrap_or(item_id).to_string(),
            avg_price: round_to(avg_price, 2),
            price_std: round_to(price_std, 2),
            min_price: round_to(min_price, 2),
            max_price: round_to(max_price, 2),
            order_count: acc.prices.len(),
            total_spend,
            price_variance_ratio,
            optimization_potential: round_to(price_variance_ratio * total_spend, 2),
            savings_percentage,
            savings_amount,
            priority,
            optimization_type: "Price Negotiation".to_string(),
            current_cost: total_spend,
            optimized_cost,
            timeframe: "3-6 months".to_string(),
            recommendation: book.recommendation.to_string(),
            implementation: book.steps.iter().map(|s| s.to_string()).collect(),
            risk_level: RiskLevel::from(priority),
        }
    }
}

// ==========================================
// 采购预测分析引擎 - 分析结果行
// ==========================================
// 职责: 五个分析器的输出实体
// 生命周期: 每次分析新建，从不原地更新
// ==========================================

use crate::domain::purchase_order::PurchaseOrderLine;
use crate::domain::types::{ForecastType, Priority, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 物料成本画像 (ItemCostProfile)
///
/// 不变量: savings_amount <= total_spend, price_variance_ratio >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCostProfile {
    pub item_id: String,
    /// 物料名称（无目录时回退为 item_id）
    pub item_name: String,
    pub avg_price: f64,
    pub price_std: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub order_count: usize,
    pub total_spend: f64,
    /// 价格变异系数 = std / mean
    pub price_variance_ratio: f64,
    /// 优化潜力 = 变异系数 × 总支出
    pub optimization_potential: f64,
    pub savings_percentage: f64,
    pub savings_amount: f64,
    pub priority: Priority,
    pub optimization_type: String,
    pub current_cost: f64,
    pub optimized_cost: f64,
    pub timeframe: String,
    pub recommendation: String,
    pub implementation: Vec<String>,
    pub risk_level: RiskLevel,
}

/// 需求季度桶 (DemandBucket)
///
/// 不变量: (item_id, year, quarter) 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandBucket {
    pub item_id: String,
    pub year: i32,
    /// 季度 1-4
    pub quarter: u32,
    pub total_quantity: f64,
    /// 季度内无有效单价时为 None
    pub avg_unit_price: Option<f64>,
    /// 代表月（quarter × 3）的 1 号
    pub bucket_date: NaiveDate,
}

/// 价格异常记录 (AnomalyRecord)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    #[serde(flatten)]
    pub line: PurchaseOrderLine,
    pub is_anomaly: bool,
    /// 越低越异常（被标记的行均 < 0）
    pub anomaly_score: f64,
}

/// 供应商得分 (SupplierScore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    pub supplier_id: String,
    pub supplier_name: Option<String>,
    pub avg_price: f64,
    pub price_std: f64,
    pub order_count: usize,
    pub total_quantity: f64,
    /// (0, 1]
    pub price_efficiency: f64,
    /// [0, 1]，快照内最大采购量的供应商为 1
    pub volume_score: f64,
    /// (0, 1]
    pub overall_score: f64,
}

/// 月度历史聚合（趋势预测输入，同时供看板绘制历史曲线）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// 月份 1 号
    pub month: NaiveDate,
    pub quantity: f64,
    pub avg_unit_price: Option<f64>,
    /// 3 期滑动平均（min_periods = 1）
    pub quantity_ma: f64,
    pub price_ma: Option<f64>,
}

/// 预测点 (ForecastPoint)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 月份 1 号，严格递增
    pub forecast_date: NaiveDate,
    pub forecasted_quantity: f64,
    pub forecasted_price: f64,
    pub forecast_type: ForecastType,
}

// ==========================================
// 采购预测分析引擎 - 趋势预测
// ==========================================
// 输入: 采购订单表（需 order_date）
// 流程: 按自然月聚合（数量求和、单价求均值）→ 3 期滑动平均（仅平滑展示）
//       → 末两期差分 → 向后外推 periods 个月，负值截断为 0
// ==========================================

use crate::domain::purchase_order::PurchaseOrderTable;
use crate::domain::results::{ForecastPoint, MonthlyAggregate};
use crate::domain::types::{ForecastType, PoColumn};
use crate::engine::error::{AnalysisOutcome, AnalyticsError, AnalyticsResult};
use crate::engine::stats;
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

const MOVING_AVERAGE_WINDOW: usize = 3;

// ==========================================
// TrendForecaster - 趋势预测器
// ==========================================
pub struct TrendForecaster {
    min_history_months: usize,
}

impl TrendForecaster {
    pub fn new(min_history_months: usize) -> Self {
        Self {
            min_history_months: min_history_months.max(1),
        }
    }

    /// 预测入口（不抛错，失败折叠为空表 + 消息）
    pub fn forecast(&self, orders: &PurchaseOrderTable, periods: usize) -> AnalysisOutcome<ForecastPoint> {
        let _perf = crate::perf::PerfGuard::new("generate_forecasts", orders.len());
        AnalysisOutcome::from_result("trend_forecast", self.try_forecast(orders, periods))
    }

    /// 月度历史（供看板绘制历史曲线）
    pub fn history(&self, orders: &PurchaseOrderTable) -> AnalysisOutcome<MonthlyAggregate> {
        let result = self.monthly_history(orders).map(|rows| {
            let message = format!("Monthly history aggregated for {} months", rows.len());
            (rows, message)
        });
        AnalysisOutcome::from_result("trend_history", result)
    }

    /// 预测主流程
    pub fn try_forecast(
        &self,
        orders: &PurchaseOrderTable,
        periods: usize,
    ) -> AnalyticsResult<(Vec<ForecastPoint>, String)> {
        if periods == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "forecast periods must be >= 1".to_string(),
            ));
        }

        let history = self.monthly_history(orders)?;
        if history.len() < self.min_history_months {
            return Err(AnalyticsError::InsufficientData(format!(
                "Insufficient historical data for forecasting (need at least {} months)",
                self.min_history_months
            )));
        }
        if history.len() < 2 {
            return Err(AnalyticsError::InsufficientData(
                "Insufficient data for trend calculation".to_string(),
            ));
        }

        let last = &history[history.len() - 1];
        let prev = &history[history.len() - 2];

        let quantity_step = last.quantity - prev.quantity;
        let last_price = last.avg_unit_price.unwrap_or(0.0);
        let price_step = match (last.avg_unit_price, prev.avg_unit_price) {
            (Some(a), Some(b)) => a - b,
            _ => 0.0,
        };

        let mut points = Vec::with_capacity(periods);
        for i in 1..=periods {
            let forecast_date = last
                .month
                .checked_add_months(Months::new(i as u32))
                .ok_or_else(|| {
                    AnalyticsError::computation("forecasting", "forecast date out of range")
                })?;
            let step = i as f64;
            points.push(ForecastPoint {
                forecast_date,
                forecasted_quantity: (last.quantity + quantity_step * step).max(0.0),
                forecasted_price: (last_price + price_step * step).max(0.0),
                forecast_type: ForecastType::TrendBased,
            });
        }

        debug!(
            history_months = history.len(),
            periods,
            quantity_step,
            price_step,
            "趋势预测完成"
        );

        Ok((points, format!("Forecast generated for {} periods", periods)))
    }

    /// 按自然月聚合（升序）
    pub fn monthly_history(&self, orders: &PurchaseOrderTable) -> AnalyticsResult<Vec<MonthlyAggregate>> {
        if orders.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }
        let missing = orders.missing_columns(&[PoColumn::OrderDate]);
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingColumns(missing));
        }

        let mut months: BTreeMap<NaiveDate, (f64, Vec<f64>)> = BTreeMap::new();
        for row in orders.rows() {
            let Some(date) = row.parsed_order_date() else {
                continue;
            };
            let Some(month) = NaiveDate::from_ymd_opt(date.year(), date.month(), 1) else {
                continue;
            };
            let entry = months.entry(month).or_insert_with(|| (0.0, Vec::new()));
            entry.0 += row.quantity.unwrap_or(0.0);
            if let Some(price) = row.unit_price {
                entry.1.push(price);
            }
        }

        let quantities: Vec<f64> = months.values().map(|(q, _)| *q).collect();
        let quantity_ma = stats::trailing_moving_average(&quantities, MOVING_AVERAGE_WINDOW);

        let prices: Vec<Option<f64>> = months.values().map(|(_, p)| stats::mean(p)).collect();
        let price_ma = trailing_optional_average(&prices, MOVING_AVERAGE_WINDOW);

        Ok(months
            .into_keys()
            .enumerate()
            .map(|(i, month)| MonthlyAggregate {
                month,
                quantity: quantities[i],
                avg_unit_price: prices[i],
                quantity_ma: quantity_ma[i],
                price_ma: price_ma[i],
            })
            .collect())
    }
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self::new(3)
    }
}

/// 带缺失值的尾随滑动平均：窗口内有效值求均值，全缺失为 None
fn trailing_optional_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            stats::mean(&present)
        })
        .collect()
}

#[cfg(test)]
mod tests;

use super::TrendForecaster;
use crate::domain::purchase_order::{PurchaseOrderLine, PurchaseOrderTable};
use crate::domain::types::{ForecastType, PoColumn};
use chrono::NaiveDate;

// ==========================================
// 测试辅助函数
// ==========================================

fn line(date: &str, qty: f64, price: f64) -> PurchaseOrderLine {
    PurchaseOrderLine::new(
        Some("ITEM".to_string()),
        Some("SUP".to_string()),
        Some(date.to_string()),
        Some(qty),
        Some(price),
    )
}

/// 线性历史: 第 n 月数量 = 100 + 10n，单价 = 50 + n
fn linear_orders(months: u32) -> PurchaseOrderTable {
    PurchaseOrderTable::with_all_columns(
        (0..months)
            .map(|n| {
                let date = format!("2023-{:02}-15", n + 1);
                line(&date, 100.0 + 10.0 * n as f64, 50.0 + n as f64)
            })
            .collect(),
    )
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// 正常案例
// ==========================================

#[test]
fn test_linear_series_continues_slope() {
    let orders = linear_orders(6); // 2023-01 .. 2023-06, 最后一月数量 150
    let outcome = TrendForecaster::default().forecast(&orders, 4);

    assert_eq!(outcome.rows.len(), 4);
    let quantities: Vec<f64> = outcome.rows.iter().map(|p| p.forecasted_quantity).collect();
    assert_eq!(quantities, vec![160.0, 170.0, 180.0, 190.0]);
    let prices: Vec<f64> = outcome.rows.iter().map(|p| p.forecasted_price).collect();
    assert_eq!(prices, vec![56.0, 57.0, 58.0, 59.0]);
    assert!(outcome.rows.iter().all(|p| p.forecast_type == ForecastType::TrendBased));
    assert_eq!(outcome.message, "Forecast generated for 4 periods");
}

#[test]
fn test_dates_start_after_last_month_and_strictly_increase() {
    let orders = linear_orders(12); // 最后一月 2023-12
    let outcome = TrendForecaster::default().forecast(&orders, 12);

    assert_eq!(outcome.rows.len(), 12);
    assert_eq!(outcome.rows[0].forecast_date, ymd(2024, 1, 1));
    assert_eq!(outcome.rows[11].forecast_date, ymd(2024, 12, 1));
    assert!(outcome
        .rows
        .windows(2)
        .all(|w| w[0].forecast_date < w[1].forecast_date));
}

#[test]
fn test_declining_trend_clamped_at_zero() {
    let orders = PurchaseOrderTable::with_all_columns(vec![
        line("2024-01-10", 300.0, 30.0),
        line("2024-02-10", 200.0, 20.0),
        line("2024-03-10", 100.0, 10.0),
    ]);
    let outcome = TrendForecaster::default().forecast(&orders, 5);

    assert_eq!(outcome.rows.len(), 5);
    assert!(outcome
        .rows
        .iter()
        .all(|p| p.forecasted_quantity >= 0.0 && p.forecasted_price >= 0.0));
    assert_eq!(outcome.rows[0].forecasted_quantity, 0.0);
    assert_eq!(outcome.rows[4].forecasted_price, 0.0);
}

#[test]
fn test_history_aggregates_and_moving_average() {
    let orders = PurchaseOrderTable::with_all_columns(vec![
        line("2024-01-03", 10.0, 4.0),
        line("2024-01-20", 20.0, 6.0),
        line("2024-02-11", 60.0, 8.0),
        line("bad-date", 999.0, 999.0),
        line("2024-03-01", 90.0, 10.0),
    ]);
    let history = TrendForecaster::default().monthly_history(&orders).unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(history[0].month, ymd(2024, 1, 1));
    assert_eq!(history[0].quantity, 30.0);
    assert_eq!(history[0].avg_unit_price, Some(5.0));
    assert_eq!(history[1].quantity_ma, 45.0);
    assert_eq!(history[2].quantity_ma, 60.0);
    assert_eq!(history[2].price_ma, Some((5.0 + 8.0 + 10.0) / 3.0));
}

// ==========================================
// 失败案例
// ==========================================

#[test]
fn test_fewer_than_three_months_is_insufficient() {
    let orders = linear_orders(2);
    let outcome = TrendForecaster::default().forecast(&orders, 3);
    assert!(outcome.rows.is_empty());
    assert!(outcome.message.contains("Insufficient historical data"));
}

#[test]
fn test_single_month_with_relaxed_minimum_needs_trend() {
    let orders = linear_orders(1);
    let outcome = TrendForecaster::new(1).forecast(&orders, 3);
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.message, "Insufficient data for trend calculation");
}

#[test]
fn test_zero_periods_rejected() {
    let outcome = TrendForecaster::default().forecast(&linear_orders(6), 0);
    assert!(outcome.rows.is_empty());
    assert!(outcome.message.contains("periods"));
}

#[test]
fn test_missing_order_date_column() {
    let orders = PurchaseOrderTable::new([PoColumn::Quantity], vec![line("2024-01-01", 1.0, 1.0)]);
    let outcome = TrendForecaster::default().forecast(&orders, 3);
    assert!(outcome.rows.is_empty());
    assert!(outcome.message.contains("order_date"));
}

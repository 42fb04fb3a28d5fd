// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成采购订单/供应商/物料三张 CSV，供命令行手工验证
// 输出: <目标目录>/{purchase_orders,suppliers,items}.csv（默认 tests/fixtures/datasets）
// 用法: cargo run --bin generate_test_data -- [目标目录] [订单行数] [种子]
// ==========================================

use chrono::{Duration, NaiveDate};
use csv::Writer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_ORDER_COUNT: usize = 1_000;
const DEFAULT_SEED: u64 = 42;
const OUTLIER_EVERY: usize = 97;

const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("SUP-001", "Acme Components", "Hardware"),
    ("SUP-002", "Borealis Supply", "Hardware"),
    ("SUP-003", "Cobalt Industrial", "Raw Material"),
    ("SUP-004", "Delta Packaging", "Packaging"),
    ("SUP-005", "Evergreen Office", "Office"),
];

// (item_id, item_name, category, 基准单价)
const ITEMS: &[(&str, &str, &str, f64)] = &[
    ("ITEM-001", "Hex Bolt M8", "Hardware", 0.45),
    ("ITEM-002", "Flat Washer M8", "Hardware", 0.08),
    ("ITEM-003", "Steel Sheet 2mm", "Raw Material", 38.0),
    ("ITEM-004", "Aluminium Bar 20mm", "Raw Material", 22.5),
    ("ITEM-005", "Carton 40x30x20", "Packaging", 1.6),
    ("ITEM-006", "Stretch Film Roll", "Packaging", 14.0),
    ("ITEM-007", "Copy Paper A4", "Office", 4.2),
    ("ITEM-008", "Toner Cartridge", "Office", 65.0),
];

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let target = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/datasets"));
    let order_count = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ORDER_COUNT);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    fs::create_dir_all(&target)?;

    generate_suppliers(&target)?;
    generate_items(&target)?;
    let outliers = generate_purchase_orders(&target, order_count, seed)?;

    println!(
        "wrote {} purchase orders ({} injected price outliers) to {}",
        order_count,
        outliers,
        target.display()
    );
    Ok(())
}

fn generate_suppliers(dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(dir.join("suppliers.csv"))?;
    wtr.write_record(["supplier_id", "supplier_name", "category"])?;
    for (id, name, category) in SUPPLIERS {
        wtr.write_record([*id, *name, *category])?;
    }
    wtr.flush()?;
    Ok(())
}

fn generate_items(dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(dir.join("items.csv"))?;
    wtr.write_record(["item_id", "item_name", "category"])?;
    for (id, name, category, _) in ITEMS {
        wtr.write_record([*id, *name, *category])?;
    }
    wtr.flush()?;
    Ok(())
}

/// 订单行：两年内随机日期，单价围绕基准 ±15% 波动，每 OUTLIER_EVERY 行注入一个 5~8 倍价格
fn generate_purchase_orders(
    dir: &Path,
    order_count: usize,
    seed: u64,
) -> Result<usize, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("invalid start date")?;

    let mut wtr = Writer::from_path(dir.join("purchase_orders.csv"))?;
    wtr.write_record([
        "po_id",
        "item_id",
        "supplier_id",
        "order_date",
        "quantity",
        "unit_price",
    ])?;

    let mut outliers = 0;
    for index in 0..order_count {
        let (item_id, _, _, base_price) = ITEMS[rng.gen_range(0..ITEMS.len())];
        let (supplier_id, _, _) = SUPPLIERS[rng.gen_range(0..SUPPLIERS.len())];
        let order_date = start + Duration::days(rng.gen_range(0..730));
        let quantity = rng.gen_range(10..=500);

        let mut unit_price = base_price * rng.gen_range(0.85..1.15);
        if index % OUTLIER_EVERY == OUTLIER_EVERY - 1 {
            unit_price *= rng.gen_range(5.0..8.0);
            outliers += 1;
        }

        wtr.write_record(&[
            format!("PO-{:06}", index + 1),
            item_id.to_string(),
            supplier_id.to_string(),
            order_date.format("%Y-%m-%d").to_string(),
            quantity.to_string(),
            format!("{:.2}", unit_price),
        ])?;
    }
    wtr.flush()?;

    Ok(outliers)
}

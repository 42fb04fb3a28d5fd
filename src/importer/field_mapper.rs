// ==========================================
// 采购预测分析引擎 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 标准字段映射（别名）+ 类型转换
// 说明: 记录源表实际携带的列，供分析器判断缺列
// ==========================================

use crate::domain::catalog::{ItemCatalog, ItemRecord, SupplierRecord, SupplierTable};
use crate::domain::purchase_order::{PurchaseOrderLine, PurchaseOrderTable};
use crate::domain::types::PoColumn;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{DataCleaner as DataCleanerTrait, RawRow, RawTable};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

// ==========================================
// 列名别名表（已标准化: 小写 + 下划线）
// ==========================================

const ITEM_ID_ALIASES: &[&str] = &["item_id", "item", "item_code", "sku", "product_id"];
const SUPPLIER_ID_ALIASES: &[&str] = &["supplier_id", "supplier", "vendor_id", "vendor"];
const ORDER_DATE_ALIASES: &[&str] = &["order_date", "date", "po_date"];
const QUANTITY_ALIASES: &[&str] = &["quantity", "qty", "order_quantity"];
const UNIT_PRICE_ALIASES: &[&str] = &["unit_price", "price", "unit_cost"];
const SUPPLIER_NAME_ALIASES: &[&str] = &["supplier_name", "vendor_name", "name"];
const ITEM_NAME_ALIASES: &[&str] = &["item_name", "product_name", "description", "name"];
const CATEGORY_ALIASES: &[&str] = &["category", "item_category", "supplier_category"];

fn po_aliases(column: PoColumn) -> &'static [&'static str] {
    match column {
        PoColumn::ItemId => ITEM_ID_ALIASES,
        PoColumn::SupplierId => SUPPLIER_ID_ALIASES,
        PoColumn::OrderDate => ORDER_DATE_ALIASES,
        PoColumn::Quantity => QUANTITY_ALIASES,
        PoColumn::UnitPrice => UNIT_PRICE_ALIASES,
    }
}

/// 列名标准化：TRIM + 小写 + 空格/连字符转下划线
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ==========================================
// HeaderIndex - 标准化列名 → 源列名
// ==========================================
struct HeaderIndex<'a> {
    by_normalized: HashMap<String, &'a str>,
}

impl<'a> HeaderIndex<'a> {
    fn new(headers: &'a [String]) -> Self {
        let mut by_normalized = HashMap::new();
        for header in headers {
            // 同名列只认第一列
            by_normalized
                .entry(normalize_header(header))
                .or_insert(header.as_str());
        }
        Self { by_normalized }
    }

    /// 按别名顺序找到第一个存在的源列
    fn resolve(&self, aliases: &[&str]) -> Option<&'a str> {
        aliases
            .iter()
            .find_map(|alias| self.by_normalized.get(*alias).copied())
    }
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper<C: DataCleanerTrait = DataCleaner> {
    cleaner: C,
}

impl Default for FieldMapper<DataCleaner> {
    fn default() -> Self {
        Self::new(DataCleaner)
    }
}

impl<C: DataCleanerTrait> FieldMapper<C> {
    pub fn new(cleaner: C) -> Self {
        Self { cleaner }
    }

    /// 原始表 → 采购订单表
    ///
    /// 缺失的列不报错（由分析器按需判断），非数值的价格/数量报 TypeConversionError。
    pub fn map_purchase_orders(&self, table: &RawTable) -> ImportResult<PurchaseOrderTable> {
        let index = HeaderIndex::new(&table.headers);
        let resolved: Vec<(PoColumn, &str)> = PoColumn::ALL
            .iter()
            .filter_map(|column| index.resolve(po_aliases(*column)).map(|h| (*column, h)))
            .collect();
        let source = |column: PoColumn| {
            resolved
                .iter()
                .find(|(c, _)| *c == column)
                .map(|(_, header)| *header)
        };

        let present: BTreeSet<PoColumn> = resolved.iter().map(|(c, _)| *c).collect();
        let missing: Vec<&str> = PoColumn::ALL
            .iter()
            .filter(|c| !present.contains(c))
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            warn!(missing = ?missing, "采购订单表缺少部分标准列");
        }

        let mut lines = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            lines.push(PurchaseOrderLine::new(
                self.text(row, source(PoColumn::ItemId)),
                self.text(row, source(PoColumn::SupplierId)),
                self.text(row, source(PoColumn::OrderDate)),
                self.number(row, source(PoColumn::Quantity), PoColumn::Quantity.as_str())?,
                self.number(row, source(PoColumn::UnitPrice), PoColumn::UnitPrice.as_str())?,
            ));
        }

        Ok(PurchaseOrderTable::new(present, lines))
    }

    /// 原始表 → 供应商表（supplier_id 列必需，缺 ID 的行跳过）
    pub fn map_suppliers(&self, table: &RawTable) -> ImportResult<SupplierTable> {
        let index = HeaderIndex::new(&table.headers);
        let id_col = index
            .resolve(SUPPLIER_ID_ALIASES)
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                row: 1,
                field: "supplier_id".to_string(),
            })?;
        let name_col = index.resolve(SUPPLIER_NAME_ALIASES);
        let category_col = index.resolve(CATEGORY_ALIASES);

        let mut suppliers = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let Some(supplier_id) = self.text(row, Some(id_col)) else {
                warn!(row = row.row_number, "供应商行缺少 supplier_id，已跳过");
                continue;
            };
            suppliers.push(SupplierRecord {
                supplier_id,
                supplier_name: self.text(row, name_col),
                category: self.text(row, category_col),
            });
        }

        Ok(SupplierTable { suppliers })
    }

    /// 原始表 → 物料目录（item_id 列必需，名称列可缺）
    pub fn map_items(&self, table: &RawTable) -> ImportResult<ItemCatalog> {
        let index = HeaderIndex::new(&table.headers);
        let id_col = index
            .resolve(ITEM_ID_ALIASES)
            .ok_or_else(|| ImportError::RequiredFieldMissing {
                row: 1,
                field: "item_id".to_string(),
            })?;
        let name_col = index.resolve(ITEM_NAME_ALIASES);
        let category_col = index.resolve(CATEGORY_ALIASES);

        let mut items = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let Some(item_id) = self.text(row, Some(id_col)) else {
                warn!(row = row.row_number, "物料行缺少 item_id，已跳过");
                continue;
            };
            items.push(ItemRecord {
                item_id,
                item_name: self.text(row, name_col),
                category: self.text(row, category_col),
            });
        }

        Ok(ItemCatalog::new(name_col.is_some(), items))
    }

    fn text(&self, row: &RawRow, header: Option<&str>) -> Option<String> {
        let header = header?;
        self.cleaner
            .normalize_null(row.values.get(header).map(String::as_str))
    }

    fn number(&self, row: &RawRow, header: Option<&str>, field: &str) -> ImportResult<Option<f64>> {
        let Some(header) = header else {
            return Ok(None);
        };
        self.cleaner
            .parse_number(row.values.get(header).map(String::as_str))
            .map_err(|raw| ImportError::TypeConversionError {
                row: row.row_number,
                field: field.to_string(),
                message: format!("not a number: {}", raw),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| RawRow {
                row_number: idx + 2,
                values: headers
                    .iter()
                    .cloned()
                    .zip(cells.iter().map(|c| c.to_string()))
                    .collect(),
            })
            .collect();
        RawTable { headers, rows }
    }

    #[test]
    fn test_aliases_resolve_to_standard_columns() {
        let raw = table(
            &["Item", "Vendor", "Date", "Qty", "Price"],
            &[&["X1", "S1", "2024-01-05", "10", "2.5"]],
        );

        let orders = FieldMapper::default().map_purchase_orders(&raw).unwrap();

        assert_eq!(orders.len(), 1);
        assert!(orders.missing_columns(&PoColumn::ALL).is_empty());
        let line = &orders.rows()[0];
        assert_eq!(line.item_id.as_deref(), Some("X1"));
        assert_eq!(line.supplier_id.as_deref(), Some("S1"));
        assert_eq!(line.quantity, Some(10.0));
        assert_eq!(line.line_total, Some(25.0));
    }

    #[test]
    fn test_absent_columns_are_recorded() {
        let raw = table(&["item_id", "quantity"], &[&["X1", "4"]]);

        let orders = FieldMapper::default().map_purchase_orders(&raw).unwrap();

        assert_eq!(
            orders.missing_columns(&[PoColumn::UnitPrice, PoColumn::Quantity, PoColumn::ItemId]),
            vec![PoColumn::UnitPrice]
        );
        assert_eq!(orders.rows()[0].unit_price, None);
    }

    #[test]
    fn test_blank_cells_become_missing() {
        let raw = table(
            &["item_id", "unit_price", "quantity"],
            &[&["X1", "", "3"], &["", "4.0", "NaN"]],
        );

        let orders = FieldMapper::default().map_purchase_orders(&raw).unwrap();

        assert_eq!(orders.rows()[0].unit_price, None);
        assert_eq!(orders.rows()[0].line_total, None);
        assert_eq!(orders.rows()[1].item_id, None);
        assert_eq!(orders.rows()[1].quantity, None);
    }

    #[test]
    fn test_non_numeric_price_reports_row() {
        let raw = table(
            &["item_id", "unit_price"],
            &[&["X1", "10"], &["X2", "ten"]],
        );

        let err = FieldMapper::default().map_purchase_orders(&raw).unwrap_err();

        match err {
            ImportError::TypeConversionError { row, field, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, "unit_price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_supplier_rows_without_id_are_skipped() {
        let raw = table(
            &["supplier_id", "supplier_name"],
            &[&["S1", "Acme"], &["", "Ghost"]],
        );

        let suppliers = FieldMapper::default().map_suppliers(&raw).unwrap();

        assert_eq!(suppliers.suppliers.len(), 1);
        assert_eq!(suppliers.display_name("S1"), Some("Acme"));
    }

    #[test]
    fn test_supplier_table_requires_id_column() {
        let raw = table(&["supplier_name"], &[&["Acme"]]);
        let err = FieldMapper::default().map_suppliers(&raw).unwrap_err();
        assert!(matches!(err, ImportError::RequiredFieldMissing { .. }));
    }

    #[test]
    fn test_item_catalog_tracks_name_column() {
        let with_names = table(&["item_id", "item_name"], &[&["X1", "Bolt"]]);
        let without_names = table(&["item_id", "category"], &[&["X1", "Hardware"]]);

        let mapper = FieldMapper::default();
        let named = mapper.map_items(&with_names).unwrap();
        let unnamed = mapper.map_items(&without_names).unwrap();

        assert!(named.has_name_column);
        assert_eq!(named.name_index().get("X1"), Some(&"Bolt"));
        assert!(!unnamed.has_name_column);
        assert!(unnamed.name_index().is_empty());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Unit Price "), "unit_price");
        assert_eq!(normalize_header("order-date"), "order_date");
    }
}

// ==========================================
// 采购预测分析引擎 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 检查文件存在并返回小写扩展名
fn checked_extension(path: &Path) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase())
}

/// 组装一行；完全空白的行返回 None
fn build_row(headers: &[String], cells: Vec<String>, row_number: usize) -> Option<RawRow> {
    let mut values = HashMap::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if !header.is_empty() {
                values.insert(header.clone(), value);
            }
        }
    }

    if values.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRow { row_number, values })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let ext = checked_extension(file_path)?;
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record.iter().map(|v| v.trim().to_string()).collect();
            if let Some(row) = build_row(&headers, cells, idx + 2) {
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格转文本；日期单元格统一为 YYYY-MM-DD
    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => value.format("%Y-%m-%d").to_string(),
                None => dt.as_f64().to_string(),
            },
            other => other.to_string().trim().to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let ext = checked_extension(file_path)?;
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(header_row) => header_row.iter().map(Self::cell_text).collect(),
            None => return Ok(RawTable::default()),
        };

        let mut rows = Vec::new();
        for (idx, data_row) in rows_iter.enumerate() {
            let cells = data_row.iter().map(Self::cell_text).collect();
            if let Some(row) = build_row(&headers, cells, idx + 2) {
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Default)]
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        match checked_extension(file_path)?.as_str() {
            "csv" => CsvParser.parse_to_raw_table(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

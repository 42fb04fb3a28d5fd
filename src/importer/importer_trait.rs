// ==========================================
// 采购预测分析引擎 - 导入接口
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 阶段: 文件解析 → 清洗 → 字段映射 → 组装快照
// ==========================================

use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawTable - 解析后的原始表
// ==========================================

/// 原始数据行（列名 → 单元格文本）
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 文件中的行号（表头为第 1 行）
    pub row_number: usize,
    pub values: HashMap<String, String>,
}

/// 原始表：表头 + 非空数据行
///
/// 表头单独保留，零数据行时仍可判断列是否存在。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表
    ///
    /// # 返回
    /// - Ok(RawTable): 表头与非空行
    /// - Err: 文件不存在、扩展名不支持、格式错误
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口（阶段 1）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空白 / NULL / NaN / N/A → None）
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析数值（允许千分位逗号与前导货币符号）
    ///
    /// # 返回
    /// - Ok(None): 空值
    /// - Ok(Some(f64)): 解析成功
    /// - Err(原文): 非数值
    fn parse_number(&self, value: Option<&str>) -> Result<Option<f64>, String>;
}

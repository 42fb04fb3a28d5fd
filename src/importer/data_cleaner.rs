// ==========================================
// 采购预测分析引擎 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析
// ==========================================

use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;

/// 视为缺失值的占位文本（大小写不敏感）
const NULL_TOKENS: [&str; 5] = ["null", "nan", "n/a", "none", "-"];

#[derive(Default)]
pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty()
                || NULL_TOKENS
                    .iter()
                    .any(|token| trimmed.eq_ignore_ascii_case(token))
            {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_number(&self, value: Option<&str>) -> Result<Option<f64>, String> {
        let Some(text) = self.normalize_null(value) else {
            return Ok(None);
        };

        let digits: String = text
            .trim_start_matches(['$', '¥', '€', '£'])
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        match digits.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(text),
        }
    }
}

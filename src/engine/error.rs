// ==========================================
// 采购预测分析引擎 - 分析错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 分析器内部用 Result 传播，对外统一转换为 (空表, 消息)
// ==========================================

use crate::domain::types::PoColumn;
use serde::Serialize;
use thiserror::Error;

/// 分析错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No purchase order data available")]
    EmptyInput,

    #[error("Required columns ({}) not found", join_columns(.0))]
    MissingColumns(Vec<PoColumn>),

    #[error("{0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Error in {stage}: {message}")]
    Computation { stage: &'static str, message: String },

    #[error("{stage} timed out after {timeout_ms} ms")]
    Timeout { stage: &'static str, timeout_ms: u64 },
}

impl AnalyticsError {
    pub fn computation(stage: &'static str, message: impl Into<String>) -> Self {
        AnalyticsError::Computation {
            stage,
            message: message.into(),
        }
    }
}

fn join_columns(columns: &[PoColumn]) -> String {
    columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result 类型别名
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

// ==========================================
// AnalysisOutcome - 分析器对外结果
// ==========================================

/// 结果表 + 人类可读状态消息
///
/// 空表必然伴随原因说明；非空表伴随成功摘要。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome<T> {
    pub rows: Vec<T>,
    pub message: String,
}

impl<T> AnalysisOutcome<T> {
    pub fn success(rows: Vec<T>, message: impl Into<String>) -> Self {
        Self {
            rows,
            message: message.into(),
        }
    }

    pub fn failure(err: &AnalyticsError) -> Self {
        Self {
            rows: Vec::new(),
            message: err.to_string(),
        }
    }

    /// 将内部 Result 折叠为对外结果（错误只记日志，不向上抛）
    pub fn from_result(
        analyzer: &'static str,
        result: AnalyticsResult<(Vec<T>, String)>,
    ) -> Self {
        match result {
            Ok((rows, message)) => Self::success(rows, message),
            Err(err) => {
                tracing::warn!(analyzer, error = %err, "分析未产出结果");
                Self::failure(&err)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// 采购预测分析引擎 - 导入层
// ==========================================
// 职责: 外部表格文件 → 只读数据快照
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod snapshot_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use snapshot_importer::{SnapshotImporter, SnapshotSources};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, FileParser, RawRow, RawTable};

// ==========================================
// 采购预测分析引擎 - 快照导入器
// ==========================================
// 流程: 文件解析 → 字段映射 → 组装只读快照 (TableStore)
// 约定: 采购订单必需；供应商/物料/辅助表可选
// ==========================================

use crate::domain::catalog::AuxiliaryTable;
use crate::domain::snapshot::TableStore;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::FileParser;
use std::path::{Path, PathBuf};
use tracing::info;

/// 快照数据源
#[derive(Debug, Clone, Default)]
pub struct SnapshotSources {
    pub purchase_orders: PathBuf,
    pub suppliers: Option<PathBuf>,
    pub items: Option<PathBuf>,
}

impl SnapshotSources {
    pub fn new(purchase_orders: impl Into<PathBuf>) -> Self {
        Self {
            purchase_orders: purchase_orders.into(),
            ..Default::default()
        }
    }

    pub fn with_suppliers(mut self, path: impl Into<PathBuf>) -> Self {
        self.suppliers = Some(path.into());
        self
    }

    pub fn with_items(mut self, path: impl Into<PathBuf>) -> Self {
        self.items = Some(path.into());
        self
    }
}

// ==========================================
// SnapshotImporter
// ==========================================
pub struct SnapshotImporter<P: FileParser = UniversalFileParser> {
    parser: P,
    mapper: FieldMapper,
}

impl Default for SnapshotImporter<UniversalFileParser> {
    fn default() -> Self {
        Self::new(UniversalFileParser)
    }
}

impl<P: FileParser> SnapshotImporter<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            mapper: FieldMapper::default(),
        }
    }

    /// 加载完整快照
    pub fn load(&self, sources: &SnapshotSources) -> ImportResult<TableStore> {
        let purchase_orders = {
            let raw = self.parser.parse_to_raw_table(&sources.purchase_orders)?;
            self.mapper.map_purchase_orders(&raw)?
        };
        info!(
            path = %sources.purchase_orders.display(),
            rows = purchase_orders.len(),
            "采购订单已加载"
        );

        let mut store = TableStore::new(purchase_orders);

        if let Some(path) = &sources.suppliers {
            let raw = self.parser.parse_to_raw_table(path)?;
            let suppliers = self.mapper.map_suppliers(&raw)?;
            info!(path = %path.display(), rows = suppliers.suppliers.len(), "供应商表已加载");
            store = store.with_suppliers(suppliers);
        }

        if let Some(path) = &sources.items {
            let raw = self.parser.parse_to_raw_table(path)?;
            let items = self.mapper.map_items(&raw)?;
            info!(path = %path.display(), rows = items.items.len(), "物料目录已加载");
            store = store.with_items(items);
        }

        Ok(store)
    }

    /// 加载辅助表（到货/发票/合同/预算/询价），按原始文本保留
    pub fn load_auxiliary(&self, path: &Path) -> ImportResult<AuxiliaryTable> {
        let raw = self.parser.parse_to_raw_table(path)?;
        Ok(AuxiliaryTable {
            rows: raw.rows.into_iter().map(|row| row.values).collect(),
        })
    }
}

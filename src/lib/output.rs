use serde::Serialize;

use crate::lib::row::Row;
use crate::lib::sort::SortOrder;
use crate::lib::stats::StatsLine;
use crate::lib::table::Table;

/// Top-level JSON report containing metadata, sorted rows and statistics
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub metadata: OutputMetadata,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Vec<StatsLine>>,
}

/// Metadata about the report generation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMetadata {
    pub timestamp: String,
    pub total_rows: usize,
    pub total_children: usize,
    pub sort_columns: Vec<String>,
    pub sort_order: SortOrder,
}

impl ReportOutput {
    /// Create a new ReportOutput from an already sorted table
    pub fn new(
        table: Table,
        sort_columns: Vec<String>,
        sort_order: SortOrder,
        statistics: Option<Vec<StatsLine>>,
    ) -> Self {
        Self {
            metadata: OutputMetadata {
                timestamp: chrono::Utc::now().to_rfc3339(),
                total_rows: table.len(),
                total_children: table.children_count(),
                sort_columns,
                sort_order,
            },
            rows: table.into_rows(),
            statistics,
        }
    }
}

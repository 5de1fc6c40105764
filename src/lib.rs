//! VPA Recommendation Report Library
//!
//! This library renders vertical pod autoscaler recommendations as sorted,
//! kubectl-style tables, with optional summary statistics over the
//! requested and recommended CPU and memory.

pub mod lib {
    pub mod cli;
    pub mod compare;
    pub mod config;
    pub mod error;
    pub mod format;
    pub mod input;
    pub mod logger;
    pub mod output;
    pub mod quantity;
    pub mod row;
    pub mod sort;
    pub mod stats;
    pub mod table;
}

// Re-export commonly used types at the root level for convenience
pub use lib::cli::{Cli, OutputFormat};
pub use lib::compare::{compare_quantity, compare_scalar};
pub use lib::config::Config;
pub use lib::error::{ArithmeticError, ConfigError, QuantityError, ReportError, Result};
pub use lib::format::{ColorMode, DeltaTint};
pub use lib::input::{load_table, parse_table, percentage_difference};
pub use lib::logger::init_logger;
pub use lib::output::{OutputMetadata, ReportOutput};
pub use lib::quantity::{Quantity, QuantityFormat};
pub use lib::row::{GroupVersionKind, ResourcePair, Row};
pub use lib::sort::{MultiColumnSorter, SortColumn, SortOrder};
pub use lib::stats::{StatColumn, StatsLine};
pub use lib::table::Table;

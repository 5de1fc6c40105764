//! Multi-column, direction-aware stable sorting of table rows.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::lib::compare::{compare_quantity, compare_scalar};
use crate::lib::error::ConfigError;
use crate::lib::row::Row;

/// Sort direction applied to every column of a sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Applies the direction to a "placed before" decision.
    fn apply(&self, before: bool) -> bool {
        match self {
            SortOrder::Asc => before,
            SortOrder::Desc => !before,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ConfigError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Columns a table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Namespace,
    Target,
    CpuDiff,
    MemDiff,
    CpuReq,
    MemReq,
    CpuRec,
    MemRec,
}

impl SortColumn {
    pub const ALL: [SortColumn; 9] = [
        SortColumn::Name,
        SortColumn::Namespace,
        SortColumn::Target,
        SortColumn::CpuDiff,
        SortColumn::MemDiff,
        SortColumn::CpuReq,
        SortColumn::MemReq,
        SortColumn::CpuRec,
        SortColumn::MemRec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Namespace => "namespace",
            SortColumn::Target => "target",
            SortColumn::CpuDiff => "cpu-diff",
            SortColumn::MemDiff => "mem-diff",
            SortColumn::CpuReq => "cpu-req",
            SortColumn::MemReq => "mem-req",
            SortColumn::CpuRec => "cpu-rec",
            SortColumn::MemRec => "mem-rec",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Resolves column names, skipping any that are not recognized.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let column = Self::from_name(name);
                if column.is_none() {
                    debug!("Ignoring unknown sort column {name:?}");
                }
                column
            })
            .collect()
    }

    pub fn compare(&self, r1: &Row, r2: &Row) -> Ordering {
        match self {
            SortColumn::Name => r1.name.cmp(&r2.name),
            SortColumn::Namespace => r1.namespace.cmp(&r2.namespace),
            SortColumn::Target => r1.target_name.cmp(&r2.target_name),
            SortColumn::CpuDiff => compare_scalar(r1.cpu_difference, r2.cpu_difference),
            SortColumn::MemDiff => compare_scalar(r1.memory_difference, r2.memory_difference),
            SortColumn::CpuReq => {
                compare_quantity(r1.requests.cpu.as_ref(), r2.requests.cpu.as_ref())
            }
            SortColumn::MemReq => {
                compare_quantity(r1.requests.memory.as_ref(), r2.requests.memory.as_ref())
            }
            SortColumn::CpuRec => compare_quantity(
                r1.recommendations.cpu.as_ref(),
                r2.recommendations.cpu.as_ref(),
            ),
            SortColumn::MemRec => compare_quantity(
                r1.recommendations.memory.as_ref(),
                r2.recommendations.memory.as_ref(),
            ),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chain of column comparators sharing one direction
pub struct MultiColumnSorter<'a> {
    columns: &'a [SortColumn],
    order: SortOrder,
}

impl<'a> MultiColumnSorter<'a> {
    pub fn new(columns: &'a [SortColumn], order: SortOrder) -> Self {
        Self { columns, order }
    }

    /// Whether `r1` is placed before `r2`.
    ///
    /// The first column that tells the rows apart decides, and only that
    /// decision is flipped for descending order. Rows equal on every column
    /// are never placed before each other.
    pub fn precedes(&self, r1: &Row, r2: &Row) -> bool {
        for column in self.columns {
            match column.compare(r1, r2) {
                Ordering::Less => return self.order.apply(true),
                Ordering::Greater => return self.order.apply(false),
                Ordering::Equal => continue,
            }
        }
        false
    }

    /// Stable sort of `rows`. Children are moved along with their parent.
    pub fn sort(&self, rows: Vec<Row>) -> Vec<Row> {
        if self.columns.is_empty() {
            return rows;
        }
        merge_sort(rows, &|a: &Row, b: &Row| self.precedes(a, b))
    }
}

/// Top-down merge sort keyed on a "placed before" predicate.
///
/// Takes from the right run only when its head strictly precedes the left
/// head, which keeps equal elements in input order. The predicate does not
/// have to be a total order.
fn merge_sort<T, F>(mut items: Vec<T>, precedes: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, precedes);
    let right = merge_sort(right, precedes);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => precedes(r, l),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

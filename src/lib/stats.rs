//! Sum, mean and median over the quantity columns of a table.
//!
//! Unset values are skipped everywhere, all arithmetic is exact, and every
//! division truncates toward zero at an explicit scale.

use num_bigint::BigInt;
use serde::Serialize;

use crate::lib::compare::compare_quantity;
use crate::lib::error::{ArithmeticError, Result};
use crate::lib::format::{TABLE_UNSET_CELL, format_bytes, format_cores};
use crate::lib::quantity::{Quantity, quo_round_down};
use crate::lib::row::Row;

/// Numeric columns the summary aggregates, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatColumn {
    CpuRecommendation,
    CpuRequest,
    MemoryRecommendation,
    MemoryRequest,
}

impl StatColumn {
    pub const ALL: [StatColumn; 4] = [
        StatColumn::CpuRecommendation,
        StatColumn::CpuRequest,
        StatColumn::MemoryRecommendation,
        StatColumn::MemoryRequest,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            StatColumn::CpuRecommendation => "CPU Recommendations (# cores)",
            StatColumn::CpuRequest => "CPU Requests (# cores)",
            StatColumn::MemoryRecommendation => "MEM Recommendations (IEC/SI)",
            StatColumn::MemoryRequest => "MEM Requests (IEC/SI)",
        }
    }

    pub fn is_bytes(&self) -> bool {
        matches!(
            self,
            StatColumn::MemoryRecommendation | StatColumn::MemoryRequest
        )
    }

    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Quantity> {
        match self {
            StatColumn::CpuRecommendation => row.recommendations.cpu.as_ref(),
            StatColumn::CpuRequest => row.requests.cpu.as_ref(),
            StatColumn::MemoryRecommendation => row.recommendations.memory.as_ref(),
            StatColumn::MemoryRequest => row.requests.memory.as_ref(),
        }
    }

    fn render(&self, quantity: &Quantity) -> String {
        if self.is_bytes() {
            format_bytes(quantity)
        } else {
            format_cores(quantity)
        }
    }
}

/// Exact sum of the set values; zero when none are set.
pub fn sum(rows: &[Row], column: StatColumn) -> Quantity {
    let mut total = Quantity::zero();
    for value in rows.iter().filter_map(|row| column.value(row)) {
        total.add(value);
    }
    total
}

/// Sum divided by the number of rows, unset rows included.
///
/// Truncates toward zero at the scale of the sum. Fails on an empty table.
pub fn mean(rows: &[Row], column: StatColumn) -> Result<Quantity> {
    if rows.is_empty() {
        return Err(ArithmeticError::DivisionByZero(format!(
            "the mean of {}",
            column.description()
        ))
        .into());
    }
    let total = sum(rows, column);
    let (_, scale) = total.as_decimal().as_bigint_and_exponent();
    let count = BigInt::from(rows.len());
    Ok(Quantity::from_decimal(quo_round_down(
        total.as_decimal(),
        &count,
        scale,
    )))
}

/// Median of the set values, `None` when no value is set.
///
/// For an even count the elements at `n/2 - 1` and `n/2 + 1` are averaged
/// and truncated to a whole number. The upper index is clamped to the last
/// element, which only matters when `n == 2`.
pub fn median(rows: &[Row], column: StatColumn) -> Option<Quantity> {
    let mut values: Vec<&Quantity> = rows.iter().filter_map(|row| column.value(row)).collect();
    values.sort_by(|a, b| compare_quantity(Some(*a), Some(*b)));

    let len = values.len();
    if len == 0 {
        return None;
    }
    if len % 2 == 1 {
        return Some(values[len / 2].clone());
    }

    let mut pair = values[len / 2 - 1].clone();
    pair.add(values[(len / 2 + 1).min(len - 1)]);
    Some(Quantity::from_decimal(quo_round_down(
        pair.as_decimal(),
        &BigInt::from(2),
        0,
    )))
}

/// One rendered line of the statistics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsLine {
    pub description: String,
    pub total: String,
    pub mean: String,
    pub median: String,
}

impl StatsLine {
    pub fn cells(&self) -> [&str; 4] {
        [&self.description, &self.total, &self.mean, &self.median]
    }
}

/// Computes and renders every statistics line for `rows`.
pub fn summarize(rows: &[Row]) -> Result<Vec<StatsLine>> {
    StatColumn::ALL
        .iter()
        .map(|column| -> Result<StatsLine> {
            let total = sum(rows, *column);
            let mean = mean(rows, *column)?;
            let median = median(rows, *column);
            Ok(StatsLine {
                description: column.description().to_string(),
                total: column.render(&total),
                mean: column.render(&mean),
                median: median
                    .map(|m| column.render(&m))
                    .unwrap_or_else(|| TABLE_UNSET_CELL.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::error::ReportError;
    use crate::lib::row::ResourcePair;

    fn cpu_rows(values: &[Option<&str>]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Row::new(&format!("row-{i}"), "default").with_recommendations(ResourcePair::new(
                    v.map(|s| s.parse().unwrap()),
                    None,
                ))
            })
            .collect()
    }

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    #[test]
    fn test_sum_skips_unset() {
        let rows = cpu_rows(&[Some("500m"), None, Some("1"), Some("250m")]);
        let total = sum(&rows, StatColumn::CpuRecommendation);
        assert_eq!(total, q("1.75"));
        assert_eq!(format_cores(&total), "1.750");
    }

    #[test]
    fn test_sum_of_all_unset_is_zero() {
        let rows = cpu_rows(&[None, None]);
        let total = sum(&rows, StatColumn::CpuRecommendation);
        assert!(total.is_zero());
        assert!(sum(&[], StatColumn::MemoryRequest).is_zero());
    }

    #[test]
    fn test_mean_divides_by_all_rows() {
        let rows = cpu_rows(&[Some("1"), None, Some("2")]);
        // 3 / 3 rows, unset row counted
        assert_eq!(mean(&rows, StatColumn::CpuRecommendation).unwrap(), q("1"));

        let rows = cpu_rows(&[Some("1.100"), Some("0"), Some("0")]);
        let result = mean(&rows, StatColumn::CpuRecommendation).unwrap();
        assert_eq!(format_cores(&result), "0.366");
    }

    #[test]
    fn test_mean_truncates_at_sum_scale() {
        let rows = cpu_rows(&[Some("1"), Some("2")]);
        let result = mean(&rows, StatColumn::CpuRecommendation).unwrap();
        assert_eq!(format_cores(&result), "1");
    }

    #[test]
    fn test_mean_of_no_rows_fails() {
        let err = mean(&[], StatColumn::CpuRequest).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Arithmetic(ArithmeticError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_median_empty_is_none() {
        assert!(median(&[], StatColumn::CpuRecommendation).is_none());
        let rows = cpu_rows(&[None, None]);
        assert!(median(&rows, StatColumn::CpuRecommendation).is_none());
    }

    #[test]
    fn test_median_odd_count() {
        let rows = cpu_rows(&[Some("3"), Some("1"), None, Some("2")]);
        assert_eq!(median(&rows, StatColumn::CpuRecommendation).unwrap(), q("2"));
    }

    #[test]
    fn test_median_even_count_uses_upper_skip_index() {
        let rows = cpu_rows(&[Some("4"), Some("2"), Some("1"), Some("3")]);
        // (values[1] + values[3]) / 2 = (2 + 4) / 2
        assert_eq!(median(&rows, StatColumn::CpuRecommendation).unwrap(), q("3"));
    }

    #[test]
    fn test_median_even_truncates_to_integer() {
        let rows = cpu_rows(&[Some("100m"), Some("200m"), Some("300m"), Some("2500m")]);
        // (0.2 + 2.5) / 2 = 1.35, truncated
        let result = median(&rows, StatColumn::CpuRecommendation).unwrap();
        assert_eq!(format_cores(&result), "1");
    }

    #[test]
    fn test_median_of_two_values() {
        let rows = cpu_rows(&[Some("5"), Some("2")]);
        assert_eq!(median(&rows, StatColumn::CpuRecommendation).unwrap(), q("3"));
    }

    #[test]
    fn test_median_leaves_rows_untouched() {
        let rows = cpu_rows(&[Some("1"), Some("2"), Some("3"), Some("4")]);
        let before = rows.clone();
        median(&rows, StatColumn::CpuRecommendation);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_summarize_lines() {
        let rows = vec![
            Row::new("a", "default")
                .with_requests(ResourcePair::new(Some(q("500m")), Some(q("128Mi"))))
                .with_recommendations(ResourcePair::new(Some(q("1")), Some(q("1288490189")))),
            Row::new("b", "default")
                .with_requests(ResourcePair::new(Some(q("1500m")), None))
                .with_recommendations(ResourcePair::new(None, None)),
        ];
        let lines = summarize(&rows).unwrap();
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0].description, "CPU Recommendations (# cores)");
        assert_eq!(lines[0].cells()[1..], ["1", "0", "1"]);

        assert_eq!(lines[1].description, "CPU Requests (# cores)");
        assert_eq!(lines[1].cells()[1..], ["2.000", "1.000", "1"]);

        assert_eq!(lines[2].total, "1.2GiB/1.3GB");
        assert_eq!(lines[2].median, "1.2GiB/1.3GB");

        assert_eq!(lines[3].total, "128MiB/134MB");
        assert_eq!(lines[3].mean, "64MiB/67MB");
    }

    #[test]
    fn test_summarize_empty_fails() {
        assert!(summarize(&[]).is_err());
    }
}

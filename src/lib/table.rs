use std::io::Write;

use log::debug;
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Segment};
use tabled::settings::{Alignment, Modify, Padding, Style};

use crate::lib::config::Config;
use crate::lib::error::Result;
use crate::lib::format::{ColorMode, format_kind_prefixed, format_percentage, format_quantity};
use crate::lib::row::Row;
use crate::lib::sort::{MultiColumnSorter, SortColumn, SortOrder};
use crate::lib::stats::{StatsLine, summarize};

const TREE_ELEM_PREFIX: &str = "├─ ";
const TREE_LAST_ELEM_PREFIX: &str = "└─ ";
const TABLE_PADDING: usize = 3;

const HDR_NAMESPACE: &str = "Namespace";
const HDR_NAME: &str = "Name";
const HDR_MODE: &str = "Mode";
const HDR_TARGET: &str = "Target";
const HDR_CPU_REQUEST: &str = "CPU Request";
const HDR_CPU_TARGET: &str = "CPU Target";
const HDR_CPU_DIFFERENCE: &str = "% CPU Diff";
const HDR_MEM_REQUEST: &str = "Memory Request";
const HDR_MEM_TARGET: &str = "Memory Target";
const HDR_MEM_DIFFERENCE: &str = "% Memory Diff";

const STATS_HEADERS: [&str; 4] = ["Description", "Total", "Mean", "Median"];

/// Ordered list of recommendation rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of child rows across all top-level rows
    pub fn children_count(&self) -> usize {
        self.rows.iter().map(|r| r.children.len()).sum()
    }

    /// Stable sort of the top-level rows by one or more columns.
    pub fn sort_by(&mut self, order: SortOrder, columns: &[SortColumn]) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = MultiColumnSorter::new(columns, order).sort(rows);
    }

    /// Like [`Table::sort_by`], with column names; unknown names are ignored.
    pub fn sort_by_names<S: AsRef<str>>(&mut self, order: SortOrder, names: &[S]) {
        let columns = SortColumn::parse_list(names);
        debug!(
            "Sorting {} rows by {:?} ({order})",
            self.rows.len(),
            columns.iter().map(SortColumn::as_str).collect::<Vec<_>>()
        );
        self.sort_by(order, &columns);
    }

    pub fn statistics(&self) -> Result<Vec<StatsLine>> {
        summarize(&self.rows)
    }

    /// Writes the table to `w`, detecting color support from the terminal.
    pub fn print<W: Write>(&self, w: &mut W, config: &Config) -> Result<()> {
        self.print_with_colors(w, config, ColorMode::detect(config.no_colors))
    }

    pub fn print_with_colors<W: Write>(
        &self,
        w: &mut W,
        config: &Config,
        colors: ColorMode,
    ) -> Result<()> {
        let headers = (!config.no_headers).then(|| headers(config));

        let mut records = Vec::new();
        for row in &self.rows {
            records.push(row_cells(row, config, colors, None));
            let last = row.children.len().saturating_sub(1);
            for (i, child) in row.children.iter().enumerate() {
                let prefix = if i == last {
                    TREE_LAST_ELEM_PREFIX
                } else {
                    TREE_ELEM_PREFIX
                };
                records.push(row_cells(child, config, colors, Some(prefix)));
            }
        }
        write_kubectl_table(w, headers, records)?;

        if config.show_stats {
            writeln!(w)?;
            self.print_stats(w)?;
        }
        Ok(())
    }

    /// Writes the sum/mean/median summary table to `w`.
    pub fn print_stats<W: Write>(&self, w: &mut W) -> Result<()> {
        let lines = self.statistics()?;
        let records: Vec<Vec<String>> = lines
            .iter()
            .map(|line| line.cells().iter().map(|c| c.to_string()).collect())
            .collect();
        let headers: Vec<String> = STATS_HEADERS.iter().map(|h| h.to_string()).collect();
        write_kubectl_table(w, Some(headers), records)
    }
}

fn headers(config: &Config) -> Vec<String> {
    let mut headers = Vec::with_capacity(10);
    if config.show_namespace {
        headers.push(HDR_NAMESPACE);
    }
    headers.extend([HDR_NAME, HDR_MODE, HDR_TARGET]);
    if config.wide {
        headers.extend([HDR_CPU_REQUEST, HDR_CPU_TARGET]);
    }
    headers.push(HDR_CPU_DIFFERENCE);
    if config.wide {
        headers.extend([HDR_MEM_REQUEST, HDR_MEM_TARGET]);
    }
    headers.push(HDR_MEM_DIFFERENCE);
    headers.into_iter().map(String::from).collect()
}

/// Cells of one row; child rows get a tree prefix and no kind prefix.
fn row_cells(row: &Row, config: &Config, colors: ColorMode, tree: Option<&str>) -> Vec<String> {
    let mut cells = Vec::with_capacity(10);

    let (name, target) = match tree {
        Some(prefix) => (format!("{prefix}{}", row.name), row.target_name.clone()),
        None if config.show_kind => (
            format_kind_prefixed(&row.kind.group_kind(), &row.name, colors),
            format_kind_prefixed(&row.target_kind.group_kind(), &row.target_name, colors),
        ),
        None => (row.name.clone(), row.target_name.clone()),
    };

    if config.show_namespace {
        cells.push(row.namespace.clone());
    }
    cells.extend([name, row.mode.clone(), target]);

    if config.wide {
        cells.push(format_quantity(row.requests.cpu.as_ref()));
        cells.push(format_quantity(row.recommendations.cpu.as_ref()));
    }
    cells.push(format_percentage(row.cpu_difference, colors));
    if config.wide {
        cells.push(format_quantity(row.requests.memory.as_ref()));
        cells.push(format_quantity(row.recommendations.memory.as_ref()));
    }
    cells.push(format_percentage(row.memory_difference, colors));
    cells
}

/// Renders records the way kubectl prints tables: upper-cased headers,
/// left-aligned columns, no borders and three spaces between columns.
fn write_kubectl_table<W: Write>(
    w: &mut W,
    headers: Option<Vec<String>>,
    records: Vec<Vec<String>>,
) -> Result<()> {
    if headers.is_none() && records.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();
    if let Some(headers) = headers {
        builder.push_record(headers.iter().map(|h| h.to_uppercase()));
    }
    for record in records {
        builder.push_record(record);
    }

    let mut table = builder.build();
    table
        .with(Style::empty())
        .with(Alignment::left())
        .with(Modify::new(Segment::all()).with(Padding::new(0, TABLE_PADDING, 0, 0)))
        .with(Modify::new(Columns::last()).with(Padding::zero()));

    writeln!(w, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::format::DeltaTint;
    use crate::lib::row::{GroupVersionKind, ResourcePair};

    fn q(s: &str) -> Option<crate::lib::quantity::Quantity> {
        Some(s.parse().unwrap())
    }

    fn render(table: &Table, config: &Config, colors: ColorMode) -> String {
        let mut out = Vec::new();
        table.print_with_colors(&mut out, config, colors).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_table() -> Table {
        Table::new(vec![
            Row::new("web-vpa", "prod")
                .with_target("web", GroupVersionKind::new("apps", "v1", "Deployment"))
                .with_requests(ResourcePair::new(q("100m"), q("128Mi")))
                .with_recommendations(ResourcePair::new(q("150m"), q("64Mi")))
                .with_differences(Some(50.0), Some(-50.0))
                .with_child(Row::new("nginx", "prod").with_differences(Some(10.0), None))
                .with_child(Row::new("sidecar", "prod")),
            Row::new("api-vpa", "dev")
                .with_target("api", GroupVersionKind::new("apps", "v1", "StatefulSet"))
                .with_requests(ResourcePair::new(q("1"), None))
                .with_recommendations(ResourcePair::new(q("2"), q("1Gi")))
                .with_differences(Some(100.0), None),
        ])
    }

    #[test]
    fn test_default_layout() {
        let out = render(&sample_table(), &Config::default(), ColorMode::disabled());
        let lines: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], ["NAME", "MODE", "TARGET", "%", "CPU", "DIFF", "%", "MEMORY", "DIFF"]);
        assert_eq!(lines[1], ["web-vpa", "web", "+50.00", "-50.00"]);
        assert_eq!(lines[2], ["├─", "nginx", "+10.00", "-"]);
        assert_eq!(lines[3], ["└─", "sidecar", "-", "-"]);
        assert_eq!(lines[4], ["api-vpa", "api", "+100.00", "-"]);
    }

    #[test]
    fn test_columns_are_aligned() {
        let out = render(&sample_table(), &Config::default(), ColorMode::disabled());
        let lines: Vec<&str> = out.lines().collect();
        let target_col = lines[0].find("TARGET").unwrap();
        assert!(lines[1][target_col..].starts_with("web"));
        assert!(lines[4][target_col..].starts_with("api"));
        assert!(lines[0].starts_with("NAME   "));
    }

    #[test]
    fn test_wide_layout_with_namespace() {
        let config = Config {
            show_namespace: true,
            wide: true,
            no_headers: true,
            ..Config::default()
        };
        let out = render(&sample_table(), &config, ColorMode::disabled());
        let lines: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            ["prod", "web-vpa", "web", "100m", "150m", "+50.00", "128Mi", "64Mi", "-50.00"]
        );
        assert_eq!(
            lines[3],
            ["dev", "api-vpa", "api", "1", "2", "+100.00", "-", "1Gi", "-"]
        );
    }

    #[test]
    fn test_show_kind_prefixes_top_level_only() {
        let config = Config {
            show_kind: true,
            no_headers: true,
            ..Config::default()
        };
        let mut table = sample_table();
        table.rows[0].kind =
            GroupVersionKind::new("autoscaling.k8s.io", "v1", "VerticalPodAutoscaler");
        let out = render(&table, &config, ColorMode::disabled());
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("verticalpodautoscaler.autoscaling.k8s.io/web-vpa"));
        assert!(lines[0].contains("deployment.apps/web"));
        assert!(lines[1].contains("├─ nginx"));
        assert!(!lines[1].contains("/nginx"));
        assert!(lines[3].contains("statefulset.apps/api"));
    }

    #[test]
    fn test_tints_follow_delta_bands() {
        let table = Table::new(vec![
            Row::new("a", "x").with_differences(Some(5.0), None),
            Row::new("b", "x").with_differences(Some(25.0), None),
            Row::new("c", "x").with_differences(Some(-60.0), None),
        ]);
        let config = Config {
            no_headers: true,
            ..Config::default()
        };
        let out = render(&table, &config, ColorMode::new(true));

        let styles = [DeltaTint::Good, DeltaTint::Warning, DeltaTint::Alert]
            .map(|tint| tint.style().render().to_string());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, style) in lines.iter().zip(&styles) {
            assert!(line.contains(style.as_str()), "{line:?} lacks {style:?}");
        }
        assert_ne!(styles[0], styles[1]);
        assert_ne!(styles[1], styles[2]);
    }

    #[test]
    fn test_stats_follow_main_table() {
        let config = Config {
            show_stats: true,
            ..Config::default()
        };
        let out = render(&sample_table(), &config, ColorMode::disabled());
        let sections: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(sections.len(), 2);

        let stats: Vec<&str> = sections[1].lines().collect();
        assert_eq!(stats.len(), 5);
        assert_eq!(
            stats[0].split_whitespace().collect::<Vec<_>>(),
            ["DESCRIPTION", "TOTAL", "MEAN", "MEDIAN"]
        );
        assert!(stats[1].starts_with("CPU Recommendations (# cores)"));
        let cpu: Vec<&str> = stats[1].split_whitespace().collect();
        assert_eq!(cpu[cpu.len() - 3..], ["2.150", "1.075", "1"]);
        let cpu_requests: Vec<&str> = stats[2].split_whitespace().collect();
        assert_eq!(cpu_requests[cpu_requests.len() - 3..], ["1.100", "0.550", "0"]);
        assert!(stats[3].contains("1.1GiB/1.1GB"));
        assert!(stats[4].contains("128MiB/134MB"));
    }

    #[test]
    fn test_stats_on_empty_table_fail() {
        let config = Config {
            show_stats: true,
            ..Config::default()
        };
        let mut out = Vec::new();
        let result = Table::default().print_with_colors(&mut out, &config, ColorMode::disabled());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_table_without_headers_prints_nothing() {
        let config = Config {
            no_headers: true,
            ..Config::default()
        };
        let out = render(&Table::default(), &config, ColorMode::disabled());
        assert!(out.is_empty());
    }

    #[test]
    fn test_sort_by_names() {
        let mut table = sample_table();
        table.sort_by_names(SortOrder::Asc, &["nope", "namespace"]);
        let names: Vec<_> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["api-vpa", "web-vpa"]);
        assert_eq!(table.children_count(), 2);
        assert_eq!(table.rows()[1].children[0].name, "nginx");
    }
}

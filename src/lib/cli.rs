use std::path::PathBuf;

use clap::Parser;

use crate::SortOrder;

/// VPA Recommendation Report
///
/// Renders vertical pod autoscaler recommendations as a sorted table,
/// comparing current requests with recommended targets.
#[derive(Parser, Debug)]
#[command(name = "vpa-report", author, version, about, styles=get_styles())]
pub struct Cli {
    /// File with recommendation records (JSON or YAML)
    ///
    /// Reads from stdin when omitted or set to "-"
    #[arg(short, long, value_name = "FILE")]
    pub filename: Option<PathBuf>,

    /// Output format: table (default), wide or json
    #[arg(short, long, value_name = "FORMAT", default_value = "table")]
    pub output: OutputFormat,

    /// Show the namespace column
    #[arg(long)]
    pub show_namespace: bool,

    /// Prefix names and targets with their resource kind
    #[arg(long)]
    pub show_kind: bool,

    /// Don't print table headers
    #[arg(long)]
    pub no_headers: bool,

    /// Don't colorize percentage differences
    #[arg(long)]
    pub no_colors: bool,

    /// Print sum, mean and median of requests and recommendations
    #[arg(long)]
    pub stats: bool,

    /// Comma-separated list of columns to sort by
    ///
    /// One or more of: name, namespace, target, cpu-diff, mem-diff,
    /// cpu-req, mem-req, cpu-rec, mem-rec. Unknown columns are ignored.
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',', default_value = "namespace,name")]
    pub sort_columns: Vec<String>,

    /// Sort order: asc or desc
    #[arg(long, value_name = "ORDER", default_value = "asc")]
    pub sort_order: SortOrder,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress log output to stderr (logs still written to file)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table with percentage differences only
    Table,
    /// Table including raw requests and recommendations
    Wide,
    /// Sorted rows as JSON
    Json,
}

/// Set color and variants for help description
///
/// Thanks to [Praveen Perera](https://stackoverflow.com/a/76916424)
fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}

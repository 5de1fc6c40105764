use crate::lib::cli::{Cli, OutputFormat};
use crate::lib::sort::SortOrder;

/// Presentation options for a report
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub show_namespace: bool,
    pub show_kind: bool,
    pub wide: bool,
    pub no_headers: bool,
    pub no_colors: bool,
    pub show_stats: bool,
    pub sort_columns: Vec<String>,
    pub sort_order: SortOrder,
}

impl Config {
    pub fn new(sort_columns: Vec<String>, sort_order: SortOrder) -> Self {
        Self {
            sort_columns,
            sort_order,
            ..Default::default()
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            show_namespace: cli.show_namespace,
            show_kind: cli.show_kind,
            wide: cli.output == OutputFormat::Wide,
            no_headers: cli.no_headers,
            no_colors: cli.no_colors,
            show_stats: cli.stats,
            sort_columns: cli.sort_columns.clone(),
            sort_order: cli.sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli() {
        let cli = Cli::try_parse_from([
            "vpa-report",
            "-o",
            "wide",
            "--show-namespace",
            "--no-colors",
            "--stats",
            "--sort-columns",
            "mem-rec",
        ])
        .unwrap();
        let config = Config::from(&cli);

        assert!(config.wide);
        assert!(config.show_namespace);
        assert!(config.no_colors);
        assert!(config.show_stats);
        assert!(!config.show_kind);
        assert!(!config.no_headers);
        assert_eq!(config.sort_columns, ["mem-rec"]);
        assert_eq!(config.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_json_output_is_not_wide() {
        let cli = Cli::try_parse_from(["vpa-report", "-o", "json"]).unwrap();
        assert!(!Config::from(&cli).wide);
    }
}

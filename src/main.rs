use std::io::Write;

use clap::Parser;
use log::{debug, info};
use vpa_report::{Cli, Config, OutputFormat, ReportOutput, Result, init_logger, load_table};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.verbose, cli.quiet)?;

    debug!("Output format: {:?}", cli.output);
    let config = Config::from(&cli);

    let mut table = load_table(cli.filename.as_deref())?;
    if table.is_empty() && cli.output != OutputFormat::Json {
        eprintln!("warning: no recommendations found in input");
        return Ok(());
    }

    table.sort_by_names(config.sort_order, &config.sort_columns);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Json => {
            let statistics = if config.show_stats && !table.is_empty() {
                Some(table.statistics()?)
            } else {
                None
            };
            let report = ReportOutput::new(
                table,
                config.sort_columns.clone(),
                config.sort_order,
                statistics,
            );
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Table | OutputFormat::Wide => {
            table.print(&mut out, &config)?;
        }
    }
    out.flush()?;

    info!("Report complete");
    Ok(())
}

//! Builds the region table from the three core level files and writes it to
//! the configured output.
//!
//! ```text
//! cargo run --bin aggregate -- --config census.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use school_census::data::aggregate::aggregate;
use school_census::data::export::{aggregate_headers, save_aggregate};
use school_census::data::loader::load_levels;
use school_census::{CensusConfig, RegionAggregate, SchoolLevel};

#[derive(Parser, Debug)]
#[command(name = "aggregate", about = "Aggregate schools and students per region")]
struct Cli {
    /// JSON config file; defaults apply when it does not exist.
    #[arg(short, long, default_value = school_census::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides `aggregate_output` from the config.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the table printout.
    #[arg(short, long)]
    quiet: bool,
}

fn render(aggregate: &RegionAggregate) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(aggregate_headers().into_iter().map(Cell::new));
    for row in aggregate.iter_with_total() {
        let mut cells = vec![Cell::new(&row.region)];
        cells.extend(row.schools.iter().map(Cell::new));
        cells.extend(row.students.iter().map(Cell::new));
        table.add_row(cells);
    }
    table
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = CensusConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    let (tables, errors) = load_levels(&config, &SchoolLevel::CORE);
    for e in &errors {
        log::warn!("{e}");
    }
    if tables.is_empty() {
        anyhow::bail!("none of the core level files could be loaded");
    }

    let aggregate = aggregate(&tables, &config.region_prefix, &config.total_label);

    let output = cli.output.unwrap_or_else(|| config.aggregate_output.clone());
    save_aggregate(&output, &aggregate)
        .with_context(|| format!("writing {}", output.display()))?;

    if !cli.quiet {
        println!("{}", render(&aggregate));
    }
    println!(
        "Wrote {} regions (+ {}) to {}",
        aggregate.rows.len(),
        config.total_label,
        output.display()
    );
    Ok(())
}

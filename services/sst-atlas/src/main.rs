//! SST atlas command line.
//!
//! Writes the map PNG and the PDF report into the output directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sst_atlas::{run, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "sst-atlas")]
#[command(about = "Synthetic SST map and PDF report generator")]
struct Args {
    /// Region configuration file (default: built-in Nicaragua region)
    #[arg(short, long, env = "SST_ATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the PNG and PDF outputs
    #[arg(short, long, env = "SST_ATLAS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Override the map resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// TrueType font for map labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level).with_target(false);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let options = RunOptions {
        config_path: args.config,
        output_dir: args.output_dir,
        dpi: args.dpi,
        font_path: args.font,
    };
    let config = options.load_region()?;
    info!(zone = %config.name, dpi = config.map.dpi, "Loaded region");

    let output = run(&config, &options)?;
    info!(
        report = %output.report.path.display(),
        image_embedded = output.report.image_embedded,
        "Done"
    );

    Ok(())
}

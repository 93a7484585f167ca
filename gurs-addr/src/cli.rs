//! Options de la ligne de commande et commande de conversion

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use gurs_addr::{pipeline, Config};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input house-number shapefile (HS layer)
    #[arg(
        short,
        long = "in",
        default_value = "data/temp/HS-etrs89/SI.GURS.RPE.PUB.HS-etrs89.shp"
    )]
    pub input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long = "out", default_value = "data/slovenia-housenumbers.geojson")]
    pub output: PathBuf,

    /// Config preset name (rpe) or path to a JSON config
    #[arg(long, default_value = "rpe")]
    pub config: String,

    /// Directory prepended to relative lookup paths
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Write a JSON conversion report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Exécute la conversion
pub async fn cmd_convert(args: &ConvertArgs) -> Result<()> {
    let mut config = Config::resolve(&args.config)?;
    if let Some(root) = &args.data_root {
        config = config.with_data_root(root);
    }

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        config = %args.config,
        "Starting conversion"
    );

    let report = pipeline::run(&config, &args.input, &args.output).await?;
    report.display();

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!(path = %path.display(), "Report saved");
    }

    info!("{}", report.summary());
    Ok(())
}

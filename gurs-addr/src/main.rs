//! Point d'entrée CLI pour gurs-addr

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::ConvertArgs;

/// Convertir les numéros de maison GURS en GeoJSON tagué OpenStreetMap
#[derive(Parser)]
#[command(name = "gurs-addr")]
#[command(author, version)]
#[command(about = "Convert the GURS house-number register (RPE) to an OpenStreetMap-tagged GeoJSON")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    cli::cmd_convert(&cli.convert).await
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}

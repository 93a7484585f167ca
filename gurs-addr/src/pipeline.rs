//! Enchaînement des phases: tables → transformation → tri → export

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::address::read_records;
use crate::config::{AddressFields, Config};
use crate::export::export_to_geojson;
use crate::feature::FeatureCollection;
use crate::lookup::Lookups;
use crate::report::ConversionReport;
use crate::transform::{transform, TransformStats};

/// Lit la couche HS et la transforme, enregistrement par enregistrement
pub fn read_addresses(
    input: &Path,
    fields: &AddressFields,
    lookups: &Lookups,
    validity_sentinel: &str,
) -> Result<(FeatureCollection, TransformStats)> {
    let mut reader = gurs_shp::open(input)
        .with_context(|| format!("Failed to open address source {}", input.display()))?;
    let extent = reader.bbox();
    info!(
        records = reader.record_count(),
        min_x = extent.min().x,
        min_y = extent.min().y,
        max_x = extent.max().x,
        max_y = extent.max().y,
        "Reading address layer"
    );
    let records = read_records(&mut reader, fields)
        .with_context(|| format!("Unexpected layout in {}", input.display()))?;

    transform(records, lookups, validity_sentinel)
        .with_context(|| format!("Failed to read {}", input.display()))
}

/// Exécute la conversion complète.
///
/// # Errors
///
/// Une source impossible à ouvrir ou un fichier de sortie impossible à
/// écrire interrompent la conversion; tout le reste se dégrade localement.
pub async fn run(config: &Config, input: &Path, output: &Path) -> Result<ConversionReport> {
    let started_at = Instant::now();
    let mut report = ConversionReport::new(input, output);

    let lookups = Lookups::load(&config.lookups).await?;
    report.record_lookups(&lookups);

    info!(path = %input.display(), "Reading addresses");
    let (mut collection, stats) = tokio::task::spawn_blocking({
        let input = input.to_path_buf();
        let fields = config.address.clone();
        let sentinel = config.validity_sentinel.clone();
        move || read_addresses(&input, &fields, &lookups, &sentinel)
    })
    .await
    .context("Address task failed")??;
    report.transform = stats;

    report.mixed_postcodes = collection.sort();

    export_to_geojson(&collection.features, output)?;
    report.features_written = collection.len();
    report.set_duration(started_at.elapsed());

    info!(
        features = collection.len(),
        path = %output.display(),
        "Saved addresses"
    );
    Ok(report)
}

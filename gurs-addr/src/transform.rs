//! Jointure des enregistrements HS avec les tables de correspondance

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::address::AddressRecord;
use crate::feature::{AddressFeature, FeatureCollection, Language, Location, NameFamily};
use crate::lookup::{LookupTable, Lookups};

/// 7 décimales
const ROUNDING_FACTOR: f64 = 10_000_000.0;

/// Raison pour laquelle un enregistrement ne produit pas de feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// STATUS différent de la sentinelle (état historique)
    InvalidStatus,
    /// Géométrie Null: aucune coordonnée à reporter
    NoGeometry,
}

/// Compteurs de la phase de transformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub records_read: usize,
    pub skipped_invalid: usize,
    pub skipped_no_geometry: usize,
    pub bilingual_streets: usize,
    pub bilingual_places: usize,
    pub without_location: usize,
    pub without_postcode: usize,
}

/// Arrondi au plus proche (pas de troncature)
pub fn round_coord(value: f64) -> f64 {
    (value * ROUNDING_FACTOR).round() / ROUNDING_FACTOR
}

/// "YYYYMMDD" → "YYYY-MM-DD" par découpage positionnel.
///
/// Aucune validation: une date mal formée reste mal formée, sans paniquer sur
/// une entrée trop courte.
pub fn iso_date(compact: &str) -> String {
    let chars: Vec<char> = compact.chars().collect();
    let slice = |from: usize, to: usize| -> String {
        chars[from.min(chars.len())..to.min(chars.len())]
            .iter()
            .collect()
    };
    format!("{}-{}-{}", slice(0, 4), slice(4, 6), slice(6, 8))
}

/// Nom simple ou bilingue selon la table alternative
fn resolve_location(
    family: NameFamily,
    mid: &str,
    names: &LookupTable,
    alternates: &LookupTable,
    longitude: f64,
) -> Option<Location> {
    let name = names.get(mid)?;
    match alternates.get(mid) {
        Some(alternate) if alternate != name => Some(Location::bilingual(
            family,
            name,
            alternate,
            Language::minority_at(longitude),
        )),
        _ => Some(Location::plain(family, name)),
    }
}

/// Construit la feature d'un enregistrement
pub fn transform_record(
    record: &AddressRecord,
    lookups: &Lookups,
    validity_sentinel: &str,
) -> Result<AddressFeature, Skip> {
    if record.status != validity_sentinel {
        return Err(Skip::InvalidStatus);
    }

    let corner = record.corner.ok_or(Skip::NoGeometry)?;
    let lat = round_coord(corner.y);
    let lon = round_coord(corner.x);

    // Rue si elle existe, sinon le lieu-dit (jamais les deux)
    let location = if lookups.street_name.contains_key(&record.street_mid) {
        resolve_location(
            NameFamily::Street,
            &record.street_mid,
            &lookups.street_name,
            &lookups.street_name_alt,
            lon,
        )
    } else {
        resolve_location(
            NameFamily::Place,
            &record.settlement_mid,
            &lookups.settlement_name,
            &lookups.settlement_name_alt,
            lon,
        )
    };

    Ok(AddressFeature {
        lat,
        lon,
        housenumber: record.label.to_lowercase(),
        postcode: lookups.postal_code.get(&record.postal_mid).map(str::to_string),
        city: lookups.city_name.get(&record.postal_mid).map(str::to_string),
        location,
        source_date: iso_date(&record.valid_from),
        reference: record.id.clone(),
    })
}

/// Transforme les enregistrements dans leur ordre de lecture.
///
/// # Errors
///
/// Seule une erreur de lecture de la source est propagée; les enregistrements
/// écartés sont comptés dans `TransformStats`.
pub fn transform<I>(
    records: I,
    lookups: &Lookups,
    validity_sentinel: &str,
) -> Result<(FeatureCollection, TransformStats)>
where
    I: IntoIterator<Item = Result<AddressRecord>>,
{
    let mut collection = FeatureCollection::default();
    let mut stats = TransformStats::default();

    for record in records {
        let record = record?;
        stats.records_read += 1;

        match transform_record(&record, lookups, validity_sentinel) {
            Ok(feature) => {
                match &feature.location {
                    Some(l) if l.is_bilingual() && l.family == NameFamily::Street => {
                        stats.bilingual_streets += 1
                    }
                    Some(l) if l.is_bilingual() => stats.bilingual_places += 1,
                    Some(_) => {}
                    None => stats.without_location += 1,
                }
                if feature.postcode.is_none() {
                    stats.without_postcode += 1;
                }
                collection.push(feature);
            }
            Err(Skip::InvalidStatus) => stats.skipped_invalid += 1,
            Err(Skip::NoGeometry) => {
                debug!(id = %record.id, "Skipping record without geometry");
                stats.skipped_no_geometry += 1;
            }
        }
    }

    debug!(skipped = stats.skipped_invalid, "Skipped records not in valid state");
    if stats.skipped_no_geometry > 0 {
        warn!(
            skipped = stats.skipped_no_geometry,
            "Skipped valid records without geometry"
        );
    }

    Ok((collection, stats))
}

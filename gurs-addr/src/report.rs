//! Rapport de conversion
//!
//! Collecte les compteurs des différentes phases et les affiche ou les
//! sauvegarde en JSON.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::lookup::{LookupKind, Lookups};
use crate::transform::TransformStats;

/// Rapport complet d'une conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    /// Couche HS lue
    pub input: String,
    /// Fichier GeoJSON écrit
    pub output: String,
    /// Durée totale
    pub duration_secs: f64,

    /// Nombre d'entrées par table de correspondance
    pub lookups: BTreeMap<String, usize>,

    /// Compteurs de la transformation
    pub transform: TransformStats,

    /// Features écrites
    pub features_written: usize,

    /// Codes postaux mêlant rue et lieu-dit
    pub mixed_postcodes: usize,
}

impl ConversionReport {
    pub fn new(input: &Path, output: &Path) -> Self {
        Self {
            input: input.display().to_string(),
            output: output.display().to_string(),
            ..Default::default()
        }
    }

    /// Enregistre la taille des six tables
    pub fn record_lookups(&mut self, lookups: &Lookups) {
        for kind in LookupKind::ALL {
            self.lookups
                .insert(kind.label().to_string(), lookups.get(kind).len());
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Tables chargées sans aucun enregistrement
    pub fn empty_lookups(&self) -> Vec<&str> {
        self.lookups
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CONVERSION REPORT");
        println!("{}", "=".repeat(60));

        println!("\nInput: {}", self.input);
        println!("Output: {}", self.output);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- LOOKUPS ---");
        for (name, count) in &self.lookups {
            println!("  {}: {} entries", name, count);
        }

        let t = &self.transform;
        println!("\n--- ADDRESSES ---");
        println!(
            "Records: {} read, {} not valid, {} without geometry",
            t.records_read, t.skipped_invalid, t.skipped_no_geometry
        );
        println!(
            "Features: {} written, {} bilingual streets, {} bilingual places",
            self.features_written, t.bilingual_streets, t.bilingual_places
        );
        println!(
            "Missing: {} without street or place, {} without postcode",
            t.without_location, t.without_postcode
        );

        let empty = self.empty_lookups();
        if !empty.is_empty() || self.mixed_postcodes > 0 {
            println!("\n--- WARNINGS ---");
            for name in empty {
                println!("  lookup {} is empty", name);
            }
            if self.mixed_postcodes > 0 {
                println!(
                    "  {} postcodes mix street and place addresses",
                    self.mixed_postcodes
                );
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} features from {} records ({} skipped)",
            self.output,
            self.features_written,
            self.transform.records_read,
            self.transform.skipped_invalid + self.transform.skipped_no_geometry
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lookups() {
        let mut lookups = Lookups::default();
        lookups.postal_code = [("1", "1000")].into_iter().collect();

        let mut report = ConversionReport::new(Path::new("in.shp"), Path::new("out.geojson"));
        report.record_lookups(&lookups);

        assert_eq!(report.lookups.len(), 6);
        assert_eq!(report.lookups["postal_code"], 1);
        assert_eq!(report.empty_lookups().len(), 5);
        assert!(!report.empty_lookups().contains(&"postal_code"));
    }

    #[test]
    fn test_summary() {
        let mut report = ConversionReport::new(Path::new("in.shp"), Path::new("out.geojson"));
        report.features_written = 98;
        report.transform.records_read = 100;
        report.transform.skipped_invalid = 2;

        let summary = report.summary();
        assert!(summary.contains("out.geojson"));
        assert!(summary.contains("98 features from 100 records (2 skipped)"));
    }

    #[test]
    fn test_save_to_file() {
        let path = std::env::temp_dir().join("gurs_addr_report_test.json");
        let mut report = ConversionReport::new(Path::new("in.shp"), Path::new("out.geojson"));
        report.features_written = 3;
        report.save_to_file(&path).unwrap();

        let content: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content["features_written"], 3);
        assert_eq!(content["transform"]["records_read"], 0);

        std::fs::remove_file(path).ok();
    }
}

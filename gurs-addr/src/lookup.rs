//! Tables de correspondance MID → nom/code
//!
//! Six tables indépendantes sont chargées en parallèle (une tâche bloquante
//! par table) puis figées: plus aucune écriture après la barrière.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::codepage;
use crate::config::{LookupSource, LookupsConfig};
use crate::source::{RecordSource, Row};

const MAX_SAMPLES: usize = 10;

/// Table immuable MID → valeur décodée
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<String, String>,
}

impl LookupTable {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Lit deux colonnes d'une source et les range dans une table.
///
/// La valeur est décodée puis débarrassée de son padding NUL; une valeur vide
/// n'est pas insérée. Si une clé se répète, la dernière lue gagne.
pub fn load_lookup<S: RecordSource>(
    source: &mut S,
    key_field: &str,
    value_field: &str,
) -> Result<LookupTable> {
    let key_index = source
        .column_index(key_field)
        .with_context(|| format!("Missing key column {}", key_field))?;
    let value_index = source
        .column_index(value_field)
        .with_context(|| format!("Missing value column {}", value_field))?;

    let mut entries = HashMap::new();
    while let Some(row) = source.next_row()? {
        let value = codepage::decode(row.value(value_index).unwrap_or_default());
        let value = value.trim_matches('\0');
        if value.is_empty() {
            continue;
        }

        let key = codepage::decode(row.value(key_index).unwrap_or_default());
        entries.insert(key, value.to_string());
    }

    Ok(LookupTable { entries })
}

/// Ouvre un shapefile et charge une table
pub fn load_lookup_file(path: &Path, key_field: &str, value_field: &str) -> Result<LookupTable> {
    let mut reader = gurs_shp::open(path)
        .with_context(|| format!("Failed to open lookup source {}", path.display()))?;

    load_lookup(&mut reader, key_field, value_field)
        .with_context(|| format!("Failed to read lookup source {}", path.display()))
}

/// Identifiant des six tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    PostalCode,
    CityName,
    StreetName,
    StreetNameAlt,
    SettlementName,
    SettlementNameAlt,
}

impl LookupKind {
    pub const ALL: [LookupKind; 6] = [
        LookupKind::PostalCode,
        LookupKind::CityName,
        LookupKind::StreetName,
        LookupKind::StreetNameAlt,
        LookupKind::SettlementName,
        LookupKind::SettlementNameAlt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LookupKind::PostalCode => "postal_code",
            LookupKind::CityName => "city_name",
            LookupKind::StreetName => "street_name",
            LookupKind::StreetNameAlt => "street_name_alt",
            LookupKind::SettlementName => "settlement_name",
            LookupKind::SettlementNameAlt => "settlement_name_alt",
        }
    }

    fn source(self, config: &LookupsConfig) -> &LookupSource {
        match self {
            LookupKind::PostalCode => &config.postal_code,
            LookupKind::CityName => &config.city_name,
            LookupKind::StreetName => &config.street_name,
            LookupKind::StreetNameAlt => &config.street_name_alt,
            LookupKind::SettlementName => &config.settlement_name,
            LookupKind::SettlementNameAlt => &config.settlement_name_alt,
        }
    }
}

/// Les six tables, chargées une fois puis lues seulement
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub postal_code: LookupTable,
    pub city_name: LookupTable,
    pub street_name: LookupTable,
    pub street_name_alt: LookupTable,
    pub settlement_name: LookupTable,
    pub settlement_name_alt: LookupTable,
}

impl Lookups {
    /// Charge les six tables en parallèle et attend la fin de toutes.
    ///
    /// # Errors
    ///
    /// Une source impossible à ouvrir ou à lire interrompt le chargement.
    pub async fn load(config: &LookupsConfig) -> Result<Self> {
        let tasks = LookupKind::ALL.map(|kind| {
            let source = kind.source(config).clone();
            let handle = tokio::task::spawn_blocking(move || {
                load_lookup_file(&source.path, &source.key, &source.value)
            });
            async move {
                let table = handle
                    .await
                    .with_context(|| format!("Lookup task {} failed", kind.label()))??;
                log_loaded(kind, &table);
                Ok::<_, anyhow::Error>((kind, table))
            }
        });

        let mut lookups = Lookups::default();
        for (kind, table) in try_join_all(tasks).await? {
            *lookups.get_mut(kind) = table;
        }
        Ok(lookups)
    }

    pub fn get(&self, kind: LookupKind) -> &LookupTable {
        match kind {
            LookupKind::PostalCode => &self.postal_code,
            LookupKind::CityName => &self.city_name,
            LookupKind::StreetName => &self.street_name,
            LookupKind::StreetNameAlt => &self.street_name_alt,
            LookupKind::SettlementName => &self.settlement_name,
            LookupKind::SettlementNameAlt => &self.settlement_name_alt,
        }
    }

    fn get_mut(&mut self, kind: LookupKind) -> &mut LookupTable {
        match kind {
            LookupKind::PostalCode => &mut self.postal_code,
            LookupKind::CityName => &mut self.city_name,
            LookupKind::StreetName => &mut self.street_name,
            LookupKind::StreetNameAlt => &mut self.street_name_alt,
            LookupKind::SettlementName => &mut self.settlement_name,
            LookupKind::SettlementNameAlt => &mut self.settlement_name_alt,
        }
    }
}

fn log_loaded(kind: LookupKind, table: &LookupTable) {
    if table.is_empty() {
        warn!(table = kind.label(), "Lookup read NO records");
        return;
    }

    info!(table = kind.label(), records = table.len(), "Lookup loaded");
    let samples: Vec<_> = table.entries.iter().take(MAX_SAMPLES).collect();
    debug!(table = kind.label(), ?samples, "Lookup samples");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn test_empty_value_is_dropped() {
        let mut source = MemorySource::new(&["UL_MID", "UL_UIME"]);
        source.push(&[b"100", b"Main St"]).push(&[b"101", b""]);

        let table = load_lookup(&mut source, "UL_MID", "UL_UIME").unwrap();
        assert!(table.contains_key("100"));
        assert!(!table.contains_key("101"));
        assert_eq!(table.get("100"), Some("Main St"));
    }

    #[test]
    fn test_nul_padding_is_trimmed() {
        let mut source = MemorySource::new(&["UL_MID", "UL_DJ"]);
        source
            .push(&[b"1", b"\0\0\0\0"])
            .push(&[b"2", b"Via Roma\0\0"]);

        let table = load_lookup(&mut source, "UL_MID", "UL_DJ").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("2"), Some("Via Roma"));
    }

    #[test]
    fn test_columns_resolved_by_name() {
        // Ordre des colonnes différent d'un fichier à l'autre
        let mut source = MemorySource::new(&["PT_UIME", "PT_ID", "PT_MID"]);
        source.push(&[b"Ljubljana", b"1000", b"11026886"]);

        let codes = load_lookup(&mut source.clone(), "PT_MID", "PT_ID").unwrap();
        let names = load_lookup(&mut source, "PT_MID", "PT_UIME").unwrap();
        assert_eq!(codes.get("11026886"), Some("1000"));
        assert_eq!(names.get("11026886"), Some("Ljubljana"));
    }

    #[test]
    fn test_value_is_decoded() {
        let mut source = MemorySource::new(&["NA_MID", "NA_UIME"]);
        source.push(&[b"7", b"\x8Akofja Loka"]);

        let table = load_lookup(&mut source, "NA_MID", "NA_UIME").unwrap();
        assert_eq!(table.get("7"), Some("Škofja Loka"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut source = MemorySource::new(&["K", "V"]);
        source.push(&[b"1", b"first"]).push(&[b"1", b"second"]);

        let table = load_lookup(&mut source, "K", "V").unwrap();
        assert_eq!(table.get("1"), Some("second"));
    }

    #[test]
    fn test_missing_column_is_error() {
        let mut source = MemorySource::new(&["K"]);
        assert!(load_lookup(&mut source, "K", "V").is_err());
    }

    #[test]
    fn test_zero_records_is_empty_table() {
        let mut source = MemorySource::new(&["K", "V"]);
        let table = load_lookup(&mut source, "K", "V").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_open_failure_is_error() {
        let result = load_lookup_file(Path::new("nonexistent/UL.shp"), "UL_MID", "UL_UIME");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_iter() {
        let table: LookupTable = [("1", "a"), ("2", "b")].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("2"), Some("b"));
    }
}

//! Configuration du jeu de données (chemins et noms de colonnes)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Valeur de STATUS marquant l'état en vigueur
    #[serde(default = "default_sentinel")]
    pub validity_sentinel: String,

    /// Colonnes de la couche des numéros de maison (HS)
    pub address: AddressFields,

    /// Les six tables de correspondance
    pub lookups: LookupsConfig,
}

/// Noms des colonnes de l'enregistrement d'adresse
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddressFields {
    pub unit: String,
    pub id: String,
    pub label: String,
    pub street: String,
    pub settlement: String,
    pub municipality: String,
    pub postal_area: String,
    pub spatial_area: String,
    pub valid_from: String,
    pub entered_on: String,
    pub status: String,
}

/// Source d'une table de correspondance: fichier + colonnes clé/valeur
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupSource {
    pub path: PathBuf,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupsConfig {
    pub postal_code: LookupSource,
    pub city_name: LookupSource,
    pub street_name: LookupSource,
    pub street_name_alt: LookupSource,
    pub settlement_name: LookupSource,
    pub settlement_name_alt: LookupSource,
}

fn default_sentinel() -> String {
    "V".to_string()
}

impl LookupsConfig {
    fn sources_mut(&mut self) -> [&mut LookupSource; 6] {
        [
            &mut self.postal_code,
            &mut self.city_name,
            &mut self.street_name,
            &mut self.street_name_alt,
            &mut self.settlement_name,
            &mut self.settlement_name_alt,
        ]
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "rpe" => Self::load_embedded(include_str!("presets/rpe.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: rpe", preset),
        }
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        match name_or_path {
            "rpe" => Self::from_preset(name_or_path),
            _ => Self::load(Path::new(name_or_path)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Préfixe les chemins relatifs des tables par `root`
    pub fn with_data_root(mut self, root: &Path) -> Self {
        for source in self.lookups.sources_mut() {
            if source.path.is_relative() {
                source.path = root.join(&source.path);
            }
        }
        self
    }
}

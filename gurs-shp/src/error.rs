//! Types d'erreurs pour le crate gurs-shp

use thiserror::Error;

/// Erreurs pouvant survenir lors de la lecture d'un shapefile
#[derive(Debug, Error)]
pub enum ShapefileError {
    /// Erreur d'I/O lors de l'ouverture ou de la lecture
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// En-tête invalide (.shp ou .dbf)
    #[error("Invalid header in {file}: {reason}")]
    InvalidHeader { file: String, reason: String },

    /// Type de géométrie non supporté
    #[error("Unsupported shape type {shape_type} in record {record}")]
    UnsupportedShape { shape_type: i32, record: u32 },

    /// Fichier tronqué au milieu d'un enregistrement
    #[error("Truncated {file}: {reason}")]
    Truncated { file: String, reason: String },

    /// Colonne absente de la table attributaire
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

impl ShapefileError {
    /// Crée une erreur d'en-tête avec contexte
    pub fn invalid_header(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de fichier tronqué
    pub fn truncated(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Truncated {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

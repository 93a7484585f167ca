//! # gurs-shp
//!
//! Lecteur ESRI Shapefile (.shp) + table dBASE III (.dbf), tel que publié par
//! la GURS (registre des adresses slovène, RPE).
//!
//! ## Features
//!
//! - Curseur séquentiel (.shp et .dbf avancent ensemble)
//! - Accès aux colonnes par nom exact, valeurs brutes (sans décodage)
//! - Emprise de chaque géométrie sous forme de `geo::Rect`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gurs_shp::Reader;
//! use std::path::Path;
//!
//! let mut reader = Reader::open(Path::new("SI.GURS.RPE.PUB.UL.shp"))?;
//! while let Some(record) = reader.next_record()? {
//!     let mid = record.attribute("UL_MID");
//!     let corner = record.shape.bbox.map(|b| b.min());
//! }
//! ```
//!
//! Le décodage des textes (Windows-1250 pour la GURS) est laissé à l'appelant.

pub mod error;
pub mod parser;
pub mod reader;
pub mod types;

pub use error::ShapefileError;
pub use reader::Reader;
pub use types::{Field, Record, Shape, ShapeType};

use std::path::Path;

/// Ouvre un shapefile et sa table attributaire.
///
/// # Errors
///
/// Retourne `ShapefileError` si l'un des deux fichiers est absent ou si un
/// en-tête est invalide.
pub fn open(path: &Path) -> Result<Reader, ShapefileError> {
    Reader::open(path)
}

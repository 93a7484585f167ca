//! # gurs-addr
//!
//! Conversion du registre des numéros de maison de la GURS (RPE) en GeoJSON
//! avec des tags d'adresse OpenStreetMap.
//!
//! ## Features
//!
//! - Six tables de correspondance chargées en parallèle (codes postaux,
//!   localités, rues, lieux-dits, et leurs noms bilingues)
//! - Noms bilingues slovène/italien ou slovène/hongrois selon la longitude
//! - Tri déterministe pour des fichiers reproductibles et compressibles
//!
//! ## Usage CLI
//!
//! ```bash
//! gurs-addr --in data/temp/HS-etrs89/SI.GURS.RPE.PUB.HS-etrs89.shp \
//!     --out data/slovenia-housenumbers.geojson
//! ```

pub mod address;
pub mod codepage;
pub mod config;
pub mod export;
pub mod feature;
pub mod housenumber;
pub mod lookup;
pub mod pipeline;
pub mod report;
pub mod sort;
pub mod source;
pub mod transform;

pub use config::Config;
pub use feature::{AddressFeature, FeatureCollection};
pub use lookup::{LookupTable, Lookups};
pub use report::ConversionReport;

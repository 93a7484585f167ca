//! Curseur combiné .shp + .dbf

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use geo::Rect;
use tracing::debug;

use crate::parser::dbf::{self, DbfHeader, RawRecord};
use crate::parser::shp::{self, ShpHeader};
use crate::types::{Field, Record, ShapeType};
use crate::ShapefileError;

/// Lecteur séquentiel d'un shapefile et de sa table attributaire
pub struct Reader<R: Read = BufReader<File>> {
    shp: R,
    dbf: R,
    shp_header: ShpHeader,
    dbf_header: DbfHeader,
    fields: Arc<[Field]>,
    read: u32,
}

impl Reader<BufReader<File>> {
    /// Ouvre `<base>.shp` et `<base>.dbf`.
    ///
    /// `path` peut désigner l'un ou l'autre des deux fichiers.
    pub fn open(path: &Path) -> Result<Self, ShapefileError> {
        let (shp_path, dbf_path) = sibling_paths(path);
        debug!(shp = %shp_path.display(), dbf = %dbf_path.display(), "Opening shapefile");

        let shp = BufReader::new(File::open(&shp_path)?);
        let dbf = BufReader::new(File::open(&dbf_path)?);
        Self::from_readers(shp, dbf)
    }
}

impl<R: Read> Reader<R> {
    /// Construit un lecteur depuis deux flux déjà ouverts
    pub fn from_readers(mut shp: R, mut dbf: R) -> Result<Self, ShapefileError> {
        let shp_header = shp::read_header(&mut shp)?;
        let dbf_header = dbf::read_header(&mut dbf)?;
        let fields: Arc<[Field]> = dbf_header.fields.clone().into();

        Ok(Self {
            shp,
            dbf,
            shp_header,
            dbf_header,
            fields,
            read: 0,
        })
    }

    /// Colonnes déclarées, dans l'ordre du fichier
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Position d'une colonne par nom exact
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Comme `field_index`, mais une colonne absente est une erreur
    pub fn require_field(&self, name: &str) -> Result<usize, ShapefileError> {
        self.field_index(name)
            .ok_or_else(|| ShapefileError::MissingColumn {
                file: "dbf".to_string(),
                column: name.to_string(),
            })
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shp_header.shape_type
    }

    /// Emprise globale déclarée dans l'en-tête .shp
    pub fn bbox(&self) -> Rect<f64> {
        self.shp_header.bbox
    }

    /// Nombre d'enregistrements déclaré par la table
    pub fn record_count(&self) -> u32 {
        self.dbf_header.record_count
    }

    /// Avance les deux curseurs et retourne l'enregistrement actif suivant
    pub fn next_record(&mut self) -> Result<Option<Record>, ShapefileError> {
        loop {
            if self.read >= self.dbf_header.record_count {
                return Ok(None);
            }

            let Some(raw) = dbf::read_record(&mut self.dbf, &self.dbf_header)? else {
                return Ok(None);
            };
            let Some((number, shape)) = shp::read_record(&mut self.shp)? else {
                return Err(ShapefileError::truncated(
                    "shp",
                    format!("geometry missing for attribute record {}", self.read + 1),
                ));
            };
            self.read += 1;

            match raw {
                RawRecord::Active(raw) => {
                    return Ok(Some(Record::new(number, shape, Arc::clone(&self.fields), raw)))
                }
                RawRecord::Deleted => continue,
            }
        }
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Result<Record, ShapefileError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Dérive les chemins .shp et .dbf depuis n'importe quel fichier du jeu
fn sibling_paths(path: &Path) -> (PathBuf, PathBuf) {
    (path.with_extension("shp"), path.with_extension("dbf"))
}

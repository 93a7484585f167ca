//! Types de données pour le crate gurs-shp

use std::sync::Arc;

use geo::Rect;

/// Descripteur d'une colonne dBASE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Nom déclaré de la colonne (ex: "HS_MID")
    pub name: String,

    /// Type dBASE (`C`, `N`, `D`, `L`, `F`)
    pub field_type: char,

    /// Largeur fixe en octets
    pub length: usize,

    /// Nombre de décimales (colonnes numériques)
    pub decimals: u8,

    /// Position dans l'enregistrement brut (après l'octet de suppression)
    pub offset: usize,
}

/// Types de géométrie shapefile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

impl ShapeType {
    /// Mappe le code numérique ESRI vers le type
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Null,
            1 => Self::Point,
            3 => Self::PolyLine,
            5 => Self::Polygon,
            8 => Self::MultiPoint,
            11 => Self::PointZ,
            13 => Self::PolyLineZ,
            15 => Self::PolygonZ,
            18 => Self::MultiPointZ,
            21 => Self::PointM,
            23 => Self::PolyLineM,
            25 => Self::PolygonM,
            28 => Self::MultiPointM,
            31 => Self::MultiPatch,
            _ => return None,
        })
    }

    /// Vrai pour les types dont le contenu est un point unique
    pub fn is_point(self) -> bool {
        matches!(self, Self::Point | Self::PointZ | Self::PointM)
    }
}

/// Géométrie d'un enregistrement, réduite à son emprise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub shape_type: ShapeType,

    /// Emprise (dégénérée pour un point, absente pour Null)
    pub bbox: Option<Rect<f64>>,
}

/// Un enregistrement: géométrie + attributs bruts
#[derive(Debug, Clone)]
pub struct Record {
    /// Numéro d'enregistrement (1-based, depuis le .shp)
    pub number: u32,

    pub shape: Shape,

    fields: Arc<[Field]>,
    raw: Vec<u8>,
}

impl Record {
    pub(crate) fn new(number: u32, shape: Shape, fields: Arc<[Field]>, raw: Vec<u8>) -> Self {
        Self {
            number,
            shape,
            fields,
            raw,
        }
    }

    /// Valeur brute d'une colonne par nom exact, sans le padding d'espaces
    pub fn attribute(&self, name: &str) -> Option<&[u8]> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        self.attribute_at(index)
    }

    /// Valeur brute d'une colonne par position
    pub fn attribute_at(&self, index: usize) -> Option<&[u8]> {
        let field = self.fields.get(index)?;
        let end = (field.offset + field.length).min(self.raw.len());
        let start = field.offset.min(end);
        Some(trim_spaces(&self.raw[start..end]))
    }
}

fn trim_spaces(mut value: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = value {
        value = rest;
    }
    while let [rest @ .., b' '] = value {
        value = rest;
    }
    value
}

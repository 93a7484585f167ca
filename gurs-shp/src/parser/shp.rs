//! Parser pour les fichiers .shp (géométries)

use std::io::Read;

use geo::{coord, Rect};

use super::{be_i32, fill_or_eof, le_f64, le_i32};
use crate::types::{Shape, ShapeType};
use crate::ShapefileError;

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const HEADER_LEN: usize = 100;

/// En-tête principal d'un fichier .shp
#[derive(Debug, Clone, Copy)]
pub struct ShpHeader {
    pub shape_type: ShapeType,

    /// Emprise globale du fichier
    pub bbox: Rect<f64>,
}

/// Lit et valide l'en-tête de 100 octets
pub fn read_header<R: Read>(reader: &mut R) -> Result<ShpHeader, ShapefileError> {
    let mut buf = [0u8; HEADER_LEN];
    if !fill_or_eof(reader, &mut buf)? {
        return Err(ShapefileError::invalid_header("shp", "empty file"));
    }

    let file_code = be_i32(&buf, 0);
    if file_code != FILE_CODE {
        return Err(ShapefileError::invalid_header(
            "shp",
            format!("bad file code {}", file_code),
        ));
    }

    let version = le_i32(&buf, 28);
    if version != VERSION {
        return Err(ShapefileError::invalid_header(
            "shp",
            format!("unsupported version {}", version),
        ));
    }

    let code = le_i32(&buf, 32);
    let shape_type = ShapeType::from_code(code).ok_or_else(|| {
        ShapefileError::invalid_header("shp", format!("unknown shape type {}", code))
    })?;

    let bbox = Rect::new(
        coord! { x: le_f64(&buf, 36), y: le_f64(&buf, 44) },
        coord! { x: le_f64(&buf, 52), y: le_f64(&buf, 60) },
    );

    Ok(ShpHeader { shape_type, bbox })
}

/// Lit l'enregistrement suivant.
///
/// Retourne `None` en fin de fichier.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<(u32, Shape)>, ShapefileError> {
    let mut header = [0u8; 8];
    if !fill_or_eof(reader, &mut header)? {
        return Ok(None);
    }

    let number = be_i32(&header, 0) as u32;
    // Longueur exprimée en mots de 16 bits
    let content_len = be_i32(&header, 4).max(0) as usize * 2;

    let mut content = vec![0u8; content_len];
    if content_len > 0 && !fill_or_eof(reader, &mut content)? {
        return Err(ShapefileError::truncated(
            "shp",
            format!("record {} has no content", number),
        ));
    }

    let shape = parse_shape(number, &content)?;
    Ok(Some((number, shape)))
}

/// Réduit le contenu d'un enregistrement à son type et son emprise
fn parse_shape(number: u32, content: &[u8]) -> Result<Shape, ShapefileError> {
    if content.len() < 4 {
        return Err(ShapefileError::truncated(
            "shp",
            format!("record {} shorter than its shape type", number),
        ));
    }

    let code = le_i32(content, 0);
    let shape_type = ShapeType::from_code(code).ok_or(ShapefileError::UnsupportedShape {
        shape_type: code,
        record: number,
    })?;

    if shape_type == ShapeType::Null {
        return Ok(Shape {
            shape_type,
            bbox: None,
        });
    }

    let bbox = if shape_type.is_point() {
        if content.len() < 20 {
            return Err(ShapefileError::truncated(
                "shp",
                format!("point record {} too short", number),
            ));
        }
        let c = coord! { x: le_f64(content, 4), y: le_f64(content, 12) };
        Rect::new(c, c)
    } else {
        // Xmin, Ymin, Xmax, Ymax juste après le type
        if content.len() < 36 {
            return Err(ShapefileError::truncated(
                "shp",
                format!("record {} too short for its bounding box", number),
            ));
        }
        Rect::new(
            coord! { x: le_f64(content, 4), y: le_f64(content, 12) },
            coord! { x: le_f64(content, 20), y: le_f64(content, 28) },
        )
    };

    Ok(Shape {
        shape_type,
        bbox: Some(bbox),
    })
}

//! Parser pour les tables attributaires dBASE III (.dbf)

use std::io::Read;

use memchr::memchr;

use super::fill_or_eof;
use crate::types::Field;
use crate::ShapefileError;

const HEADER_LEN: usize = 32;
const DESCRIPTOR_LEN: usize = 32;
const HEADER_TERMINATOR: u8 = 0x0D;
const EOF_MARKER: u8 = 0x1A;
const DELETED: u8 = b'*';

/// En-tête d'une table dBASE
#[derive(Debug, Clone)]
pub struct DbfHeader {
    /// Nombre d'enregistrements déclaré
    pub record_count: u32,

    /// Longueur d'un enregistrement (octet de suppression inclus)
    pub record_len: usize,

    /// Colonnes dans l'ordre déclaré
    pub fields: Vec<Field>,
}

/// Lit l'en-tête et les descripteurs de colonnes
pub fn read_header<R: Read>(reader: &mut R) -> Result<DbfHeader, ShapefileError> {
    let mut buf = [0u8; HEADER_LEN];
    if !fill_or_eof(reader, &mut buf)? {
        return Err(ShapefileError::invalid_header("dbf", "empty file"));
    }

    let record_count = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
    let record_len = u16::from_le_bytes([buf[10], buf[11]]) as usize;

    if header_len < HEADER_LEN + 1 {
        return Err(ShapefileError::invalid_header(
            "dbf",
            format!("header length {} too small", header_len),
        ));
    }

    let mut descriptors = vec![0u8; header_len - HEADER_LEN];
    if !fill_or_eof(reader, &mut descriptors)? {
        return Err(ShapefileError::truncated("dbf", "missing field descriptors"));
    }

    let mut fields = Vec::new();
    let mut offset = 1; // octet de suppression
    for chunk in descriptors.chunks(DESCRIPTOR_LEN) {
        if chunk[0] == HEADER_TERMINATOR || chunk.len() < DESCRIPTOR_LEN {
            break;
        }

        // Nom sur 11 octets, complété par des NUL
        let name_bytes = &chunk[..11];
        let name_len = memchr(0, name_bytes).unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..name_len])
            .trim()
            .to_string();

        let length = chunk[16] as usize;
        fields.push(Field {
            name,
            field_type: chunk[11] as char,
            length,
            decimals: chunk[17],
            offset,
        });
        offset += length;
    }

    if offset > record_len {
        return Err(ShapefileError::invalid_header(
            "dbf",
            format!(
                "fields span {} bytes but records are {} bytes long",
                offset, record_len
            ),
        ));
    }

    Ok(DbfHeader {
        record_count,
        record_len,
        fields,
    })
}

/// Enregistrement brut lu depuis la table
#[derive(Debug)]
pub enum RawRecord {
    /// Enregistrement actif (octets bruts, octet de suppression inclus)
    Active(Vec<u8>),
    /// Enregistrement marqué supprimé
    Deleted,
}

/// Lit l'enregistrement suivant.
///
/// Retourne `None` en fin de fichier ou sur le marqueur `0x1A`.
pub fn read_record<R: Read>(
    reader: &mut R,
    header: &DbfHeader,
) -> Result<Option<RawRecord>, ShapefileError> {
    let mut first = [0u8; 1];
    if !fill_or_eof(reader, &mut first)? || first[0] == EOF_MARKER {
        return Ok(None);
    }

    let mut raw = vec![0u8; header.record_len];
    raw[0] = first[0];
    if header.record_len > 1 && !fill_or_eof(reader, &mut raw[1..])? {
        return Err(ShapefileError::truncated("dbf", "record cut after its flag"));
    }

    if first[0] == DELETED {
        return Ok(Some(RawRecord::Deleted));
    }
    Ok(Some(RawRecord::Active(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn descriptor(name: &str, field_type: u8, length: u8) -> Vec<u8> {
        let mut d = vec![0u8; DESCRIPTOR_LEN];
        d[..name.len()].copy_from_slice(name.as_bytes());
        d[11] = field_type;
        d[16] = length;
        d
    }

    fn table(rows: &[&[u8]]) -> Vec<u8> {
        let descriptors = [descriptor("UL_MID", b'N', 8), descriptor("UL_UIME", b'C', 10)];
        let header_len = HEADER_LEN + descriptors.len() * DESCRIPTOR_LEN + 1;
        let record_len = 1 + 8 + 10;

        let mut buf = vec![0u8; HEADER_LEN];
        buf[0] = 0x03;
        buf[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
        buf[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
        buf[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());
        for d in &descriptors {
            buf.extend_from_slice(d);
        }
        buf.push(HEADER_TERMINATOR);
        for row in rows {
            buf.extend_from_slice(row);
        }
        buf.push(EOF_MARKER);
        buf
    }

    #[test]
    fn test_read_header_fields() {
        let data = table(&[]);
        let header = read_header(&mut Cursor::new(data)).unwrap();

        assert_eq!(header.record_count, 0);
        assert_eq!(header.record_len, 19);
        assert_eq!(header.fields.len(), 2);
        assert_eq!(header.fields[0].name, "UL_MID");
        assert_eq!(header.fields[0].field_type, 'N');
        assert_eq!(header.fields[0].offset, 1);
        assert_eq!(header.fields[1].name, "UL_UIME");
        assert_eq!(header.fields[1].offset, 9);
    }

    #[test]
    fn test_read_records_until_eof_marker() {
        let data = table(&[b"      100Main St   ", b"*     101Old St    "]);
        let mut cursor = Cursor::new(data);
        let header = read_header(&mut cursor).unwrap();

        match read_record(&mut cursor, &header).unwrap() {
            Some(RawRecord::Active(raw)) => assert_eq!(&raw[1..9], b"     100"),
            other => panic!("expected active record, got {:?}", other),
        }
        assert!(matches!(
            read_record(&mut cursor, &header).unwrap(),
            Some(RawRecord::Deleted)
        ));
        assert!(read_record(&mut cursor, &header).unwrap().is_none());
    }
}

//! Parsers bas niveau des fichiers .shp et .dbf

pub mod dbf;
pub mod shp;

use std::io::{ErrorKind, Read};

/// Remplit `buf` depuis `reader`.
///
/// Retourne `Ok(false)` si le flux était déjà à sa fin (aucun octet lu),
/// `Ok(true)` si le buffer est complet. Une lecture partielle est une
/// `UnexpectedEof`.
pub(crate) fn fill_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

#[inline]
pub(crate) fn le_f64(buf: &[u8], at: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[at..at + 8]);
    f64::from_le_bytes(bytes)
}

#[inline]
pub(crate) fn le_i32(buf: &[u8], at: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    i32::from_le_bytes(bytes)
}

#[inline]
pub(crate) fn be_i32(buf: &[u8], at: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    i32::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_fill_or_eof() {
        let mut buf = [0u8; 4];

        let mut empty = Cursor::new(Vec::<u8>::new());
        assert!(!fill_or_eof(&mut empty, &mut buf).unwrap());

        let mut full = Cursor::new(vec![1, 2, 3, 4]);
        assert!(fill_or_eof(&mut full, &mut buf).unwrap());
        assert_eq!(buf, [1, 2, 3, 4]);

        let mut partial = Cursor::new(vec![1, 2]);
        let err = fill_or_eof(&mut partial, &mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_byte_order_helpers() {
        let buf = [0x00, 0x00, 0x27, 0x0A, 0xE8, 0x03, 0x00, 0x00];
        assert_eq!(be_i32(&buf, 0), 9994);
        assert_eq!(le_i32(&buf, 4), 1000);
        assert_eq!(le_f64(&14.5f64.to_le_bytes(), 0), 14.5);
    }
}

//! Abstraction d'une source tabulaire (colonnes nommées + géométrie)
//!
//! Implémentée pour `gurs_shp::Reader` et pour une source en mémoire utilisée
//! par les tests.

use std::collections::VecDeque;
use std::io::Read;

use anyhow::Result;
use geo::Rect;

/// Un enregistrement lu depuis une source
pub trait Row {
    /// Valeur brute de la colonne `column` (position résolue par la source)
    fn value(&self, column: usize) -> Option<&[u8]>;

    /// Emprise de la géométrie associée
    fn bbox(&self) -> Option<Rect<f64>>;
}

/// Curseur séquentiel sur une source tabulaire
pub trait RecordSource {
    type Row: Row;

    /// Position d'une colonne par nom exact
    fn column_index(&self, name: &str) -> Option<usize>;

    /// Enregistrement suivant, `None` en fin de source
    fn next_row(&mut self) -> Result<Option<Self::Row>>;
}

impl Row for gurs_shp::Record {
    fn value(&self, column: usize) -> Option<&[u8]> {
        self.attribute_at(column)
    }

    fn bbox(&self) -> Option<Rect<f64>> {
        self.shape.bbox
    }
}

impl<R: Read> RecordSource for gurs_shp::Reader<R> {
    type Row = gurs_shp::Record;

    fn column_index(&self, name: &str) -> Option<usize> {
        self.field_index(name)
    }

    fn next_row(&mut self) -> Result<Option<Self::Row>> {
        Ok(self.next_record()?)
    }
}

/// Ligne d'une `MemorySource`
#[derive(Debug, Clone)]
pub struct MemoryRow {
    pub values: Vec<Vec<u8>>,
    pub bbox: Option<Rect<f64>>,
}

impl Row for MemoryRow {
    fn value(&self, column: usize) -> Option<&[u8]> {
        self.values.get(column).map(Vec::as_slice)
    }

    fn bbox(&self) -> Option<Rect<f64>> {
        self.bbox
    }
}

/// Source en mémoire: colonnes déclarées + lignes dans l'ordre de lecture
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    columns: Vec<String>,
    rows: VecDeque<MemoryRow>,
}

impl MemorySource {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: VecDeque::new(),
        }
    }

    /// Ajoute une ligne sans géométrie
    pub fn push(&mut self, values: &[&[u8]]) -> &mut Self {
        self.push_with_bbox(values, None)
    }

    pub fn push_with_bbox(&mut self, values: &[&[u8]], bbox: Option<Rect<f64>>) -> &mut Self {
        self.rows.push_back(MemoryRow {
            values: values.iter().map(|v| v.to_vec()).collect(),
            bbox,
        });
        self
    }
}

impl RecordSource for MemorySource {
    type Row = MemoryRow;

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn next_row(&mut self) -> Result<Option<Self::Row>> {
        Ok(self.rows.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_order() {
        let mut source = MemorySource::new(&["K", "V"]);
        source.push(&[b"1", b"one"]).push(&[b"2", b"two"]);

        assert_eq!(source.column_index("V"), Some(1));
        assert_eq!(source.column_index("X"), None);

        let first = source.next_row().unwrap().unwrap();
        assert_eq!(first.value(1), Some(&b"one"[..]));
        let second = source.next_row().unwrap().unwrap();
        assert_eq!(second.value(0), Some(&b"2"[..]));
        assert!(source.next_row().unwrap().is_none());
    }
}

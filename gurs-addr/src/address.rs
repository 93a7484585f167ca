//! Enregistrement de la couche HS (numéros de maison)

use anyhow::{Context, Result};
use geo::Coord;

use crate::codepage;
use crate::config::AddressFields;
use crate::source::{RecordSource, Row};

/// Une ligne de la couche HS, textes décodés
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressRecord {
    /// ENOTA: code de l'unité
    pub unit: String,
    /// HS_MID: identifiant du numéro de maison
    pub id: String,
    /// LABELA: numéro + suffixe ("12a")
    pub label: String,
    pub street_mid: String,
    pub settlement_mid: String,
    /// OB_MID (non utilisé)
    pub municipality_mid: String,
    pub postal_mid: String,
    /// PO_MID (non utilisé)
    pub spatial_mid: String,
    /// D_OD au format YYYYMMDD
    pub valid_from: String,
    /// DV_OD (non utilisé)
    pub entered_on: String,
    /// STATUS ("V" pour l'état en vigueur)
    pub status: String,
    /// Coin minimum de l'emprise (x = longitude, y = latitude)
    pub corner: Option<Coord<f64>>,
}

/// Positions des colonnes, résolues une fois avant la lecture
#[derive(Debug, Clone, Copy)]
pub struct AddressColumns {
    unit: Option<usize>,
    id: usize,
    label: usize,
    street: usize,
    settlement: usize,
    municipality: Option<usize>,
    postal_area: usize,
    spatial_area: Option<usize>,
    valid_from: usize,
    entered_on: Option<usize>,
    status: usize,
}

impl AddressColumns {
    /// Les colonnes non utilisées par la conversion sont optionnelles
    pub fn resolve<S: RecordSource>(source: &S, fields: &AddressFields) -> Result<Self> {
        let required = |name: &str| {
            source
                .column_index(name)
                .with_context(|| format!("Missing address column {}", name))
        };

        Ok(Self {
            unit: source.column_index(&fields.unit),
            id: required(&fields.id)?,
            label: required(&fields.label)?,
            street: required(&fields.street)?,
            settlement: required(&fields.settlement)?,
            municipality: source.column_index(&fields.municipality),
            postal_area: required(&fields.postal_area)?,
            spatial_area: source.column_index(&fields.spatial_area),
            valid_from: required(&fields.valid_from)?,
            entered_on: source.column_index(&fields.entered_on),
            status: required(&fields.status)?,
        })
    }
}

impl AddressRecord {
    /// Décode une ligne brute
    pub fn from_row<R: Row>(row: &R, columns: &AddressColumns) -> Self {
        let text = |index: usize| codepage::decode(row.value(index).unwrap_or_default());
        let optional = |index: Option<usize>| index.map(text).unwrap_or_default();

        Self {
            unit: optional(columns.unit),
            id: text(columns.id),
            label: text(columns.label),
            street_mid: text(columns.street),
            settlement_mid: text(columns.settlement),
            municipality_mid: optional(columns.municipality),
            postal_mid: text(columns.postal_area),
            spatial_mid: optional(columns.spatial_area),
            valid_from: text(columns.valid_from),
            entered_on: optional(columns.entered_on),
            status: text(columns.status),
            corner: row.bbox().map(|bbox| bbox.min()),
        }
    }
}

/// Itère les enregistrements d'une source dans l'ordre de lecture
pub fn read_records<'a, S: RecordSource>(
    source: &'a mut S,
    fields: &AddressFields,
) -> Result<impl Iterator<Item = Result<AddressRecord>> + 'a> {
    let columns = AddressColumns::resolve(source, fields)?;
    Ok(std::iter::from_fn(move || {
        source
            .next_row()
            .map(|row| row.map(|row| AddressRecord::from_row(&row, &columns)))
            .transpose()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::MemorySource;
    use geo::{coord, Rect};

    #[test]
    fn test_read_records() {
        let config = Config::from_preset("rpe").unwrap();
        let mut source = MemorySource::new(&[
            "ENOTA", "HS_MID", "HS", "HD", "LABELA", "UL_MID", "NA_MID", "OB_MID", "PT_MID",
            "PO_MID", "D_OD", "DV_OD", "STATUS",
        ]);
        let point = coord! { x: 14.5058, y: 46.0569 };
        source.push_with_bbox(
            &[
                b"HS", b"11", b"12", b"A", b"12A", b"100", b"200", b"300", b"400", b"500",
                b"20190501", b"20190502", b"V",
            ],
            Some(Rect::new(point, point)),
        );

        let records: Vec<AddressRecord> = read_records(&mut source, &config.address)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, "11");
        assert_eq!(r.label, "12A");
        assert_eq!(r.street_mid, "100");
        assert_eq!(r.postal_mid, "400");
        assert_eq!(r.valid_from, "20190501");
        assert_eq!(r.status, "V");
        assert_eq!(r.corner, Some(point));
    }

    #[test]
    fn test_missing_required_column() {
        let config = Config::from_preset("rpe").unwrap();
        let mut source = MemorySource::new(&["HS_MID", "LABELA"]);
        assert!(read_records(&mut source, &config.address).is_err());
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let config = Config::from_preset("rpe").unwrap();
        let mut source = MemorySource::new(&[
            "HS_MID", "LABELA", "UL_MID", "NA_MID", "PT_MID", "D_OD", "STATUS",
        ]);
        source.push(&[b"1", b"3", b"0", b"9", b"4", b"20200101", b"V"]);

        let record = read_records(&mut source, &config.address)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(record.unit, "");
        assert_eq!(record.municipality_mid, "");
        assert_eq!(record.corner, None);
    }
}

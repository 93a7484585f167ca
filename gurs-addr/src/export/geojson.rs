//! Export vers GeoJSON (pretty-print, indentation de 2 espaces)
//!
//! Le modèle est celui du crate `geojson`, mais l'écriture suit la forme des
//! fichiers déjà publiés: `type` en tête de chaque objet, propriétés triées,
//! coordonnées entières sans `.0`, et `<`, `>`, `&` échappés.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::feature::AddressFeature;

/// Convertit une feature d'adresse.
///
/// Les coordonnées sont `[lat, lon]`, latitude d'abord, pour rester
/// compatible avec les fichiers déjà publiés.
pub fn to_feature(address: &AddressFeature) -> Feature {
    let mut properties = JsonObject::new();
    for (key, value) in address.tags() {
        properties.insert(key, JsonValue::String(value.to_string()));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![address.lat, address.lon]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn to_feature_collection(features: &[AddressFeature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Vue d'un objet `geojson` sérialisée membre par membre, `type` d'abord
struct Ordered<'a, T>(&'a T);

impl Serialize for Ordered<'_, FeatureCollection> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FeatureCollection", 2)?;
        state.serialize_field("type", "FeatureCollection")?;
        let features: Vec<_> = self.0.features.iter().map(Ordered).collect();
        state.serialize_field("features", &features)?;
        state.end()
    }
}

impl Serialize for Ordered<'_, Feature> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Feature", 3)?;
        state.serialize_field("type", "Feature")?;
        state.serialize_field("geometry", &self.0.geometry.as_ref().map(Ordered))?;
        let properties: Option<BTreeMap<&String, &JsonValue>> =
            self.0.properties.as_ref().map(|p| p.iter().collect());
        state.serialize_field("properties", &properties)?;
        state.end()
    }
}

impl Serialize for Ordered<'_, Geometry> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0.value {
            Value::Point(coordinates) => {
                let mut state = serializer.serialize_struct("Geometry", 2)?;
                state.serialize_field("type", "Point")?;
                state.serialize_field("coordinates", coordinates)?;
                state.end()
            }
            _ => self.0.serialize(serializer),
        }
    }
}

/// Pretty-printer des fichiers publiés
struct PublishedFormatter {
    pretty: PrettyFormatter<'static>,
}

impl PublishedFormatter {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for PublishedFormatter {
    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        let magnitude = value.abs();
        if value.is_finite() && (magnitude == 0.0 || (1e-6..1e21).contains(&magnitude)) {
            // Notation décimale courte, 46 et non 46.0
            write!(writer, "{}", value)
        } else {
            self.pretty.write_f64(writer, value)
        }
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

/// Sérialise la collection dans `writer`
pub fn write_geojson<W: Write>(writer: W, features: &[AddressFeature]) -> Result<()> {
    let collection = to_feature_collection(features);
    let mut serializer = serde_json::Serializer::with_formatter(writer, PublishedFormatter::new());
    Ordered(&collection)
        .serialize(&mut serializer)
        .context("Failed to serialize GeoJSON")
}

/// Écrit la collection dans `output_path`
pub fn export_to_geojson(features: &[AddressFeature], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_geojson(&mut writer, features)?;
    writer
        .flush()
        .context(format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}

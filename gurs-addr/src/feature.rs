//! Features d'adresse et leurs tags OpenStreetMap

use std::collections::BTreeMap;

use crate::sort;

pub const TAG_HOUSENUMBER: &str = "addr:housenumber";
pub const TAG_CITY: &str = "addr:city";
pub const TAG_POSTCODE: &str = "addr:postcode";
pub const TAG_STREET: &str = "addr:street";
pub const TAG_PLACE: &str = "addr:place";
pub const TAG_SOURCE_DATE: &str = "source:addr:date";
pub const TAG_SOURCE: &str = "source:addr";
pub const TAG_REF: &str = "ref:GURS:HS_MID";

pub const SOURCE_VALUE: &str = "GURS";
pub const BILINGUAL_SEPARATOR: &str = " / ";

/// À l'est de ce méridien, les noms bilingues sont hongrois; à l'ouest, italiens
pub const ITALIAN_HUNGARIAN_SPLIT_LONGITUDE: f64 = 14.5;

/// Langue d'une variante de nom
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Slovenian,
    Italian,
    Hungarian,
}

impl Language {
    pub fn suffix(self) -> &'static str {
        match self {
            Language::Slovenian => "sl",
            Language::Italian => "it",
            Language::Hungarian => "hu",
        }
    }

    /// Langue minoritaire déduite de la longitude (le jeu ne la porte pas)
    pub fn minority_at(longitude: f64) -> Self {
        if longitude > ITALIAN_HUNGARIAN_SPLIT_LONGITUDE {
            Language::Hungarian
        } else {
            Language::Italian
        }
    }
}

/// Famille du tag de localisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFamily {
    Street,
    Place,
}

impl NameFamily {
    pub fn tag(self) -> &'static str {
        match self {
            NameFamily::Street => TAG_STREET,
            NameFamily::Place => TAG_PLACE,
        }
    }
}

/// Rue ou lieu-dit d'une adresse, avec ses variantes linguistiques
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub family: NameFamily,
    pub name: String,
    pub variants: BTreeMap<Language, String>,
}

impl Location {
    pub fn plain(family: NameFamily, name: impl Into<String>) -> Self {
        Self {
            family,
            name: name.into(),
            variants: BTreeMap::new(),
        }
    }

    /// Nom bilingue: "slovène / minoritaire" + une variante par langue
    pub fn bilingual(family: NameFamily, primary: &str, alternate: &str, minority: Language) -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(Language::Slovenian, primary.to_string());
        variants.insert(minority, alternate.to_string());

        Self {
            family,
            name: format!("{}{}{}", primary, BILINGUAL_SEPARATOR, alternate),
            variants,
        }
    }

    pub fn is_bilingual(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Tags de la famille: `addr:street`, `addr:street:sl`, ...
    pub fn tags(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        let base = self.family.tag();
        std::iter::once((base.to_string(), self.name.as_str())).chain(
            self.variants
                .iter()
                .map(move |(lang, value)| (format!("{}:{}", base, lang.suffix()), value.as_str())),
        )
    }
}

/// Une adresse prête à être sérialisée
#[derive(Debug, Clone, PartialEq)]
pub struct AddressFeature {
    pub lat: f64,
    pub lon: f64,
    pub housenumber: String,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub location: Option<Location>,
    pub source_date: String,
    pub reference: String,
}

impl AddressFeature {
    pub fn street(&self) -> Option<&str> {
        self.name_of(NameFamily::Street)
    }

    pub fn place(&self) -> Option<&str> {
        self.name_of(NameFamily::Place)
    }

    fn name_of(&self, family: NameFamily) -> Option<&str> {
        self.location
            .as_ref()
            .filter(|l| l.family == family)
            .map(|l| l.name.as_str())
    }

    /// Tous les tags présents, dans un ordre fixe
    pub fn tags(&self) -> Vec<(String, &str)> {
        let mut tags = vec![(TAG_HOUSENUMBER.to_string(), self.housenumber.as_str())];
        if let Some(location) = &self.location {
            tags.extend(location.tags());
        }
        if let Some(postcode) = &self.postcode {
            tags.push((TAG_POSTCODE.to_string(), postcode.as_str()));
        }
        if let Some(city) = &self.city {
            tags.push((TAG_CITY.to_string(), city.as_str()));
        }
        tags.push((TAG_SOURCE_DATE.to_string(), self.source_date.as_str()));
        tags.push((TAG_SOURCE.to_string(), SOURCE_VALUE));
        tags.push((TAG_REF.to_string(), self.reference.as_str()));
        tags
    }
}

/// Collection ordonnée de features
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<AddressFeature>,
}

impl FeatureCollection {
    pub fn push(&mut self, feature: AddressFeature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Tri déterministe en place (voir `sort::compare`)
    pub fn sort(&mut self) -> usize {
        sort::sort_features(&mut self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minority_language() {
        assert_eq!(Language::minority_at(14.6), Language::Hungarian);
        assert_eq!(Language::minority_at(14.4), Language::Italian);
        assert_eq!(Language::minority_at(14.5), Language::Italian);
    }

    #[test]
    fn test_bilingual_location_tags() {
        let location = Location::bilingual(
            NameFamily::Street,
            "Glavna ulica",
            "Fő utca",
            Language::Hungarian,
        );
        let tags: Vec<(String, &str)> = location.tags().collect();

        assert_eq!(
            tags,
            vec![
                ("addr:street".to_string(), "Glavna ulica / Fő utca"),
                ("addr:street:sl".to_string(), "Glavna ulica"),
                ("addr:street:hu".to_string(), "Fő utca"),
            ]
        );
    }

    #[test]
    fn test_plain_place_tags() {
        let location = Location::plain(NameFamily::Place, "Zgornje Gorje");
        assert!(!location.is_bilingual());
        let tags: Vec<(String, &str)> = location.tags().collect();
        assert_eq!(tags, vec![("addr:place".to_string(), "Zgornje Gorje")]);
    }

    #[test]
    fn test_feature_tags_skip_absent() {
        let feature = AddressFeature {
            lat: 46.0,
            lon: 14.5,
            housenumber: "3".to_string(),
            postcode: None,
            city: Some("Ljubljana".to_string()),
            location: Some(Location::plain(NameFamily::Street, "Trubarjeva")),
            source_date: "2019-05-01".to_string(),
            reference: "11".to_string(),
        };
        let keys: Vec<String> = feature.tags().into_iter().map(|(k, _)| k).collect();

        assert!(!keys.iter().any(|k| k == TAG_POSTCODE));
        assert!(keys.iter().any(|k| k == TAG_CITY));
        assert_eq!(feature.street(), Some("Trubarjeva"));
        assert_eq!(feature.place(), None);
    }
}

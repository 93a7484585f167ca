//! Tri déterministe des features (reproductibilité et compression)

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{info, warn};

use crate::feature::AddressFeature;
use crate::housenumber::normalize;

/// Code postal, puis rue, puis lieu-dit, puis numéro normalisé.
///
/// Chaque niveau est comparé comme un `Option`: une valeur absente trie
/// avant toutes les autres. L'ordre est donc total, et dans un code postal
/// mixte les adresses à lieu-dit seul précèdent les adresses avec rue (voir
/// `count_mixed_postcodes`).
pub fn compare(left: &AddressFeature, right: &AddressFeature) -> Ordering {
    left.postcode
        .cmp(&right.postcode)
        .then_with(|| left.street().cmp(&right.street()))
        .then_with(|| left.place().cmp(&right.place()))
        .then_with(|| normalize(&left.housenumber).cmp(&normalize(&right.housenumber)))
}

/// Nombre de codes postaux mêlant les familles rue et lieu-dit
pub fn count_mixed_postcodes(features: &[AddressFeature]) -> usize {
    let mut families: HashMap<Option<&str>, (bool, bool)> = HashMap::new();
    for feature in features {
        let entry = families.entry(feature.postcode.as_deref()).or_default();
        if feature.street().is_some() {
            entry.0 = true;
        } else {
            entry.1 = true;
        }
    }
    families
        .values()
        .filter(|(street, other)| *street && *other)
        .count()
}

/// Trie en place et retourne le nombre de codes postaux mixtes.
///
/// Le tri est stable: à égalité, l'ordre de lecture est conservé.
pub fn sort_features(features: &mut [AddressFeature]) -> usize {
    let mixed = count_mixed_postcodes(features);
    if mixed > 0 {
        warn!(
            postcodes = mixed,
            "Postcodes mix street and place addresses, place-only addresses are sorted first"
        );
    }

    info!(features = features.len(), "Sorting features");
    features.sort_by(compare);
    mixed
}

//! Clé de tri des numéros de maison

/// Occupe la 4e position quand le numéro n'a pas de suffixe lettre.
/// Inférieur à toute lettre minuscule.
pub const NO_SUFFIX: char = '_';

/// Clé comparable lexicalement: "12" → "012_", "12a" → "012a".
///
/// Trois chiffres + un suffixe au plus dans le registre, d'où 4 caractères.
/// La clé ne sert qu'au tri, jamais à l'affichage.
pub fn normalize(housenumber: &str) -> String {
    match housenumber.chars().last() {
        None => format!("{:0>3}{}", housenumber, NO_SUFFIX),
        Some(c) if c.is_ascii_digit() => format!("{:0>3}{}", housenumber, NO_SUFFIX),
        Some(_) => format!("{:0>4}", housenumber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_without_suffix() {
        assert_eq!(normalize("2"), "002_");
        assert_eq!(normalize("12"), "012_");
        assert_eq!(normalize("123"), "123_");
        assert_eq!(normalize(""), "000_");
    }

    #[test]
    fn test_normalize_with_suffix() {
        assert_eq!(normalize("12a"), "012a");
        assert_eq!(normalize("1c"), "001c");
        assert_eq!(normalize("123b"), "123b");
    }

    #[test]
    fn test_length_and_last_char() {
        for h in ["", "1", "10", "999"] {
            let key = normalize(h);
            assert_eq!(key.chars().count(), 4);
            assert!(key.ends_with(NO_SUFFIX));
        }
        for h in ["1a", "10b", "99č"] {
            let key = normalize(h);
            assert_eq!(key.chars().count(), 4);
            assert_eq!(key.chars().last(), h.chars().last());
        }
    }

    #[test]
    fn test_ordering() {
        assert!(normalize("12") < normalize("12a"));
        assert!(normalize("2") < normalize("12"));
        assert!(normalize("12a") < normalize("12b"));
        assert!(normalize("9b") < normalize("10"));
    }
}

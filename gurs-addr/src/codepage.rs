//! Décodage Windows-1250 des textes de la GURS

use encoding_rs::WINDOWS_1250;

/// Décode des octets Windows-1250 en texte.
///
/// Ne sniffe pas de BOM: les champs dBASE sont à largeur fixe et peuvent
/// commencer par n'importe quel octet. Les séquences invalides sont
/// remplacées, jamais en erreur.
pub fn decode(bytes: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1250.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encode un texte en Windows-1250.
///
/// Les caractères hors de la page de code sont remplacés par des références
/// numériques (`&#NNN;`).
pub fn encode(text: &str) -> Vec<u8> {
    let (bytes, _, _) = WINDOWS_1250.encode(text);
    bytes.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_slovenian() {
        assert_eq!(decode(b"\x8Ambarska cesta"), "Šmbarska cesta");
        assert_eq!(decode(b"\xC8rnu\xe8e"), "Črnuče");
        assert_eq!(decode(b"\x8Eiri"), "Žiri");
    }

    #[test]
    fn test_decode_minority_names() {
        assert_eq!(decode(b"F\xf5 utca"), "Fő utca");
        assert_eq!(decode(b"Capodistria"), "Capodistria");
    }

    #[test]
    fn test_decode_keeps_nul() {
        assert_eq!(decode(b"ab\0\0"), "ab\0\0");
    }

    #[test]
    fn test_encode_reverses_decode() {
        assert_eq!(encode("Črnuče"), b"\xC8rnu\xe8e".to_vec());
    }

    #[test]
    fn test_encode_unmappable_is_substituted() {
        let bytes = encode("日");
        assert!(!bytes.is_empty());
        assert!(bytes.is_ascii());
    }
}

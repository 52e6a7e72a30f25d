//! Text encoding detection and decoding for imported files.
//!
//! Only two encodings are recognised: UTF-8 and the single-byte Cyrillic
//! code page Windows-1251. Detection is a heuristic based on whether either
//! interpretation yields Cyrillic letters; anything else is treated as UTF-8.

mod cp1251;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Text encoding of a book file, fixed at import time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// Windows-1251 single-byte Cyrillic.
    Windows1251,
}

impl Encoding {
    /// Name used in the persisted store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Windows1251 => "Windows-1251",
        }
    }

    /// Parse a stored encoding name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "windows-1251" | "windows1251" | "cp1251" => Some(Encoding::Windows1251),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Encoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(Encoding::from_name(&name).unwrap_or_else(|| {
            tracing::warn!(encoding = %name, "Unknown stored encoding, assuming UTF-8");
            Encoding::Utf8
        }))
    }
}

/// Whether the text contains a letter of the basic Cyrillic alphabet (А..я).
pub fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0410}'..='\u{044F}').contains(&c))
}

/// Guess the encoding of a raw file buffer.
///
/// Never fails: content that looks Cyrillic in neither interpretation
/// defaults to UTF-8.
pub fn detect_encoding(raw: &[u8]) -> Encoding {
    if let Ok(text) = std::str::from_utf8(raw)
        && contains_cyrillic(text)
    {
        return Encoding::Utf8;
    }

    if contains_cyrillic(&decode_single_byte_cyrillic(raw)) {
        return Encoding::Windows1251;
    }

    Encoding::Utf8
}

/// Decode Windows-1251 bytes. ASCII passes through unchanged.
pub fn decode_single_byte_cyrillic(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| cp1251::decode_byte(b)).collect()
}

/// Decode file content with a known encoding.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than reported.
pub fn decode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Windows1251 => decode_single_byte_cyrillic(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "Привет, мир" in Windows-1251.
    const CP1251_HELLO: &[u8] = &[
        0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2, 0x2C, 0x20, 0xEC, 0xE8, 0xF0,
    ];

    #[test]
    fn test_ascii_passthrough_matches_utf8() {
        let bytes: Vec<u8> = (0u8..0x80).collect();
        let utf8 = std::str::from_utf8(&bytes).unwrap();
        assert_eq!(decode_single_byte_cyrillic(&bytes), utf8);
    }

    #[test]
    fn test_table_letters() {
        assert_eq!(decode_single_byte_cyrillic(&[0xC0]), "\u{0410}");
        assert_eq!(decode_single_byte_cyrillic(&[0xFF]), "\u{044F}");
        assert_eq!(decode_single_byte_cyrillic(&[0xA8, 0xB8]), "Ёё");
        assert_eq!(decode_single_byte_cyrillic(CP1251_HELLO), "Привет, мир");
    }

    #[test]
    fn test_table_punctuation() {
        assert_eq!(decode_single_byte_cyrillic(&[0x80]), "Ђ");
        assert_eq!(decode_single_byte_cyrillic(&[0x85]), "…");
        assert_eq!(decode_single_byte_cyrillic(&[0x88]), "€");
        assert_eq!(decode_single_byte_cyrillic(&[0x89]), "‰");
        assert_eq!(decode_single_byte_cyrillic(&[0x96, 0x97]), "–—");
        assert_eq!(decode_single_byte_cyrillic(&[0x99]), "™");
        assert_eq!(decode_single_byte_cyrillic(&[0xB9]), "№");
        assert_eq!(decode_single_byte_cyrillic(&[0x98]), "\u{0098}");
    }

    #[test]
    fn test_detect_utf8_cyrillic() {
        assert_eq!(detect_encoding("Война и мир".as_bytes()), Encoding::Utf8);
    }

    #[test]
    fn test_detect_cp1251() {
        assert_eq!(detect_encoding(CP1251_HELLO), Encoding::Windows1251);
    }

    #[test]
    fn test_detect_ascii_defaults_to_utf8() {
        assert_eq!(detect_encoding(b"Hello, world\n"), Encoding::Utf8);
        assert_eq!(detect_encoding(b""), Encoding::Utf8);
    }

    #[test]
    fn test_detect_binary_without_cyrillic() {
        assert_eq!(detect_encoding(&[0x80, 0x81, 0x82]), Encoding::Utf8);
    }

    #[test]
    fn test_decode_lossy_utf8() {
        assert_eq!(decode(&[b'a', 0xFF, b'b'], Encoding::Utf8), "a\u{FFFD}b");
        assert_eq!(decode(CP1251_HELLO, Encoding::Windows1251), "Привет, мир");
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(Encoding::from_name("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(
            Encoding::from_name("Windows-1251"),
            Some(Encoding::Windows1251)
        );
        assert_eq!(Encoding::from_name("koi8-r"), None);
        assert_eq!(
            serde_json::to_string(&Encoding::Windows1251).unwrap(),
            "\"Windows-1251\""
        );
        let parsed: Encoding = serde_json::from_str("\"latin1\"").unwrap();
        assert_eq!(parsed, Encoding::Utf8);
    }
}

//! Text encodings used to read and write locale catalogs.
//!
//! A catalog is always written back in the encoding it was read with.
//! Latin-1 maps every byte to exactly one character, so a file read as
//! Latin-1 is reproduced byte-for-byte even when it really holds UTF-8.

use crate::error::AppendError;
use encoding_rs::{mem, UTF_8};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Encoding of a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Canonical label, as accepted by [`TextEncoding::from_str`].
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode raw file bytes.
    ///
    /// UTF-8 input is rejected when malformed instead of being patched up
    /// with replacement characters, which would corrupt the file on write.
    pub fn decode(&self, path: &Path, bytes: &[u8]) -> Result<String, AppendError> {
        match self {
            TextEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or_else(|| AppendError::Decode {
                    path: path.to_path_buf(),
                    encoding: self.label(),
                }),
            TextEncoding::Latin1 => Ok(mem::decode_latin1(bytes).into_owned()),
        }
    }

    /// Encode text for writing.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, AppendError> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => {
                if let Some(character) = text.chars().find(|c| u32::from(*c) > 0xFF) {
                    return Err(AppendError::Unencodable {
                        encoding: self.label(),
                        character,
                    });
                }
                debug_assert!(mem::is_str_latin1(text));
                Ok(mem::encode_latin1_lossy(text).into_owned())
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = AppendError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(AppendError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = AppendError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("messages/es.json")
    }

    // ==================== Label Tests ====================

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("utf-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("UTF8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!(
            "latin-1".parse::<TextEncoding>().unwrap(),
            TextEncoding::Latin1
        );
        assert_eq!(
            "ISO-8859-1".parse::<TextEncoding>().unwrap(),
            TextEncoding::Latin1
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "cp1251".parse::<TextEncoding>().unwrap_err();
        assert!(matches!(err, AppendError::UnsupportedEncoding(label) if label == "cp1251"));
    }

    #[test]
    fn test_deserialize_from_label() {
        let encoding: TextEncoding = serde_json::from_str("\"latin1\"").unwrap();
        assert_eq!(encoding, TextEncoding::Latin1);
        assert!(serde_json::from_str::<TextEncoding>("\"ebcdic\"").is_err());
    }

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(TextEncoding::default(), TextEncoding::Utf8);
        assert_eq!(TextEncoding::default().to_string(), "utf-8");
    }

    // ==================== Decode / Encode Tests ====================

    #[test]
    fn test_latin1_is_byte_transparent() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let text = TextEncoding::Latin1.decode(path(), &bytes).unwrap();
        assert_eq!(text.chars().count(), 256);
        assert_eq!(TextEncoding::Latin1.encode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_latin1_preserves_utf8_multibyte_sequences() {
        let original = "{\"a\": \"bilingüe\"}".as_bytes().to_vec();
        let text = TextEncoding::Latin1.decode(path(), &original).unwrap();
        assert_eq!(TextEncoding::Latin1.encode(&text).unwrap(), original);
    }

    #[test]
    fn test_utf8_rejects_malformed_input() {
        let err = TextEncoding::Utf8
            .decode(path(), &[b'{', 0xFF, b'}'])
            .unwrap_err();
        assert!(matches!(err, AppendError::Decode { .. }));
    }

    #[test]
    fn test_utf8_keeps_bom() {
        let bytes = b"\xEF\xBB\xBF{}".to_vec();
        let text = TextEncoding::Utf8.decode(path(), &bytes).unwrap();
        assert_eq!(TextEncoding::Utf8.encode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_latin1_rejects_wide_characters() {
        let err = TextEncoding::Latin1.encode("PUJ → hotel").unwrap_err();
        assert!(matches!(
            err,
            AppendError::Unencodable { character: '→', .. }
        ));
    }

    #[test]
    fn test_latin1_encodes_accents_as_single_bytes() {
        assert_eq!(TextEncoding::Latin1.encode("é").unwrap(), vec![0xE9]);
    }
}

//! Byte-encoding normalization for password input.
//!
//! Passwords may arrive as text or as raw bytes; hashing consumes bytes and
//! the breach check consumes text, so both directions of conversion are
//! needed. UTF-8 covers virtually every deployment; Latin-1 is kept for
//! hosts still verifying hashes produced under a single-byte encoding.

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;

/// Byte encoding used to normalize between text and bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// UTF-8, the default.
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    /// ISO-8859-1: bytes 0x00-0xFF map 1:1 to U+0000-U+00FF.
    #[serde(alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
}

/// The configured encoding cannot represent the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("character {character:?} is not representable in Latin-1")]
    UnencodableChar { character: char },

    #[error("byte 0x{byte:02X} at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { byte: u8, offset: usize },
}

impl Encoding {
    /// Encodes text into bytes under this encoding.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>, EncodingError> {
        match self {
            Encoding::Utf8 => Ok(Cow::Borrowed(text.as_bytes())),
            Encoding::Latin1 => {
                let mut bytes = Vec::with_capacity(text.len());
                for character in text.chars() {
                    let code = u32::from(character);
                    if code > 0xFF {
                        return Err(EncodingError::UnencodableChar { character });
                    }
                    bytes.push(code as u8);
                }
                Ok(Cow::Owned(bytes))
            }
        }
    }

    /// Decodes bytes into text under this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, EncodingError> {
        match self {
            Encoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(Cow::Borrowed(text)),
                Err(err) => {
                    let offset = err.valid_up_to();
                    Err(EncodingError::InvalidUtf8 {
                        byte: bytes[offset],
                        offset,
                    })
                }
            },
            Encoding::Latin1 => Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
        }
    }
}

/// A password as supplied by the caller: text or raw bytes.
///
/// Length is measured on the representation as supplied, before any encoding
/// conversion: characters for text, bytes for bytes.
#[derive(Clone, Copy)]
pub enum Plaintext<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Plaintext<'a> {
    /// Length in the supplied representation.
    pub fn len(&self) -> usize {
        match self {
            Plaintext::Text(text) => text.chars().count(),
            Plaintext::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte form consumed by the hashing primitive.
    pub(crate) fn to_bytes(self, encoding: Encoding) -> Result<Cow<'a, [u8]>, EncodingError> {
        match self {
            Plaintext::Text(text) => encoding.encode(text),
            Plaintext::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }

    /// The text form consumed by the breach lookup.
    pub(crate) fn to_text(self, encoding: Encoding) -> Result<Cow<'a, str>, EncodingError> {
        match self {
            Plaintext::Text(text) => Ok(Cow::Borrowed(text)),
            Plaintext::Bytes(bytes) => encoding.decode(bytes),
        }
    }
}

// Passwords never appear in Debug output.
impl fmt::Debug for Plaintext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plaintext::Text(_) => f.write_str("Plaintext::Text(REDACTED)"),
            Plaintext::Bytes(_) => f.write_str("Plaintext::Bytes(REDACTED)"),
        }
    }
}

impl<'a> From<&'a str> for Plaintext<'a> {
    fn from(text: &'a str) -> Self {
        Plaintext::Text(text)
    }
}

impl<'a> From<&'a String> for Plaintext<'a> {
    fn from(text: &'a String) -> Self {
        Plaintext::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Plaintext<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Plaintext::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Plaintext<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Plaintext::Bytes(bytes)
    }
}

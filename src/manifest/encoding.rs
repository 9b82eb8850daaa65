//! Character encoding of manifest files
//!
//! Manifests are decoded to UTF-8 before parsing. The byte order mark wins,
//! then the `encoding` of the XML declaration, then UTF-8. Updated manifests
//! are encoded back with the encoding and byte order mark they were read with.

use crate::error::ManifestError;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::encoding::{decode, detect_encoding};
use quick_xml::events::Event;
use quick_xml::Reader;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Encoding a manifest was stored with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl Default for ManifestEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl ManifestEncoding {
    /// UTF-8 without a byte order mark
    pub fn utf8() -> Self {
        Self {
            encoding: UTF_8,
            bom: false,
        }
    }

    /// Canonical name of the encoding, e.g. `UTF-16LE` or `windows-1252`
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Detects the encoding of raw manifest bytes
    ///
    /// Returns the encoding and the length of the byte order mark to skip.
    pub fn detect(bytes: &[u8]) -> (Self, usize) {
        match detect_encoding(bytes) {
            Some((encoding, bom_len)) if bom_len > 0 => (
                Self {
                    encoding,
                    bom: true,
                },
                bom_len,
            ),
            Some((encoding, _)) if is_utf16(encoding) => (
                Self {
                    encoding,
                    bom: false,
                },
                0,
            ),
            _ => (
                Self {
                    encoding: declared_encoding(bytes).unwrap_or(UTF_8),
                    bom: false,
                },
                0,
            ),
        }
    }

    /// Encodes text, prefixed with the byte order mark when the source had one
    ///
    /// Characters the encoding cannot represent are written as numeric
    /// character references.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() + 3);
        if self.bom {
            out.extend_from_slice(self.bom_bytes());
        }

        if self.encoding == UTF_16LE {
            text.encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes()));
        } else if self.encoding == UTF_16BE {
            text.encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes()));
        } else {
            let (bytes, _, _) = self.encoding.encode(text);
            out.extend_from_slice(&bytes);
        }
        out
    }

    fn bom_bytes(&self) -> &'static [u8] {
        if self.encoding == UTF_16LE {
            UTF16_LE_BOM
        } else if self.encoding == UTF_16BE {
            UTF16_BE_BOM
        } else {
            UTF8_BOM
        }
    }
}

/// Decodes raw manifest bytes into text without the byte order mark
///
/// Bytes that are invalid in the detected encoding are an XML error.
pub fn decode_manifest(bytes: &[u8]) -> Result<(String, ManifestEncoding), ManifestError> {
    let (encoding, bom_len) = ManifestEncoding::detect(bytes);
    let text = decode(&bytes[bom_len..], encoding.encoding).map_err(quick_xml::Error::from)?;
    if encoding.encoding != UTF_8 {
        tracing::debug!("Decoded manifest from {}", encoding.name());
    }
    Ok((text.into_owned(), encoding))
}

fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

/// Reads the `encoding` pseudo-attribute of a leading XML declaration
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(bytes);
    let Ok(Event::Decl(decl)) = reader.read_event() else {
        return None;
    };
    let label = decl.encoding()?.ok()?;

    match Encoding::for_label(&label) {
        // ASCII-compatible bytes cannot be UTF-16, whatever the declaration says
        Some(encoding) if is_utf16(encoding) => None,
        Some(encoding) => Some(encoding),
        None => {
            tracing::warn!(
                "Unknown manifest encoding {:?}, reading as UTF-8",
                String::from_utf8_lossy(&label)
            );
            None
        }
    }
}

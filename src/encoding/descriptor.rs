//! Encoding descriptor: which encoding to use and whether a BOM is present.
//!
//! A descriptor is chosen once per run and used for both directions, so the
//! bytes written back are produced by exactly the codec that read them.

use std::fmt;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16BE_BOM: &[u8] = b"\xFE\xFF";

/// Encoding identity plus byte-order-mark policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDescriptor {
    encoding: &'static Encoding,
    bom: bool,
}

impl EncodingDescriptor {
    #[must_use]
    pub fn new(encoding: &'static Encoding, bom: bool) -> Self {
        // Only the Unicode encodings have a byte-order mark
        let bom = bom && Self::is_unicode(encoding);
        Self { encoding, bom }
    }

    #[must_use]
    pub fn utf8(bom: bool) -> Self {
        Self::new(UTF_8, bom)
    }

    #[must_use]
    pub fn utf16le(bom: bool) -> Self {
        Self::new(UTF_16LE, bom)
    }

    #[must_use]
    pub fn utf16be(bom: bool) -> Self {
        Self::new(UTF_16BE, bom)
    }

    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    #[must_use]
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// WHATWG name of the encoding, e.g. `UTF-16LE` or `Shift_JIS`
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    fn is_unicode(encoding: &'static Encoding) -> bool {
        encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE
    }

    fn bom_bytes(&self) -> &'static [u8] {
        if !self.bom {
            return &[];
        }
        if self.encoding == UTF_16LE {
            UTF16LE_BOM
        } else if self.encoding == UTF_16BE {
            UTF16BE_BOM
        } else {
            UTF8_BOM
        }
    }

    /// Decode `bytes` into text.
    ///
    /// Returns `None` if the bytes are malformed for this encoding, or if the
    /// descriptor expects a BOM the bytes do not start with. The BOM itself is
    /// not part of the returned text.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let body = bytes.strip_prefix(self.bom_bytes())?;
        self.encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(std::borrow::Cow::into_owned)
    }

    /// Encode `text` back into bytes, BOM first if the descriptor has one.
    ///
    /// Returns `None` if some character has no representation in the encoding.
    #[must_use]
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() + 3);
        out.extend_from_slice(self.bom_bytes());

        // encoding_rs only encodes to ASCII-compatible encodings; UTF-16 is done by hand
        if self.encoding == UTF_16LE {
            out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            return Some(out);
        }
        if self.encoding == UTF_16BE {
            out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
            return Some(out);
        }

        let (bytes, used, had_unmappable) = self.encoding.encode(text);
        if had_unmappable || used != self.encoding {
            return None;
        }
        out.extend_from_slice(&bytes);
        Some(out)
    }

    /// True if decoding `bytes` and encoding the result gives back `bytes`
    #[must_use]
    pub fn round_trips(&self, bytes: &[u8]) -> bool {
        self.decode(bytes)
            .and_then(|text| self.encode(&text))
            .is_some_and(|encoded| encoded == bytes)
    }
}

impl fmt::Display for EncodingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bom {
            write!(f, "{} with BOM", self.name())
        } else {
            f.write_str(self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

    #[test]
    fn test_utf8_bom_stripped_and_restored() {
        let desc = EncodingDescriptor::utf8(true);
        let bytes = b"\xEF\xBB\xBFhello\n";
        assert_eq!(desc.decode(bytes).as_deref(), Some("hello\n"));
        assert_eq!(desc.encode("hello\n").as_deref(), Some(&bytes[..]));
    }

    #[test]
    fn test_missing_bom_is_malformed() {
        let desc = EncodingDescriptor::utf8(true);
        assert!(desc.decode(b"hello").is_none());
    }

    #[test]
    fn test_utf16_encode_by_hand() {
        let le = EncodingDescriptor::utf16le(true);
        assert_eq!(le.encode("a\r\n").unwrap(), b"\xFF\xFEa\0\r\0\n\0");
        let be = EncodingDescriptor::utf16be(false);
        assert_eq!(be.encode("a").unwrap(), b"\0a");
        assert_eq!(be.decode(b"\0a\0b").as_deref(), Some("ab"));
    }

    #[test]
    fn test_utf16_odd_length_is_malformed() {
        assert!(EncodingDescriptor::utf16le(false).decode(b"a\0b").is_none());
    }

    #[test]
    fn test_bom_ignored_for_legacy() {
        let desc = EncodingDescriptor::new(WINDOWS_1252, true);
        assert!(!desc.has_bom());
        assert_eq!(desc.to_string(), "windows-1252");
    }

    #[test]
    fn test_legacy_unmappable() {
        let desc = EncodingDescriptor::new(WINDOWS_1252, false);
        assert!(desc.encode("日本").is_none());
        assert_eq!(desc.encode("caf\u{e9}").unwrap(), b"caf\xE9");
    }

    #[test]
    fn test_shift_jis_round_trip() {
        let desc = EncodingDescriptor::new(SHIFT_JIS, false);
        // "日本語" in Shift_JIS
        let bytes = b"\x93\xFA\x96\x7B\x8C\xEA\r\n";
        assert!(desc.round_trips(bytes));
        assert_eq!(desc.decode(bytes).as_deref(), Some("日本語\r\n"));
    }

    #[test]
    fn test_display_with_bom() {
        assert_eq!(EncodingDescriptor::utf16be(true).to_string(), "UTF-16BE with BOM");
    }
}

//! Encoding detection.
//!
//! [`SniffingDetector`] decides in a fixed order: UTF-32 rejection, byte-order
//! mark, empty input, BOM-less UTF-16, binary rejection, strict UTF-8, and finally a
//! statistical guess among legacy encodings followed by the configured
//! fallback. A legacy candidate is only accepted if decoding and re-encoding
//! reproduces the input bytes exactly.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use thiserror::Error as ThisError;

use super::EncodingDescriptor;

/// Number of leading bytes inspected by the UTF-16 heuristic
const UTF16_SNIFF_LEN: usize = 4096;

/// Why no encoding could be chosen
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DetectError {
    #[error("content looks binary (NUL bytes outside UTF-16 text)")]
    Binary,

    #[error("UTF-32 content is not supported")]
    Utf32,

    #[error("content after the byte-order mark is not valid {encoding}")]
    MalformedBom { encoding: &'static str },

    #[error("no candidate encoding round-trips the content (tried: {})", .tried.join(", "))]
    NoRoundTrip { tried: Vec<&'static str> },
}

/// UTF-32 byte-order marks; the LE one also starts with the UTF-16LE mark
const UTF32_BOMS: [&[u8]; 2] = [b"\xFF\xFE\0\0", b"\0\0\xFE\xFF"];

/// Chooses the encoding used to read and rewrite a file.
///
/// Implementations must be deterministic: the same bytes always produce the
/// same descriptor.
pub trait EncodingDetector {
    fn detect(&self, bytes: &[u8]) -> Result<EncodingDescriptor, DetectError>;
}

/// Signature and statistics based detector
#[derive(Debug, Clone, Copy)]
pub struct SniffingDetector {
    fallback: &'static Encoding,
    guess: bool,
}

impl SniffingDetector {
    /// Create a detector that falls back to `fallback` for non-Unicode input.
    ///
    /// With `guess` set, a statistical guess is tried before the fallback.
    #[must_use]
    pub fn new(fallback: &'static Encoding, guess: bool) -> Self {
        Self { fallback, guess }
    }

    fn legacy_candidates(&self, bytes: &[u8]) -> Vec<&'static Encoding> {
        let mut candidates = Vec::with_capacity(2);
        if self.guess {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(bytes, true);
            candidates.push(detector.guess(None, false));
        }
        if !candidates.contains(&self.fallback) {
            candidates.push(self.fallback);
        }
        candidates
    }
}

impl Default for SniffingDetector {
    fn default() -> Self {
        Self::new(encoding_rs::SHIFT_JIS, true)
    }
}

impl EncodingDetector for SniffingDetector {
    fn detect(&self, bytes: &[u8]) -> Result<EncodingDescriptor, DetectError> {
        if UTF32_BOMS.iter().any(|bom| bytes.starts_with(bom)) {
            return Err(DetectError::Utf32);
        }

        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            let desc = EncodingDescriptor::new(encoding, true);
            log::debug!("byte-order mark found: {desc}");
            return check_bom_body(desc, bytes);
        }

        if bytes.is_empty() {
            return Ok(EncodingDescriptor::utf8(false));
        }

        if let Some(desc) = sniff_utf16(bytes) {
            log::debug!("NUL byte pattern matches {desc}");
            return Ok(desc);
        }

        if bytes.contains(&0) {
            return Err(DetectError::Binary);
        }

        if std::str::from_utf8(bytes).is_ok() {
            return Ok(EncodingDescriptor::utf8(false));
        }

        let candidates = self.legacy_candidates(bytes);
        for &encoding in &candidates {
            let desc = EncodingDescriptor::new(encoding, false);
            if desc.round_trips(bytes) {
                return Ok(desc);
            }
            log::debug!("{} does not round-trip the content", encoding.name());
        }

        Err(DetectError::NoRoundTrip {
            tried: candidates.iter().map(|e| e.name()).collect(),
        })
    }
}

/// Accept a BOM-marked descriptor only if the body is NUL-free and lossless
fn check_bom_body(
    desc: EncodingDescriptor,
    bytes: &[u8],
) -> Result<EncodingDescriptor, DetectError> {
    let malformed = || DetectError::MalformedBom {
        encoding: desc.name(),
    };
    let text = desc.decode(bytes).ok_or_else(malformed)?;
    if text.contains('\0') {
        return Err(DetectError::Binary);
    }
    if desc.encode(&text).as_deref() != Some(bytes) {
        return Err(malformed());
    }
    Ok(desc)
}

/// Recognize BOM-less UTF-16 by where the NUL bytes of ASCII-range text fall
fn sniff_utf16(bytes: &[u8]) -> Option<EncodingDescriptor> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let sample = &bytes[..bytes.len().min(UTF16_SNIFF_LEN)];
    let pairs = sample.len() / 2;
    let (mut nul_even, mut nul_odd) = (0usize, 0usize);
    for pair in sample.chunks_exact(2) {
        if pair[0] == 0 {
            nul_even += 1;
        }
        if pair[1] == 0 {
            nul_odd += 1;
        }
    }

    // At least half the code units must look like ASCII, and the other side
    // must be almost free of NULs
    let (encoding, hits, misses) = if nul_odd > nul_even {
        (UTF_16LE, nul_odd, nul_even)
    } else {
        (UTF_16BE, nul_even, nul_odd)
    };
    if hits * 2 < pairs || misses * 10 > pairs {
        return None;
    }

    let desc = EncodingDescriptor::new(encoding, false);
    desc.round_trips(bytes).then_some(desc)
}

/// True for encodings that can serve as a legacy fallback
#[must_use]
pub fn is_valid_fallback(encoding: &'static Encoding) -> bool {
    encoding != UTF_8 && encoding.is_ascii_compatible()
}

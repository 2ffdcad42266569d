//! Line-terminator normalization.
//!
//! Every line break in the text becomes CRLF, whatever mixture of CRLF,
//! bare LF and bare CR it started with. The rewrite happens in three
//! structural passes:
//!
//! 1. CRLF -> LF, so existing pairs are not counted twice
//! 2. remaining bare CR -> LF
//! 3. LF -> CRLF
//!
//! After pass 2 each LF stands for exactly one original line break, so pass 3
//! neither duplicates nor drops a break. Normalizing CRLF-only text is a no-op.

/// Canonical line terminator written by this tool
pub const CANONICAL: &str = "\r\n";

/// Counts of the line terminators found in a piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineEndingStats {
    pub crlf: usize,
    pub lf: usize,
    pub cr: usize,
}

impl LineEndingStats {
    /// Scan `text` and count each terminator style
    #[must_use]
    pub fn scan(text: &str) -> Self {
        let mut stats = Self::default();
        let mut bytes = text.as_bytes().iter().peekable();
        while let Some(&b) = bytes.next() {
            match b {
                b'\r' if bytes.peek() == Some(&&b'\n') => {
                    bytes.next();
                    stats.crlf += 1;
                }
                b'\r' => stats.cr += 1,
                b'\n' => stats.lf += 1,
                _ => {}
            }
        }
        stats
    }

    /// Total number of line breaks
    #[must_use]
    pub fn total(&self) -> usize {
        self.crlf + self.lf + self.cr
    }

    /// True when every break is already CRLF
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.lf == 0 && self.cr == 0
    }
}

/// Rewrite every line break in `text` as CRLF
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', CANONICAL)
}

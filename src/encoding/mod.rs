//! Character encoding handling.
//!
//! - [`descriptor`]: The [`EncodingDescriptor`] used to decode and re-encode a file
//! - [`detect`]: The [`EncodingDetector`] seam and its default [`SniffingDetector`]

pub mod descriptor;
pub mod detect;

pub use descriptor::EncodingDescriptor;
pub use detect::{is_valid_fallback, DetectError, EncodingDetector, SniffingDetector};

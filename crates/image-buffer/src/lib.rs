//! Slidetrack Image Buffer
//!
//! Turns transport-encoded challenge images into in-memory pixel matrices:
//! - **Decode:** base64 (or data URL) payloads into grayscale + alpha planes
//! - **Mask:** which slider pixels are opaque and take part in matching
//!
//! Decoding failures are reported as [`DecodeError`] and never swallowed.

pub mod decode;
pub mod mask;

pub use decode::{decode_base64, decode_bytes, decode_file, encode_png_base64, DecodeError, DecodedImage};
pub use mask::Mask;

//! Codec table for the supported formats.
//!
//! | Token(s) | Codec | Signature |
//! |---|---|---|
//! | `gif` | [`GifCodec`] | `GIF87a` / `GIF89a` |
//! | `jpeg`, `jpg` | [`JpegCodec`] | `FF D8 FF` |
//! | `png` | [`PngCodec`] | `89 50 4E 47 0D 0A 1A 0A` |
//!
//! The module is split into:
//! - **Registry**: [`Codec`] trait + [`CodecRegistry`], the single table that
//!   answers "is this token supported", "which codec writes it" and "which
//!   codec reads these bytes"
//! - **Formats**: the `image` crate backed GIF, JPEG and PNG codecs
//! - **Parameters**: encoder settings such as [`Quality`]

mod formats;
mod params;
pub mod registry;

pub use formats::{GifCodec, JpegCodec, PngCodec};
pub use params::{EncodeParams, Quality};
pub use registry::{BufReadSeek, Codec, CodecRegistry, SNIFF_LEN};

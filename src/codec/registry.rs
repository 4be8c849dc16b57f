//! Codec trait and the registry that dispatches to it.
//!
//! The [`Codec`] trait defines what every format must support: the extension
//! tokens it answers to, a content-signature check, decode and encode.
//!
//! [`CodecRegistry`] is the only place formats are listed. Extension
//! validation, encoder dispatch and signature detection all go through it, so
//! adding or removing a format is a single registration.

use super::formats::{GifCodec, JpegCodec, PngCodec};
use super::params::EncodeParams;
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ImageError, ImageResult, RgbaImage};
use std::io::{BufRead, Read, Seek, SeekFrom, Write};

/// Number of leading bytes handed to [`Codec::sniff`].
pub const SNIFF_LEN: usize = 16;

/// Object-safe `BufRead + Seek`, the input every decoder needs.
pub trait BufReadSeek: BufRead + Seek {}

impl<T: BufRead + Seek> BufReadSeek for T {}

/// A single image format.
pub trait Codec: Send + Sync {
    /// Short human-readable name, e.g. `"PNG"`.
    fn name(&self) -> &'static str;

    /// Lower-case extension tokens this codec reads and writes, without dots.
    fn extensions(&self) -> &'static [&'static str];

    /// Whether `header` (up to [`SNIFF_LEN`] leading bytes) carries this format's signature.
    fn sniff(&self, header: &[u8]) -> bool;

    /// Decode a whole image. The reader is positioned at the start of the data.
    fn decode(&self, reader: &mut dyn BufReadSeek) -> ImageResult<DynamicImage>;

    /// Encode `image` to `writer`.
    fn encode(
        &self,
        image: &RgbaImage,
        writer: &mut dyn Write,
        params: &EncodeParams,
    ) -> ImageResult<()>;
}

/// Ordered list of codecs.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry with no codecs; every token is unsupported.
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// GIF, JPEG and PNG.
    pub fn standard() -> Self {
        Self::empty()
            .with(GifCodec)
            .with(JpegCodec)
            .with(PngCodec)
    }

    /// Append a codec. Earlier registrations win on token or signature overlap.
    pub fn with(mut self, codec: impl Codec + 'static) -> Self {
        self.codecs.push(Box::new(codec));
        self
    }

    /// Codec registered for a file type token.
    pub fn for_token(&self, token: &str) -> Option<&dyn Codec> {
        self.codecs
            .iter()
            .find(|c| c.extensions().contains(&token))
            .map(|c| c.as_ref())
    }

    pub fn supports(&self, token: &str) -> bool {
        self.for_token(token).is_some()
    }

    /// Every supported token, in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.codecs.iter().flat_map(|c| c.extensions().iter().copied())
    }

    /// Codec whose signature matches `header`.
    pub fn detect(&self, header: &[u8]) -> Option<&dyn Codec> {
        self.codecs
            .iter()
            .find(|c| c.sniff(header))
            .map(|c| c.as_ref())
    }

    /// Peek at the start of `reader`, rewind it, and return the matching codec.
    pub fn detect_reader(&self, reader: &mut dyn BufReadSeek) -> ImageResult<&dyn Codec> {
        let mut header = Vec::with_capacity(SNIFF_LEN);
        (&mut *reader)
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut header)?;
        reader.seek(SeekFrom::Start(0))?;
        self.detect(&header).ok_or_else(unknown_format)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn unknown_format() -> ImageError {
    ImageError::Unsupported(UnsupportedError::from_format_and_kind(
        ImageFormatHint::Unknown,
        UnsupportedErrorKind::Format(ImageFormatHint::Unknown),
    ))
}

//! GIF, JPEG and PNG codecs backed by the `image` crate.
//!
//! ## Crate mapping
//!
//! | Format | Decode | Encode |
//! |---|---|---|
//! | GIF | `image::codecs::gif::GifDecoder` (first frame) | `GifEncoder`, NeuQuant palette, default settings |
//! | JPEG | `image::codecs::jpeg::JpegDecoder` | `JpegEncoder::new_with_quality`, composited over black |
//! | PNG | `image::codecs::png::PngDecoder` | `PngEncoder`, default compression, RGBA8 |
//!
//! Every decoder runs under `image::Limits::default()`: a header that claims
//! more pixel data than the allocation limit is rejected before any buffer is
//! allocated.

use super::params::EncodeParams;
use super::registry::{BufReadSeek, Codec};
use image::codecs::gif::{GifDecoder, GifEncoder};
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::codecs::png::{PngDecoder, PngEncoder};
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageResult, Limits, Rgb,
    RgbImage, RgbaImage,
};
use std::io::Write;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF87_SIGNATURE: &[u8] = b"GIF87a";
const GIF89_SIGNATURE: &[u8] = b"GIF89a";

fn decode_limited(mut decoder: impl ImageDecoder) -> ImageResult<DynamicImage> {
    let mut limits = Limits::default();
    limits.reserve(decoder.total_bytes())?;
    decoder.set_limits(limits)?;
    DynamicImage::from_decoder(decoder)
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GifCodec;

impl Codec for GifCodec {
    fn name(&self) -> &'static str {
        "GIF"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["gif"]
    }

    fn sniff(&self, header: &[u8]) -> bool {
        header.starts_with(GIF87_SIGNATURE) || header.starts_with(GIF89_SIGNATURE)
    }

    fn decode(&self, reader: &mut dyn BufReadSeek) -> ImageResult<DynamicImage> {
        decode_limited(GifDecoder::new(reader)?)
    }

    fn encode(
        &self,
        image: &RgbaImage,
        writer: &mut dyn Write,
        _params: &EncodeParams,
    ) -> ImageResult<()> {
        // The trailer is written when the encoder drops.
        let mut encoder = GifEncoder::new(writer);
        encoder.encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl Codec for JpegCodec {
    fn name(&self) -> &'static str {
        "JPEG"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["jpeg", "jpg"]
    }

    fn sniff(&self, header: &[u8]) -> bool {
        header.starts_with(JPEG_SIGNATURE)
    }

    fn decode(&self, reader: &mut dyn BufReadSeek) -> ImageResult<DynamicImage> {
        decode_limited(JpegDecoder::new(reader)?)
    }

    fn encode(
        &self,
        image: &RgbaImage,
        writer: &mut dyn Write,
        params: &EncodeParams,
    ) -> ImageResult<()> {
        // No alpha channel in JPEG: composite over black.
        let rgb = RgbImage::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            Rgb([r, g, b].map(|c| premultiply(c, a)))
        });
        JpegEncoder::new_with_quality(writer, params.quality.value()).write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl Codec for PngCodec {
    fn name(&self) -> &'static str {
        "PNG"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png"]
    }

    fn sniff(&self, header: &[u8]) -> bool {
        header.starts_with(PNG_SIGNATURE)
    }

    fn decode(&self, reader: &mut dyn BufReadSeek) -> ImageResult<DynamicImage> {
        decode_limited(PngDecoder::with_limits(reader, Limits::default())?)
    }

    fn encode(
        &self,
        image: &RgbaImage,
        writer: &mut dyn Write,
        _params: &EncodeParams,
    ) -> ImageResult<()> {
        PngEncoder::new(writer).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
    }
}

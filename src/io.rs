//! Path-based image reading and writing.
//!
//! [`ImageIo`] bundles the three things a read or write needs: the
//! [`CodecRegistry`] (which tokens are supported and how to code them), the
//! [`CodecConfig`] (encoder settings) and a [`DiagnosticSink`] (where step
//! traces go). All three are fixed at construction, so one `ImageIo` can be
//! shared between threads and every call sees a consistent setup.
//!
//! ## Read
//!
//! ```text
//! clean path → check token → open → decode (codec picked by content signature) → close
//! ```
//!
//! ## Write
//!
//! ```text
//! clean path → check token → create/truncate → encode (codec picked by token) → close
//! ```
//!
//! The extension only gates the upfront supported/unsupported check on read.
//! The decoder is chosen by the file's signature, so a PNG saved as `.jpg`
//! still reads fine. An encode failure leaves the partially written file on disk.
//! An image with zero width or height is an encode failure for every format.

use crate::codec::CodecRegistry;
use crate::config::CodecConfig;
use crate::diagnostics::{Discard, DiagnosticSink, Trace};
use crate::path::{clean_path, parse_file_type};
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, GenericImageView, ImageError, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageIoError {
    #[error("unsupported file type '{0}'")]
    UnsupportedType(String),
    #[error("failed to open file: {0}")]
    Open(#[source] std::io::Error),
    #[error("failed to create file: {0}")]
    Create(#[source] std::io::Error),
    #[error("failed to decode file as image: {0}")]
    Decode(#[source] ImageError),
    #[error("failed to encode file: {0}")]
    Encode(#[source] ImageError),
}

/// Reads and writes images at file-system paths.
///
/// The default instance supports GIF, JPEG and PNG, encodes JPEG at quality 75
/// and discards all traces.
#[derive(Clone)]
pub struct ImageIo {
    registry: Arc<CodecRegistry>,
    config: CodecConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl ImageIo {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(CodecRegistry::standard()),
            config: CodecConfig::default(),
            sink: Arc::new(Discard),
        }
    }

    /// Send step traces to `sink` instead of discarding them.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Read the image at `path`.
    ///
    /// Fails without touching the file system if the extension is not a
    /// supported token.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<DynamicImage, ImageIoError> {
        let path = clean_path(path);
        self.trace(Trace::SourcePath(path.clone()));
        self.trace(Trace::CheckingType);
        let token = parse_file_type(&path.to_string_lossy());
        if !self.registry.supports(&token) {
            return Err(ImageIoError::UnsupportedType(token));
        }

        self.trace(Trace::Opening);
        let file = File::open(&path).map_err(ImageIoError::Open)?;
        let file = ScopedFile::new(file, self.sink.as_ref());

        self.trace(Trace::Decoding);
        let mut reader = BufReader::new(file.handle());
        let codec = self
            .registry
            .detect_reader(&mut reader)
            .map_err(ImageIoError::Decode)?;
        codec.decode(&mut reader).map_err(ImageIoError::Decode)
    }

    /// Write `image` to `path`, encoded according to the path's extension.
    ///
    /// An existing file is truncated. Fails without touching the file system
    /// if the extension is not a supported token.
    pub fn write<I>(&self, image: &I, path: impl AsRef<Path>) -> Result<(), ImageIoError>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let path = clean_path(path);
        self.trace(Trace::TargetPath(path.clone()));
        self.trace(Trace::DetectingEncoding);
        let token = parse_file_type(&path.to_string_lossy());
        let codec = self
            .registry
            .for_token(&token)
            .ok_or_else(|| ImageIoError::UnsupportedType(token.clone()))?;

        self.trace(Trace::Creating);
        let file = File::create(&path).map_err(ImageIoError::Create)?;
        let file = ScopedFile::new(file, self.sink.as_ref());

        self.trace(Trace::Encoding(token));
        let pixels = to_rgba(image);
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImageIoError::Encode(ImageError::Parameter(
                ParameterError::from_kind(ParameterErrorKind::DimensionMismatch),
            )));
        }
        let mut writer = BufWriter::new(file.handle());
        codec
            .encode(&pixels, &mut writer, &self.config.encode_params())
            .map_err(ImageIoError::Encode)?;
        writer
            .flush()
            .map_err(|e| ImageIoError::Encode(ImageError::IoError(e)))
    }

    fn trace(&self, trace: Trace) {
        self.sink.record(&trace);
    }
}

impl Default for ImageIo {
    fn default() -> Self {
        Self::new()
    }
}

/// Open file that reports its release to the sink.
///
/// The close trace is recorded first, then the handle itself is dropped.
struct ScopedFile<'a> {
    file: File,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ScopedFile<'a> {
    fn new(file: File, sink: &'a dyn DiagnosticSink) -> Self {
        Self { file, sink }
    }

    fn handle(&self) -> &File {
        &self.file
    }
}

impl Drop for ScopedFile<'_> {
    fn drop(&mut self) {
        self.sink.record(&Trace::Closing);
    }
}

/// Copy any RGBA8 view into an owned buffer.
fn to_rgba<I>(image: &I) -> RgbaImage
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = image.dimensions();
    RgbaImage::from_fn(width, height, |x, y| image.get_pixel(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn traced() -> (ImageIo, mpsc::Receiver<Trace>) {
        let (tx, rx) = mpsc::channel();
        (ImageIo::new().with_sink(tx), rx)
    }

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 80, y as u8 * 120, 30, 255]))
    }

    #[test]
    fn read_traces_every_step_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.png");
        ImageIo::new().write(&sample(), &path).unwrap();

        let (io, rx) = traced();
        io.read(&path).unwrap();
        drop(io);

        let traces: Vec<Trace> = rx.iter().collect();
        assert_eq!(
            traces,
            vec![
                Trace::SourcePath(path.clone()),
                Trace::CheckingType,
                Trace::Opening,
                Trace::Decoding,
                Trace::Closing,
            ]
        );
    }

    #[test]
    fn write_traces_every_step_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.gif");

        let (io, rx) = traced();
        io.write(&sample(), &path).unwrap();
        drop(io);

        let traces: Vec<Trace> = rx.iter().collect();
        assert_eq!(
            traces,
            vec![
                Trace::TargetPath(path.clone()),
                Trace::DetectingEncoding,
                Trace::Creating,
                Trace::Encoding("gif".into()),
                Trace::Closing,
            ]
        );
    }

    #[test]
    fn traced_path_is_cleaned() {
        let tmp = TempDir::new().unwrap();
        let messy = tmp.path().join("a").join("..").join(".").join("x.png");

        let (io, rx) = traced();
        io.write(&sample(), &messy).unwrap();
        drop(io);

        let first = rx.iter().next().unwrap();
        assert_eq!(first, Trace::TargetPath(tmp.path().join("x.png")));
    }

    #[test]
    fn unsupported_read_stops_before_open() {
        let (io, rx) = traced();
        let err = io.read("missing/notes.txt").unwrap_err();
        drop(io);

        assert!(matches!(err, ImageIoError::UnsupportedType(ref t) if t == "txt"));
        let traces: Vec<Trace> = rx.iter().collect();
        assert_eq!(
            traces,
            vec![
                Trace::SourcePath(PathBuf::from("missing/notes.txt")),
                Trace::CheckingType,
            ]
        );
    }

    #[test]
    fn failed_open_is_not_closed() {
        let tmp = TempDir::new().unwrap();
        let (io, rx) = traced();
        let err = io.read(tmp.path().join("nothing.gif")).unwrap_err();
        drop(io);

        assert!(matches!(err, ImageIoError::Open(_)));
        let traces: Vec<Trace> = rx.iter().collect();
        assert_eq!(traces.last(), Some(&Trace::Opening));
    }

    #[test]
    fn decode_failure_still_closes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let (io, rx) = traced();
        let err = io.read(&path).unwrap_err();
        drop(io);

        assert!(matches!(err, ImageIoError::Decode(_)));
        let traces: Vec<Trace> = rx.iter().collect();
        assert_eq!(&traces[traces.len() - 2..], &[Trace::Decoding, Trace::Closing]);
    }

    #[test]
    fn empty_registry_rejects_everything() {
        let io = ImageIo::new().with_registry(CodecRegistry::empty());
        let err = io.write(&sample(), "out.png").unwrap_err();
        assert!(matches!(err, ImageIoError::UnsupportedType(ref t) if t == "png"));
    }

    #[test]
    fn dynamic_images_are_accepted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gray.png");
        let gray = DynamicImage::new_luma8(5, 4);

        ImageIo::new().write(&gray, &path).unwrap();
        let read = ImageIo::new().read(&path).unwrap();

        assert_eq!(read.dimensions(), (5, 4));
        assert_eq!(read.to_rgba8().get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn empty_image_fails_after_create() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nothing.gif");

        let (io, rx) = traced();
        let err = io.write(&RgbaImage::new(0, 0), &path).unwrap_err();
        drop(io);

        assert!(matches!(err, ImageIoError::Encode(ImageError::Parameter(_))));
        let traces: Vec<Trace> = rx.iter().collect();
        assert_eq!(
            &traces[2..],
            &[Trace::Creating, Trace::Encoding("gif".into()), Trace::Closing]
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ImageIoError::UnsupportedType("bmp".into()).to_string(),
            "unsupported file type 'bmp'"
        );
        let open = ImageIoError::Open(std::io::Error::other("gone"));
        assert_eq!(open.to_string(), "failed to open file: gone");
        assert!(std::error::Error::source(&open).is_some());
    }
}

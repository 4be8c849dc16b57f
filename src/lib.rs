//! # fimage
//!
//! Read and write raster images straight from and to file-system paths. The
//! codec is picked from the file extension:
//!
//! ```no_run
//! let img = fimage::read_image("photos/dawn.jpg")?;
//! fimage::write_image(&img, "photos/dawn.png")?;
//! # Ok::<(), fimage::ImageIoError>(())
//! ```
//!
//! Supported file types: `gif`, `jpeg`, `jpg`, `png` (case-insensitive).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`path`] | File type token parsing and lexical path cleaning |
//! | [`codec`] | The codec table: [`Codec`] trait, [`CodecRegistry`], GIF/JPEG/PNG codecs |
//! | [`io`] | [`ImageIo`]: the read and write operations |
//! | [`diagnostics`] | [`Trace`] events and the [`DiagnosticSink`]s that receive them |
//! | [`config`] | TOML encoder settings (JPEG quality) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Codec Table
//!
//! Whether a token is supported, which encoder writes it and which decoder
//! recognizes a byte stream are all answered by the same [`CodecRegistry`].
//! The list of accepted extensions and the encoder dispatch cannot drift apart.
//!
//! ## Content Decides the Decoder
//!
//! On read the extension only gates the supported/unsupported check. The
//! decoder is chosen from the file's leading signature bytes, so a PNG stream
//! saved as `photo.jpg` decodes as PNG.
//!
//! ## Injected Diagnostics
//!
//! Step traces go to the [`DiagnosticSink`] owned by an [`ImageIo`], not to a
//! process-wide global. The default sink discards everything; attach another
//! with [`ImageIo::with_sink`]. The free functions [`read_image`] and
//! [`write_image`] use a shared default instance.
//!
//! ```no_run
//! use fimage::{ImageIo, WriterSink};
//!
//! let io = ImageIo::new().with_sink(WriterSink::new(std::io::stderr()));
//! let img = io.read("in.gif")?;
//! # Ok::<(), fimage::ImageIoError>(())
//! ```

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod io;
pub mod output;
pub mod path;

pub use codec::{Codec, CodecRegistry};
pub use diagnostics::{DiagnosticSink, Discard, Trace, WriterSink};
pub use io::{ImageIo, ImageIoError};
pub use path::{clean_path, parse_file_type};

use image::{DynamicImage, GenericImageView, Rgba};
use std::path::Path;
use std::sync::LazyLock;

static DEFAULT_IO: LazyLock<ImageIo> = LazyLock::new(ImageIo::new);

/// Read the image at `path` with the default [`ImageIo`].
pub fn read_image(path: impl AsRef<Path>) -> Result<DynamicImage, ImageIoError> {
    DEFAULT_IO.read(path)
}

/// Write `image` to `path` with the default [`ImageIo`].
pub fn write_image<I>(image: &I, path: impl AsRef<Path>) -> Result<(), ImageIoError>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    DEFAULT_IO.write(image, path)
}

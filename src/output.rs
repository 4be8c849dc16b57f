//! CLI output formatting.
//!
//! ```text
//! photos/dawn.png
//!     Type: png
//!     Size: 640x480
//!     Color: Rgba8
//! ```
//!
//! Each `format_*` function returns lines (or a string) and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::diagnostics::Trace;
use image::{DynamicImage, GenericImageView};
use serde::Serialize;
use std::path::Path;

/// What `fimage info` reports about a decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub path: String,
    pub file_type: String,
    pub width: u32,
    pub height: u32,
    pub color: String,
}

impl ImageSummary {
    pub fn new(path: &Path, file_type: &str, image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.display().to_string(),
            file_type: file_type.to_string(),
            width,
            height,
            color: format!("{:?}", image.color()),
        }
    }
}

pub fn format_summary(summary: &ImageSummary) -> Vec<String> {
    vec![
        summary.path.clone(),
        format!("    Type: {}", summary.file_type),
        format!("    Size: {}x{}", summary.width, summary.height),
        format!("    Color: {}", summary.color),
    ]
}

pub fn print_summary(summary: &ImageSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}

/// Trace line as shown by `--verbose`.
pub fn format_trace(trace: &Trace) -> String {
    format!("[fimage] {trace}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_from_image() {
        let image = DynamicImage::new_rgb8(640, 480);
        let summary = ImageSummary::new(Path::new("photos/dawn.jpg"), "jpg", &image);
        assert_eq!(summary.width, 640);
        assert_eq!(summary.height, 480);
        assert_eq!(summary.color, "Rgb8");
        assert_eq!(summary.path, "photos/dawn.jpg");
    }

    #[test]
    fn summary_lines() {
        let summary = ImageSummary {
            path: "a.png".into(),
            file_type: "png".into(),
            width: 2,
            height: 3,
            color: "Rgba8".into(),
        };
        assert_eq!(
            format_summary(&summary),
            vec!["a.png", "    Type: png", "    Size: 2x3", "    Color: Rgba8"]
        );
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = ImageSummary {
            path: "a.gif".into(),
            file_type: "gif".into(),
            width: 1,
            height: 1,
            color: "Rgba8".into(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["file_type"], "gif");
        assert_eq!(json["width"], 1);
    }

    #[test]
    fn trace_line_is_prefixed() {
        assert_eq!(format_trace(&Trace::Opening), "[fimage] opening file");
    }
}

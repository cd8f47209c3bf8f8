/// Image format detection and type-safe format handling
///
/// Formats are identified by signature bytes first; the file extension is
/// only consulted when the signature is missing or unreadable.
use crate::constants::{
    BMP_SIGNATURE, JPEG_SIGNATURE, PNG_SIGNATURE, RIFF_SIGNATURE, SIGNATURE_PROBE_LEN,
    TIFF_BE_SIGNATURE, TIFF_LE_SIGNATURE, WEBP_FOURCC,
};
use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// The closed set of image formats this tool understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
}

impl ImageKind {
    /// Identify a format from the leading bytes of a file
    pub fn from_signature(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Some(ImageKind::Png)
        } else if bytes.starts_with(&JPEG_SIGNATURE) {
            Some(ImageKind::Jpeg)
        } else if bytes.len() >= 12
            && bytes[0..4] == RIFF_SIGNATURE
            && bytes[8..12] == WEBP_FOURCC
        {
            Some(ImageKind::WebP)
        } else if bytes.starts_with(&TIFF_LE_SIGNATURE) || bytes.starts_with(&TIFF_BE_SIGNATURE) {
            Some(ImageKind::Tiff)
        } else if bytes.starts_with(&BMP_SIGNATURE) {
            Some(ImageKind::Bmp)
        } else {
            None
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::WebP),
            "bmp" => Some(ImageKind::Bmp),
            "tiff" | "tif" => Some(ImageKind::Tiff),
            _ => None,
        }
    }

    /// Returns the canonical file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::WebP => "webp",
            ImageKind::Bmp => "bmp",
            ImageKind::Tiff => "tiff",
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::WebP => ImageFormat::WebP,
            ImageKind::Bmp => ImageFormat::Bmp,
            ImageKind::Tiff => ImageFormat::Tiff,
        }
    }

    pub fn all() -> [ImageKind; 5] {
        [
            ImageKind::Jpeg,
            ImageKind::Png,
            ImageKind::WebP,
            ImageKind::Bmp,
            ImageKind::Tiff,
        ]
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::WebP => "WebP",
            ImageKind::Bmp => "BMP",
            ImageKind::Tiff => "TIFF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageKind {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        ImageKind::from_extension(s).ok_or_else(|| CompressionError::UnsupportedFormat(s.to_string()))
    }
}

/// Determine the format of a file on disk.
///
/// Reads a short probe from the file and matches signature bytes. When the
/// probe cannot be read or matches nothing, the extension decides. A file
/// with neither is not ours to handle.
pub fn detect_kind(path: &Path) -> Result<ImageKind> {
    if let Some(kind) = read_signature_probe(path).as_deref().and_then(ImageKind::from_signature) {
        return Ok(kind);
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageKind::from_extension)
        .ok_or_else(|| CompressionError::UnsupportedFormat(path.display().to_string()))
}

fn read_signature_probe(path: &Path) -> Option<Vec<u8>> {
    let mut file = File::open(path).ok()?;
    let mut probe = vec![0u8; SIGNATURE_PROBE_LEN];
    let read = file.read(&mut probe).ok()?;
    probe.truncate(read);
    Some(probe)
}

/// Check whether a path carries one of the supported image extensions
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(ImageKind::from_extension)
        .is_some()
}

#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgba, RgbaImage};
use img_parts::{Bytes, ImageEXIF};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Minimal little-endian TIFF header, good enough to survive an EXIF
/// extract/insert roundtrip.
pub const EXIF_STUB: &[u8] = b"II*\x00\x08\x00\x00\x00";

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// A smooth gradient with enough structure that every codec has
/// something to compress.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    });
    DynamicImage::ImageRgba8(img)
}

pub fn encode_image(image: &DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    let bytes = encode_image(&gradient_image(width, height), image::ImageFormat::Png);
    fs::write(path, bytes).unwrap();
}

/// JPEG written at quality 95 so a balanced recompression has room to
/// shrink it.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    fs::write(path, high_quality_jpeg(width, height)).unwrap();
}

fn high_quality_jpeg(width: u32, height: u32) -> Vec<u8> {
    let rgb = gradient_image(width, height).to_rgb8();
    let mut cursor = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut cursor, 95);
    rgb.write_with_encoder(encoder).unwrap();
    cursor.into_inner()
}

pub fn write_jpeg_with_exif(path: &Path, width: u32, height: u32) {
    let buf = high_quality_jpeg(width, height);
    let mut jpeg = img_parts::jpeg::Jpeg::from_bytes(Bytes::from(buf)).unwrap();
    jpeg.set_exif(Some(Bytes::from_static(EXIF_STUB)));
    let mut tagged = Vec::new();
    jpeg.encoder().write_to(&mut tagged).unwrap();
    fs::write(path, tagged).unwrap();
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    let bytes = encode_image(&gradient_image(width, height), image::ImageFormat::Bmp);
    fs::write(path, bytes).unwrap();
}

pub fn write_tiff(path: &Path, width: u32, height: u32) {
    let bytes = encode_image(&gradient_image(width, height), image::ImageFormat::Tiff);
    fs::write(path, bytes).unwrap();
}

/// Build a nested directory tree with a mix of formats. Returns the
/// relative paths of every image written, sorted.
pub fn create_mixed_tree(root: &Path) -> Vec<PathBuf> {
    fs::create_dir_all(root.join("sub/deep")).unwrap();

    write_png(&root.join("one.png"), 32, 32);
    write_jpeg(&root.join("two.jpg"), 32, 32);
    write_bmp(&root.join("three.bmp"), 16, 16);
    write_png(&root.join("sub/four.png"), 24, 24);
    write_jpeg(&root.join("sub/five.jpg"), 24, 24);
    write_tiff(&root.join("sub/six.tiff"), 16, 16);
    write_png(&root.join("sub/deep/seven.png"), 20, 20);
    write_jpeg(&root.join("sub/deep/eight.jpg"), 20, 20);
    write_bmp(&root.join("sub/deep/nine.bmp"), 12, 12);
    write_png(&root.join("sub/deep/ten.png"), 12, 12);

    let mut paths: Vec<PathBuf> = [
        "one.png",
        "two.jpg",
        "three.bmp",
        "sub/four.png",
        "sub/five.jpg",
        "sub/six.tiff",
        "sub/deep/seven.png",
        "sub/deep/eight.jpg",
        "sub/deep/nine.bmp",
        "sub/deep/ten.png",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    paths.sort();
    paths
}

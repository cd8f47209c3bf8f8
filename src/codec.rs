/// Per-format encoders behind a single dispatch point
use crate::constants::{
    CHROMA_FULL_THRESHOLD, CHROMA_MEDIUM_THRESHOLD, LIBDEFLATER_HIGH_LEVEL,
    LIBDEFLATER_HIGH_THRESHOLD, LIBDEFLATER_LOW_LEVEL, MAX_QUALITY, OXIPNG_PRESET_FAST,
    OXIPNG_PRESET_THOROUGH, ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
use crate::error::{CompressionError, Result};
use crate::formats::ImageKind;
use crate::preset::PresetConfig;
use image::DynamicImage;
use mozjpeg::{ColorSpace, Compress, ScanMode};
use oxipng::Deflaters;
use std::io::Cursor;
use std::num::NonZeroU8;

/// Decode `input` as `source` and re-encode it as `target` with the
/// preset-resolved parameters.
///
/// BMP and TIFF have no tunable encoder, so a same-format job that would
/// grow the file returns the original bytes unchanged.
pub fn compress_bytes(
    input: &[u8],
    source: ImageKind,
    target: ImageKind,
    config: &PresetConfig,
) -> Result<Vec<u8>> {
    let image = image::load_from_memory_with_format(input, source.to_image_format())?;
    let encoded = match target {
        ImageKind::Png => compress_png(&image, config)?,
        ImageKind::Jpeg => compress_jpeg(&image, config)?,
        ImageKind::WebP => compress_webp(&image, config),
        ImageKind::Bmp | ImageKind::Tiff => encode_plain(&image, target)?,
    };

    if source == target
        && matches!(target, ImageKind::Bmp | ImageKind::Tiff)
        && encoded.len() >= input.len()
    {
        return Ok(input.to_vec());
    }

    Ok(encoded)
}

fn compress_png(image: &DynamicImage, config: &PresetConfig) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    image.write_to(&mut Cursor::new(&mut raw), image::ImageFormat::Png)?;

    let preset = if config.optimize {
        OXIPNG_PRESET_THOROUGH
    } else {
        OXIPNG_PRESET_FAST
    };
    let mut options = oxipng::Options::from_preset(preset);
    options.deflate = select_deflater(config);
    if config.strip_metadata {
        options.strip = oxipng::StripChunks::Safe;
    }

    oxipng::optimize_from_memory(&raw, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

fn select_deflater(config: &PresetConfig) -> Deflaters {
    if config.quality >= ZOPFLI_QUALITY_THRESHOLD && config.optimize {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap(),
        }
    } else if config.quality >= LIBDEFLATER_HIGH_THRESHOLD {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    }
}

fn compress_jpeg(image: &DynamicImage, config: &PresetConfig) -> Result<Vec<u8>> {
    let rgb = flatten_to_rgb(image);
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let mut compress = Compress::new(ColorSpace::JCS_RGB);
    compress.set_size(width, height);
    compress.set_quality(config.quality as f32);
    if config.progressive {
        compress.set_progressive_mode();
        compress.set_scan_optimization_mode(ScanMode::AllComponentsTogether);
    }
    if config.optimize {
        compress.set_optimize_coding(true);
        compress.set_optimize_scans(true);
    }
    let sampling = chroma_sampling(config.quality);
    compress.set_chroma_sampling_pixel_sizes(sampling, sampling);

    let mut writer = compress
        .start_compress(Vec::new())
        .map_err(|e| CompressionError::JpegEncoding(e.to_string()))?;
    writer
        .write_scanlines(rgb.as_raw())
        .map_err(|e| CompressionError::JpegEncoding(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| CompressionError::JpegEncoding(e.to_string()))
}

/// Chroma subsampling tier for the requested quality.
/// 4:4:4 for high quality, 4:2:2 for medium, 4:2:0 otherwise.
fn chroma_sampling(quality: u8) -> (u8, u8) {
    if quality >= CHROMA_FULL_THRESHOLD {
        (1, 1)
    } else if quality >= CHROMA_MEDIUM_THRESHOLD {
        (2, 1)
    } else {
        (2, 2)
    }
}

/// JPEG has no alpha channel. Composite transparent pixels over white,
/// matching what most viewers show for the source image.
fn flatten_to_rgb(image: &DynamicImage) -> image::RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        _ => {
            let rgba = image.to_rgba8();
            let mut rgb = image::RgbImage::new(rgba.width(), rgba.height());
            for (out, px) in rgb.pixels_mut().zip(rgba.pixels()) {
                let alpha = px[3] as u16;
                for channel in 0..3 {
                    out[channel] =
                        ((px[channel] as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
                }
            }
            rgb
        }
    }
}

fn compress_webp(image: &DynamicImage, config: &PresetConfig) -> Vec<u8> {
    let rgba = image.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let encoded = if config.quality >= MAX_QUALITY {
        encoder.encode_lossless()
    } else {
        encoder.encode(config.quality as f32)
    };
    encoded.to_vec()
}

fn encode_plain(image: &DynamicImage, target: ImageKind) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), target.to_image_format())?;
    Ok(buf)
}

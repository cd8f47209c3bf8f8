pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const FAST_PRESET_QUALITY: u8 = 60;
pub const BALANCED_PRESET_QUALITY: u8 = 80;
pub const QUALITY_PRESET_QUALITY: u8 = 95;

pub const OXIPNG_PRESET_THOROUGH: u8 = 4;
pub const OXIPNG_PRESET_FAST: u8 = 2;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const LIBDEFLATER_HIGH_THRESHOLD: u8 = 70;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

// Chroma subsampling tiers for JPEG: 4:4:4 at or above the full
// threshold, 4:2:2 at or above the medium one, 4:2:0 below.
pub const CHROMA_FULL_THRESHOLD: u8 = 90;
pub const CHROMA_MEDIUM_THRESHOLD: u8 = 75;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
pub const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
pub const RIFF_SIGNATURE: [u8; 4] = *b"RIFF";
pub const WEBP_FOURCC: [u8; 4] = *b"WEBP";
pub const BMP_SIGNATURE: [u8; 2] = *b"BM";
pub const TIFF_LE_SIGNATURE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
pub const TIFF_BE_SIGNATURE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];
// Longest signature we probe for is the 12-byte RIFF/WEBP header.
pub const SIGNATURE_PROBE_LEN: usize = 12;

pub const DEFAULT_OUTPUT_PREFIX: &str = "compressed_";
pub const DEFAULT_BATCH_OUTPUT_DIR: &str = "compressed";

// Keep this much memory free when sizing the worker pool.
pub const MIN_AVAILABLE_MEMORY_MIB: u64 = 512;

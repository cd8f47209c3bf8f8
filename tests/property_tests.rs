use imgpress::error::CompressionError;
use imgpress::formats::{is_image_file, ImageKind};
use imgpress::job::{compression_ratio, CompressionJob, CompressionResult};
use imgpress::output::batch_output_path;
use imgpress::preset::{Preset, PresetConfig};
use imgpress::session::BatchSession;
use proptest::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

proptest! {
    #[test]
    fn preset_resolve_accepts_valid_quality(quality in 1u8..=100u8) {
        let config = PresetConfig::resolve(None, Some(quality), false, false, false).unwrap();
        assert_eq!(config.quality, quality);
    }

    #[test]
    fn preset_resolve_rejects_out_of_range(quality in 0u8..=255u8) {
        let result = PresetConfig::resolve(None, Some(quality), false, false, false);
        if (1..=100).contains(&quality) {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(CompressionError::InvalidQuality(_))));
        }
    }

    #[test]
    fn known_preset_names_resolve(
        name in prop::sample::select(&["fast", "balanced", "quality"][..])
    ) {
        let config = PresetConfig::resolve(Some(name), None, false, false, false).unwrap();
        let preset = Preset::from_str(name).unwrap();
        assert_eq!(config.quality, preset.quality());
    }

    #[test]
    fn unknown_preset_names_are_rejected(name in "[a-z]{1,10}") {
        prop_assume!(!matches!(name.as_str(), "fast" | "balanced" | "quality"));
        let result = PresetConfig::resolve(Some(&name), None, false, false, false);
        assert!(matches!(result, Err(CompressionError::InvalidPreset(_))));
    }

    #[test]
    fn negative_flags_always_win(
        name in prop::sample::select(&["fast", "balanced", "quality"][..]),
        no_optimize in any::<bool>(),
        no_progressive in any::<bool>()
    ) {
        let preset = Preset::from_str(name).unwrap();
        let config =
            PresetConfig::resolve(Some(name), None, no_optimize, no_progressive, false).unwrap();
        assert_eq!(config.optimize, preset.optimize() && !no_optimize);
        assert_eq!(config.progressive, preset.progressive() && !no_progressive);
    }

    #[test]
    fn signature_detection_survives_trailing_bytes(
        tail in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        png.extend_from_slice(&tail);
        assert_eq!(ImageKind::from_signature(&png), Some(ImageKind::Png));

        let mut jpeg = vec![0xFF, 0xD8, 0xFF];
        jpeg.extend_from_slice(&tail);
        assert_eq!(ImageKind::from_signature(&jpeg), Some(ImageKind::Jpeg));

        let mut webp = b"RIFF\x10\x20\x30\x40WEBP".to_vec();
        webp.extend_from_slice(&tail);
        assert_eq!(ImageKind::from_signature(&webp), Some(ImageKind::WebP));
    }

    #[test]
    fn extension_detection_matches_supported_set(
        extension in prop::sample::select(
            &["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif", "gif", "txt", "pdf"][..]
        )
    ) {
        let filename = format!("test.{}", extension);
        let expected = matches!(
            extension,
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tiff" | "tif"
        );
        assert_eq!(is_image_file(Path::new(&filename)), expected);
    }

    #[test]
    fn batch_outputs_mirror_relative_paths(
        relative in "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.png"
    ) {
        let input_root = Path::new("/photos/in");
        let output_root = Path::new("/photos/out");
        let source = input_root.join(&relative);
        let output = batch_output_path(
            &source,
            input_root,
            output_root,
            ImageKind::Png,
            ImageKind::Png,
        );
        assert_eq!(output, output_root.join(&relative));
    }

    #[test]
    fn compression_ratio_is_bounded(
        original in 1u64..=u32::MAX as u64,
        compressed in 0u64..=u32::MAX as u64
    ) {
        let ratio = compression_ratio(original, compressed);
        assert!(ratio <= 100.0);
        if compressed <= original {
            assert!(ratio >= 0.0);
        } else {
            assert!(ratio < 0.0);
        }
    }

    #[test]
    fn session_totals_are_commutative(
        entries in prop::collection::vec((0usize..3, 1u64..100_000u64, 1u64..100_000u64), 0..20)
    ) {
        let results: Vec<CompressionResult> = entries
            .iter()
            .map(|&(status, original, compressed)| sample_result(status, original, compressed))
            .collect();

        let mut forward = BatchSession::new();
        for result in &results {
            forward.record(result);
        }
        let mut reverse = BatchSession::new();
        for result in results.iter().rev() {
            reverse.record(result);
        }
        assert_eq!(forward.snapshot(), reverse.snapshot());
    }
}

fn sample_result(status: usize, original: u64, compressed: u64) -> CompressionResult {
    let job = CompressionJob {
        source: PathBuf::from("a.png"),
        source_kind: ImageKind::Png,
        target_kind: ImageKind::Png,
        output: PathBuf::from("out/a.png"),
        config: PresetConfig::default(),
        overwrite: false,
    };
    match status {
        0 => CompressionResult::success(&job, original, compressed, Vec::new(), Duration::ZERO),
        1 => CompressionResult::skipped(&job, Duration::ZERO),
        _ => {
            let err = CompressionError::UnsupportedFormat("x".to_string());
            CompressionResult::failed(&job, &err, Duration::ZERO)
        }
    }
}

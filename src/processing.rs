/// Single-job execution pipeline
use crate::error::{CompressionError, Result};
use crate::formats::{self, ImageKind};
use crate::job::{CompressionJob, CompressionResult, JobStatus};
use crate::metadata::{self, MetadataBundle};
use crate::preset::PresetConfig;
use crate::session::format_file_size;
use crate::{codec, info, logger, output, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Resolve formats and the output path for a single-file invocation.
pub fn plan_single_job(
    input: PathBuf,
    output: Option<PathBuf>,
    config: PresetConfig,
    target: Option<ImageKind>,
    overwrite: bool,
) -> Result<CompressionJob> {
    if !input.exists() {
        return Err(CompressionError::FileNotFound(input));
    }
    let source_kind = formats::detect_kind(&input)?;
    let target_kind = target.unwrap_or(source_kind);
    let output = match output {
        Some(path) => path,
        None => output::default_single_output(&input, source_kind, target_kind),
    };
    Ok(CompressionJob {
        source: input,
        source_kind,
        target_kind,
        output,
        config,
        overwrite,
    })
}

/// Run one job to completion. Never panics and never returns early with
/// a partial output file; every outcome is captured in the result.
pub fn execute_job(job: &CompressionJob) -> CompressionResult {
    let started = Instant::now();

    if job.output.exists() && !job.overwrite {
        return CompressionResult::skipped(job, started.elapsed());
    }

    match run_pipeline(job) {
        Ok((original_size, compressed_size, warnings)) => CompressionResult::success(
            job,
            original_size,
            compressed_size,
            warnings,
            started.elapsed(),
        ),
        Err(error) => CompressionResult::failed(job, &error, started.elapsed()),
    }
}

fn run_pipeline(job: &CompressionJob) -> Result<(u64, u64, Vec<String>)> {
    let input = fs::read(&job.source)?;
    let original_size = input.len() as u64;
    let mut warnings = Vec::new();

    let bundle = if job.config.strip_metadata {
        MetadataBundle::default()
    } else {
        match metadata::extract(&input, job.source_kind) {
            Ok(bundle) => bundle,
            Err(e) => {
                warnings.push(format!("metadata extraction failed: {e}"));
                MetadataBundle::default()
            }
        }
    };

    let compressed = codec::compress_bytes(&input, job.source_kind, job.target_kind, &job.config)?;

    let finished = if bundle.is_empty() {
        compressed
    } else {
        if bundle.xmp.is_some() && job.target_kind != ImageKind::Jpeg {
            warnings.push(format!(
                "XMP metadata is not carried into {} output",
                job.target_kind
            ));
        }
        match metadata::apply(&compressed, job.target_kind, &bundle) {
            Ok(bytes) => bytes,
            Err(e) => {
                warnings.push(format!("metadata was not preserved: {e}"));
                compressed
            }
        }
    };

    output::write_atomic(&job.output, &finished)?;
    Ok((original_size, finished.len() as u64, warnings))
}

/// Compress one file with spinner and size report, as invoked from the CLI.
pub fn compress_single(job: &CompressionJob) -> CompressionResult {
    info!("🗜️  Compressing image: {:?}", job.source);
    info!("📁 Output: {:?}", job.output);
    if job.is_conversion() {
        info!("🔄 Converting {} -> {}", job.source_kind, job.target_kind);
    }

    let spinner = create_spinner("Compressing...");
    let result = execute_job(job);

    match result.status {
        JobStatus::Success => {
            spinner.finish_with_message("✅ Compression complete");
            report_warnings(&result.warnings, &job.source);
            info!(
                "📊 Original size: {}",
                format_file_size(result.original_size)
            );
            info!(
                "📈 Compressed size: {}",
                format_file_size(result.compressed_size)
            );
            let ratio = result.ratio();
            info!("🎯 Compression ratio: {:.1}%", ratio);
            if ratio > 0.0 {
                info!("✅ Successfully reduced file size by {:.1}%", ratio);
            } else {
                info!("⚠️  File size increased by {:.1}%", ratio.abs());
            }
        }
        JobStatus::Skipped => {
            spinner.finish_and_clear();
            info!(
                "⏭️  Output already exists, skipping: {:?} (use --overwrite to replace)",
                job.output
            );
        }
        JobStatus::Failed => {
            spinner.finish_and_clear();
        }
    }

    result
}

pub fn report_warnings(warnings: &[String], source: &Path) {
    for warning in warnings {
        warn!("{:?}: {}", source, warning);
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    if logger::is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb
}

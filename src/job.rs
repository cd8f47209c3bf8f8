/// Unit of work and its outcome
use crate::error::CompressionError;
use crate::formats::ImageKind;
use crate::preset::PresetConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One source file scheduled for compression.
///
/// Built once during planning, then handed to a worker and consumed.
/// Source files are never modified; every job writes to its own output path.
#[derive(Debug, Clone)]
pub struct CompressionJob {
    pub source: PathBuf,
    pub source_kind: ImageKind,
    pub target_kind: ImageKind,
    pub output: PathBuf,
    pub config: PresetConfig,
    pub overwrite: bool,
}

impl CompressionJob {
    pub fn is_conversion(&self) -> bool {
        self.source_kind != self.target_kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    Skipped,
    Failed,
}

/// The outcome of exactly one job.
///
/// Failures carry the error text; metadata trouble lands in `warnings`
/// and never turns a success into a failure.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub status: JobStatus,
    pub original_size: u64,
    pub compressed_size: u64,
    pub elapsed: Duration,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl CompressionResult {
    pub fn success(
        job: &CompressionJob,
        original_size: u64,
        compressed_size: u64,
        warnings: Vec<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            source: job.source.clone(),
            output: job.output.clone(),
            status: JobStatus::Success,
            original_size,
            compressed_size,
            elapsed,
            error: None,
            warnings,
        }
    }

    pub fn skipped(job: &CompressionJob, elapsed: Duration) -> Self {
        Self {
            source: job.source.clone(),
            output: job.output.clone(),
            status: JobStatus::Skipped,
            original_size: 0,
            compressed_size: 0,
            elapsed,
            error: None,
            warnings: Vec::new(),
        }
    }

    pub fn failed(job: &CompressionJob, error: &CompressionError, elapsed: Duration) -> Self {
        Self {
            source: job.source.clone(),
            output: job.output.clone(),
            status: JobStatus::Failed,
            original_size: 0,
            compressed_size: 0,
            elapsed,
            error: Some(error.to_string()),
            warnings: Vec::new(),
        }
    }

    /// A failure recorded before a job could be built, e.g. when format
    /// detection rejects the file.
    pub fn failed_for_path(source: &Path, error: &CompressionError) -> Self {
        Self {
            source: source.to_path_buf(),
            output: PathBuf::new(),
            status: JobStatus::Failed,
            original_size: 0,
            compressed_size: 0,
            elapsed: Duration::ZERO,
            error: Some(error.to_string()),
            warnings: Vec::new(),
        }
    }

    /// Size reduction as a percentage. Positive means the output is smaller.
    pub fn ratio(&self) -> f64 {
        compression_ratio(self.original_size, self.compressed_size)
    }

    pub fn is_failure(&self) -> bool {
        self.status == JobStatus::Failed
    }
}

pub fn compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

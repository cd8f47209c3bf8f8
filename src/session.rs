/// Batch accounting and summary output
///
/// All totals flow through [`BatchSession::record`] on one thread, so the
/// final numbers do not depend on worker count or completion order.
use crate::info;
use crate::job::{compression_ratio, CompressionResult, JobStatus};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
}

impl SessionSnapshot {
    pub fn total_jobs(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Overall size reduction across all successful jobs, as a percentage.
    pub fn reduction_percent(&self) -> f64 {
        compression_ratio(self.total_original_bytes, self.total_compressed_bytes)
    }
}

#[derive(Debug, Default)]
pub struct BatchSession {
    snapshot: SessionSnapshot,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &CompressionResult) {
        match result.status {
            JobStatus::Success => {
                self.snapshot.processed += 1;
                self.snapshot.total_original_bytes += result.original_size;
                self.snapshot.total_compressed_bytes += result.compressed_size;
            }
            JobStatus::Skipped => self.snapshot.skipped += 1,
            JobStatus::Failed => self.snapshot.failed += 1,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot
    }

    pub fn has_failures(&self) -> bool {
        self.snapshot.failed > 0
    }

    pub fn print_summary(&self, elapsed: Duration) {
        let s = self.snapshot;
        info!("\n📊 Batch Compression Summary:");
        info!("  📁 Files compressed: {}", s.processed);
        if s.skipped > 0 {
            info!("  ⏭️  Files skipped: {}", s.skipped);
        }
        info!(
            "  📊 Total original size: {}",
            format_file_size(s.total_original_bytes)
        );
        info!(
            "  📊 Total compressed size: {}",
            format_file_size(s.total_compressed_bytes)
        );
        info!(
            "  🎯 Overall compression ratio: {:.1}%",
            s.reduction_percent()
        );
        info!("  ⏱️  Total time: {:.2}s", elapsed.as_secs_f64());
        if elapsed.as_secs_f64() > 0.0 && s.processed > 0 {
            info!(
                "  ⚡ Average speed: {:.2} files/second",
                s.processed as f64 / elapsed.as_secs_f64()
            );
        }
        if s.failed > 0 {
            info!("  ⚠️  Failed files: {}", s.failed);
        }
    }
}

/// Format file size in human-readable form, e.g. "1.5 KB", "3.2 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;
    use crate::formats::ImageKind;
    use crate::job::CompressionJob;
    use crate::preset::PresetConfig;
    use std::path::PathBuf;

    fn job(name: &str) -> CompressionJob {
        CompressionJob {
            source: PathBuf::from(name),
            source_kind: ImageKind::Png,
            target_kind: ImageKind::Png,
            output: PathBuf::from(format!("out/{name}")),
            config: PresetConfig::default(),
            overwrite: false,
        }
    }

    fn results() -> Vec<CompressionResult> {
        let err = CompressionError::UnsupportedFormat("x".to_string());
        vec![
            CompressionResult::success(&job("a.png"), 1000, 600, Vec::new(), Duration::ZERO),
            CompressionResult::success(&job("b.png"), 500, 400, Vec::new(), Duration::ZERO),
            CompressionResult::skipped(&job("c.png"), Duration::ZERO),
            CompressionResult::failed(&job("d.png"), &err, Duration::ZERO),
        ]
    }

    #[test]
    fn test_record_accumulates_by_status() {
        let mut session = BatchSession::new();
        for result in results() {
            session.record(&result);
        }
        let s = session.snapshot();
        assert_eq!(s.processed, 2);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.failed, 1);
        assert_eq!(s.total_jobs(), 4);
        assert_eq!(s.total_original_bytes, 1500);
        assert_eq!(s.total_compressed_bytes, 1000);
        assert!(session.has_failures());
    }

    #[test]
    fn test_totals_are_order_independent() {
        let mut forward = BatchSession::new();
        for result in results() {
            forward.record(&result);
        }
        let mut reverse = BatchSession::new();
        for result in results().into_iter().rev() {
            reverse.record(&result);
        }
        assert_eq!(forward.snapshot(), reverse.snapshot());
    }

    #[test]
    fn test_reduction_percent() {
        let snapshot = SessionSnapshot {
            processed: 1,
            total_original_bytes: 2000,
            total_compressed_bytes: 500,
            ..SessionSnapshot::default()
        };
        assert_eq!(snapshot.reduction_percent(), 75.0);
        assert_eq!(SessionSnapshot::default().reduction_percent(), 0.0);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.0 GB");
    }
}

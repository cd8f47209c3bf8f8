/// Directory walking, job planning and the bounded worker pool
use crate::constants::{DEFAULT_BATCH_OUTPUT_DIR, MIN_AVAILABLE_MEMORY_MIB};
use crate::error::{CompressionError, Result};
use crate::formats::{self, ImageKind};
use crate::job::{CompressionJob, CompressionResult, JobStatus};
use crate::preset::PresetConfig;
use crate::processing::{self, execute_job};
use crate::session::{BatchSession, SessionSnapshot};
use crate::{error, info, logger, verbose, warn};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub config: PresetConfig,
    pub target: Option<ImageKind>,
    pub overwrite: bool,
    pub recursive: bool,
    pub workers: Option<usize>,
}

/// Collect candidate image files from a file path, a directory or a glob
/// pattern. Results are sorted so enumeration is deterministic.
///
/// Unreadable directory entries are reported and skipped; a literal path
/// that does not exist is an error.
pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        image_files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path).follow_links(true)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        // The root itself may be hidden; only entries below it are filtered.
        let entries = walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden_name(e.file_name()));
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && formats::is_image_file(path) {
                        image_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                }
            }
        }
    } else if is_glob_pattern(input) {
        let pattern =
            glob(input).map_err(|e| CompressionError::InvalidPattern(e.to_string()))?;
        for entry in pattern {
            match entry {
                Ok(path) => {
                    if path.is_file() && formats::is_image_file(&path) {
                        image_files.push(path);
                    }
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                }
            }
        }
    } else {
        return Err(CompressionError::FileNotFound(input_path.to_path_buf()));
    }

    image_files.sort();
    image_files.dedup();
    Ok(image_files)
}

fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Turn collected paths into jobs. Files whose format cannot be determined
/// become failed results instead of aborting the batch.
pub fn plan_jobs(
    files: Vec<PathBuf>,
    input_root: &Path,
    output_root: &Path,
    options: &BatchOptions,
) -> (Vec<CompressionJob>, Vec<CompressionResult>) {
    let mut jobs = Vec::with_capacity(files.len());
    let mut failures = Vec::new();

    for source in files {
        match formats::detect_kind(&source) {
            Ok(source_kind) => {
                let target_kind = options.target.unwrap_or(source_kind);
                let output = crate::output::batch_output_path(
                    &source,
                    input_root,
                    output_root,
                    source_kind,
                    target_kind,
                );
                jobs.push(CompressionJob {
                    source,
                    source_kind,
                    target_kind,
                    output,
                    config: options.config,
                    overwrite: options.overwrite,
                });
            }
            Err(e) => failures.push(CompressionResult::failed_for_path(&source, &e)),
        }
    }

    (jobs, failures)
}

/// Estimated decode memory in MiB. Compressed formats expand well beyond
/// their file size once decoded.
fn estimate_job_memory_mib(job: &CompressionJob) -> f64 {
    let file_mib = fs::metadata(&job.source)
        .map(|m| m.len())
        .unwrap_or(0) as f64
        / (1024.0 * 1024.0);
    let multiplier = match job.source_kind {
        ImageKind::Jpeg => 4.0,
        ImageKind::Png => 3.0,
        ImageKind::WebP => 3.5,
        ImageKind::Bmp | ImageKind::Tiff => 1.2,
    };
    file_mib * multiplier
}

/// Bound the worker count by the request, the job count and available
/// memory, leaving headroom for the rest of the system.
pub fn effective_worker_count(requested: Option<usize>, jobs: &[CompressionJob]) -> usize {
    let baseline = requested
        .unwrap_or_else(num_cpus::get)
        .max(1)
        .min(jobs.len().max(1));

    let peak_mib = jobs
        .iter()
        .map(estimate_job_memory_mib)
        .fold(0.0, f64::max)
        .max(1.0);

    let mut sys =
        System::new_with_specifics(RefreshKind::new().with_memory(MemoryRefreshKind::new()));
    sys.refresh_memory();
    let available_mib = sys.available_memory() / (1024 * 1024);
    let headroom_mib = available_mib.saturating_sub(MIN_AVAILABLE_MEMORY_MIB) as f64;

    ((headroom_mib / peak_mib) as usize).clamp(1, baseline)
}

/// Compress every image under `input` into a mirrored output tree.
///
/// Workers send each finished result over a channel; this thread is the
/// only one that touches the session counters and the progress bar, so the
/// summary is identical for any worker count.
pub fn run_batch(
    input: &str,
    output: Option<PathBuf>,
    options: &BatchOptions,
    cancel: Arc<AtomicBool>,
) -> Result<SessionSnapshot> {
    info!("🚀 Starting batch compression...");
    let start_time = Instant::now();

    let input_path = Path::new(input);
    let input_root = if input_path.is_dir() {
        input_path.to_path_buf()
    } else {
        input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };
    let output_root = output.unwrap_or_else(|| {
        if input_path.is_dir() {
            input_path.join(DEFAULT_BATCH_OUTPUT_DIR)
        } else {
            PathBuf::from(DEFAULT_BATCH_OUTPUT_DIR)
        }
    });

    info!("📁 Input: {}", input);
    info!("📁 Output: {:?}", output_root);

    let mut files = collect_image_files(input, options.recursive)?;

    // A previous run's output tree may sit inside the input directory.
    files.retain(|path| !path.starts_with(&output_root));

    if files.is_empty() {
        warn!("No image files found in the input path");
        return Ok(SessionSnapshot::default());
    }

    info!("📊 Found {} image files to process", files.len());

    let (jobs, prefailures) = plan_jobs(files, &input_root, &output_root, options);

    let mut session = BatchSession::new();
    for failure in &prefailures {
        if let Some(message) = &failure.error {
            error!("Failed to process {:?}: {}", failure.source, message);
        }
        session.record(failure);
    }

    if jobs.is_empty() {
        session.print_summary(start_time.elapsed());
        return Ok(session.snapshot());
    }

    let workers = effective_worker_count(options.workers, &jobs);
    info!("⚙️  Using {} parallel threads for processing", workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| CompressionError::ThreadPool(e.to_string()))?;

    let progress = if logger::is_quiet() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(jobs.len() as u64);
        bar.set_style(ProgressStyle::default_bar());
        bar
    };

    let (tx, rx) = mpsc::channel::<CompressionResult>();
    let worker_cancel = Arc::clone(&cancel);
    pool.spawn(move || {
        jobs.into_par_iter().for_each_with(tx, |tx, job| {
            if worker_cancel.load(Ordering::Relaxed) {
                return;
            }
            let _ = tx.send(execute_job(&job));
        });
    });

    let mut cancel_reported = false;
    for result in rx {
        if cancel.load(Ordering::Relaxed) && !cancel_reported {
            warn!("🛑 Cancellation requested, finishing in-flight files");
            cancel_reported = true;
        }
        match result.status {
            JobStatus::Failed => {
                if let Some(message) = &result.error {
                    error!("Failed to process {:?}: {}", result.source, message);
                }
            }
            JobStatus::Skipped => {
                verbose!("Output already exists, skipping {:?}", result.output);
            }
            JobStatus::Success => {
                verbose!(
                    "Compressed {:?} ({:.1}% smaller)",
                    result.source,
                    result.ratio()
                );
            }
        }
        processing::report_warnings(&result.warnings, &result.source);
        session.record(&result);
        progress.inc(1);
    }

    progress.finish_with_message("✅ Batch compression complete");
    session.print_summary(start_time.elapsed());

    Ok(session.snapshot())
}

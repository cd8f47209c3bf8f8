pub mod batch;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod formats;
pub mod job;
pub mod logger;
pub mod metadata;
pub mod output;
pub mod preset;
pub mod processing;
pub mod session;

pub use batch::{collect_image_files, effective_worker_count, plan_jobs, run_batch, BatchOptions};
pub use codec::compress_bytes;
pub use error::{CompressionError, Result};
pub use formats::{detect_kind, is_image_file, ImageKind};
pub use job::{compression_ratio, CompressionJob, CompressionResult, JobStatus};
pub use metadata::MetadataBundle;
pub use preset::{Preset, PresetConfig};
pub use processing::{compress_single, execute_job, plan_single_job};
pub use session::{format_file_size, BatchSession, SessionSnapshot};

use clap::Parser;
use imgpress::cli::{Args, Commands};
use imgpress::error::Result;
use imgpress::formats::ImageKind;
use imgpress::preset::PresetConfig;
use imgpress::{batch, logger, processing};
use rayon::ThreadPoolBuilder;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    }) {
        imgpress::warn!("Could not install interrupt handler: {}", e);
    }

    match run(args, cancel) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            imgpress::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args, cancel: Arc<AtomicBool>) -> Result<bool> {
    match args.command {
        Commands::Compress {
            input,
            output,
            preset,
            quality,
            format,
            no_optimize,
            no_progressive,
            strip_metadata,
            overwrite,
            threads,
        } => {
            setup_thread_pool(threads);
            let config = PresetConfig::resolve(
                preset.as_deref(),
                quality,
                no_optimize,
                no_progressive,
                strip_metadata,
            )?;
            let target = parse_target(format.as_deref())?;
            let job = processing::plan_single_job(input, output, config, target, overwrite)?;
            let result = processing::compress_single(&job);
            if let Some(message) = &result.error {
                imgpress::error!("Failed to process {:?}: {}", result.source, message);
            }
            Ok(!result.is_failure())
        }
        Commands::Batch {
            input,
            output,
            preset,
            quality,
            format,
            no_optimize,
            no_progressive,
            strip_metadata,
            overwrite,
            threads,
            recursive,
        } => {
            let config = PresetConfig::resolve(
                preset.as_deref(),
                quality,
                no_optimize,
                no_progressive,
                strip_metadata,
            )?;
            let target = parse_target(format.as_deref())?;
            let options = batch::BatchOptions {
                config,
                target,
                overwrite,
                recursive,
                workers: threads,
            };
            let snapshot = batch::run_batch(&input, output, &options, Arc::clone(&cancel))?;
            if cancel.load(Ordering::Relaxed) {
                return Ok(false);
            }
            Ok(snapshot.failed == 0)
        }
    }
}

fn parse_target(format: Option<&str>) -> Result<Option<ImageKind>> {
    format.map(|name| name.parse::<ImageKind>()).transpose()
}

fn setup_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            imgpress::warn!("Failed to set thread pool size: {}", e);
        }
    }
}

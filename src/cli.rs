use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "imgpress",
    about = "A fast image compression tool with format-aware codecs and presets",
    long_about = "imgpress is a Rust-based image compression tool that reduces file sizes while maintaining quality. \
                  It supports JPEG, PNG, WebP, BMP and TIFF inputs with signature-based format detection, \
                  preset-driven compression parameters, metadata preservation, and parallel batch processing.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    imgpress compress photo.jpg -p quality\n  \
    imgpress compress photo.png out.webp -f webp\n  \
    imgpress batch ./photos -r -p fast -j 4\n  \
    imgpress batch \"./photos/*.png\" -o ./compressed --overwrite"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        help = "Suppress progress and informational output"
    )]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single image file",
        long_about = "Compress a single image file with preset or per-flag control over quality. \
                      The real format is detected from the file signature, so misnamed files \
                      are handled correctly. Without an output path the result is written next \
                      to the input as compressed_<name>."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path (default: compressed_<name> beside the input)")]
        output: Option<PathBuf>,

        #[arg(
            short = 'p',
            long,
            help = "Compression preset (fast, balanced, quality; default: balanced)",
            long_help = "Named parameter bundle. fast: quality 60, no extra optimization passes. \
                         balanced: quality 80 with optimization and progressive encoding. \
                         quality: quality 95 with all optimization passes enabled."
        )]
        preset: Option<String>,

        #[arg(
            short = 'q',
            long,
            help = "Compression quality (1-100, overrides the preset value)",
            long_help = "Compression quality from 1 (lowest) to 100 (highest). \
                         For PNG: >=90 uses Zopfli, >=70 uses high compression, <70 uses standard compression. \
                         For WebP: 100 selects lossless encoding."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'f',
            long,
            help = "Output format (jpeg, png, webp, bmp, tiff)",
            long_help = "Convert to the specified format instead of re-encoding in place. \
                         Supported formats: jpeg/jpg, png, webp, bmp, tiff/tif"
        )]
        format: Option<String>,

        #[arg(
            long,
            help = "Disable extra optimization passes",
            long_help = "Skip the slower optimization passes (Huffman table optimization for JPEG, \
                         thorough filter search for PNG) even when the preset enables them."
        )]
        no_optimize: bool,

        #[arg(
            long,
            help = "Disable progressive JPEG encoding",
            long_help = "Emit baseline JPEG output even when the preset enables progressive encoding."
        )]
        no_progressive: bool,

        #[arg(
            long,
            help = "Drop EXIF, XMP and ICC metadata from the output",
            long_help = "By default metadata is carried over from the source image on a best-effort \
                         basis. This flag drops it instead, which usually saves a few KB."
        )]
        strip_metadata: bool,

        #[arg(
            long,
            help = "Replace the output file if it already exists",
            long_help = "Without this flag an existing output file is left untouched and the job \
                         is reported as skipped."
        )]
        overwrite: bool,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel threads (default: auto)",
            long_help = "Number of threads for the internal codec thread pool. \
                         If not specified, uses number of CPU cores."
        )]
        threads: Option<usize>,
    },

    #[command(
        about = "Compress multiple images in parallel",
        long_about = "Process multiple images in parallel with batch operations. \
                      Supports directory traversal, glob patterns, and recursive processing. \
                      The output directory mirrors the input tree."
    )]
    Batch {
        #[arg(
            help = "Input directory, file path, or glob pattern",
            long_help = "Input can be a directory path, a single file, or a glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.png'"
        )]
        input: String,

        #[arg(
            short = 'o',
            long,
            help = "Output directory (default: <input>/compressed)",
            long_help = "Directory that receives the compressed tree. Created if missing. \
                         Defaults to a 'compressed' directory inside the input directory."
        )]
        output: Option<PathBuf>,

        #[arg(
            short = 'p',
            long,
            help = "Compression preset (fast, balanced, quality; default: balanced)",
            long_help = "Named parameter bundle applied to every file. \
                         Same presets as single-file compress."
        )]
        preset: Option<String>,

        #[arg(
            short = 'q',
            long,
            help = "Compression quality (1-100, overrides the preset value)",
            long_help = "Compression quality applied to all images. \
                         Same quality rules as single compress apply."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'f',
            long,
            help = "Output format (jpeg, png, webp, bmp, tiff)",
            long_help = "Convert all images to the specified format. \
                         If not specified, each file keeps its original format."
        )]
        format: Option<String>,

        #[arg(long, help = "Disable extra optimization passes")]
        no_optimize: bool,

        #[arg(long, help = "Disable progressive JPEG encoding")]
        no_progressive: bool,

        #[arg(long, help = "Drop EXIF, XMP and ICC metadata from the outputs")]
        strip_metadata: bool,

        #[arg(
            long,
            help = "Replace output files that already exist",
            long_help = "Without this flag existing output files are left untouched and those \
                         jobs are reported as skipped."
        )]
        overwrite: bool,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel workers (default: auto)",
            long_help = "Number of worker threads for parallel batch processing. \
                         Capped by the job count and available memory."
        )]
        threads: Option<usize>,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively",
            long_help = "Recursively process all subdirectories when input is a directory. \
                         Symbolic links are followed; hidden files and directories are skipped."
        )]
        recursive: bool,
    },
}

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use sky_gradient::{
    default_output_path, process_directory, process_file, subtract_file, OutputMode,
    ProcessOptions, ProcessResult,
};

#[derive(Parser)]
#[command(
    name = "sky-gradient",
    about = "Synthesize a sky background gradient from starless boundary points",
    version,
    after_help = "Simple usage: sky-gradient <image>  (writes {name}_gradient.{ext})\n\n\
                  Use --subtract to write the image with the gradient removed, or\n\
                  --gradient <file> to subtract an existing gradient image."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_gradient.{ext} or {name}_subtracted.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Intensity at or below which a pixel counts as sky background (0-255)
    #[arg(short, long, default_value = "128")]
    threshold: u8,

    /// Number of edge columns scanned from each side
    #[arg(short = 'n', long, default_value = "70")]
    columns: u32,

    /// Write the input with the synthesized gradient subtracted
    #[arg(short, long)]
    subtract: bool,

    /// Subtract this gradient image instead of synthesizing one
    #[arg(short, long, conflicts_with = "subtract")]
    gradient: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(opts: &ProcessOptions) {
    let level = if opts.verbose {
        "debug"
    } else if opts.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();

    if cli.columns == 0 {
        eprintln!("Error: --columns must be at least 1");
        process::exit(1);
    }

    let opts = ProcessOptions {
        threshold: cli.threshold,
        num_columns: cli.columns,
        mode: if cli.subtract || cli.gradient.is_some() {
            OutputMode::Subtract
        } else {
            OutputMode::Gradient
        },
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    init_logging(&opts);

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !opts.quiet && cli.gradient.is_none() {
        eprintln!(
            "Threshold: {}, edge columns: {}",
            opts.threshold, opts.num_columns
        );
        eprintln!();
    }

    let results = if input_path.is_dir() {
        if cli.gradient.is_some() {
            eprintln!("Error: --gradient only applies to a single input file");
            process::exit(1);
        }
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: sky-gradient <input_dir> -o <output_dir>");
            process::exit(1);
        };
        process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path, opts.mode),
        };
        match &cli.gradient {
            Some(g) => vec![subtract_file(input_path, Path::new(g), &output_path)],
            None => vec![process_file(input_path, &output_path, &opts)],
        }
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        match &result.points {
            Some(points) => eprintln!("[OK] {filename} ({points})"),
            None => eprintln!("[OK] {filename}"),
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ai_image_detect::{Detector, DetectorConfig, ErrorReport, FileReport};

#[derive(Parser)]
#[command(
    name = "ai-image-detect",
    about = "Estimate the probability that an image is AI-generated",
    version,
    after_help = "Simple usage: ai-image-detect <image>  (prints a JSON report)\n\n\
                  NOTE: Scores come from hand-tuned heuristics, not a trained model.\n\
                  Treat them as a hint, not forensic evidence."
)]
struct Cli {
    /// Input image file or directory
    input: PathBuf,

    /// JSON file overriding weights and thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the noise sampler for reproducible scores
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Enable debug logging (per-signal scores)
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = match &cli.config {
        Some(path) => match DetectorConfig::from_json_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: Failed to load config {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => DetectorConfig::default(),
    };

    let detector = match Detector::new(config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Fatal: Failed to initialize detector: {e}");
            process::exit(1);
        }
    };

    if !cli.input.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input.display());
        process::exit(1);
    }

    let (json, failed) = if cli.input.is_dir() {
        let results = detector.analyze_directory(&cli.input, cli.seed);
        let failed = results.iter().filter(|r| !r.success()).count();
        let values: serde_json::Result<Vec<_>> = results.iter().map(to_json).collect();
        (values.map(serde_json::Value::Array), failed)
    } else {
        let result = detector.analyze_file(&cli.input, cli.seed);
        let failed = usize::from(!result.success());
        (to_json(&result), failed)
    };
    let json = match json {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: Failed to serialize report: {e}");
            process::exit(1);
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Error: Failed to serialize report: {e}");
            process::exit(1);
        }
    }

    if failed > 0 {
        if !cli.quiet {
            eprintln!("[Summary] Failed: {failed}");
        }
        process::exit(1);
    }
}

fn to_json(result: &FileReport) -> serde_json::Result<serde_json::Value> {
    let mut value = match &result.report {
        Some(report) => serde_json::to_value(report)?,
        None => serde_json::to_value(ErrorReport::new(
            "Failed to process image",
            result.message.clone(),
        ))?,
    };
    if let serde_json::Value::Object(map) = &mut value {
        map.insert("file".to_string(), file_name(&result.path).into());
    }
    Ok(value)
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

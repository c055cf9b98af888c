//! Print the AI-generation report for a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example analyze_image -- input.jpg
//! ```

use std::env;
use std::process;

use ai_image_detect::Detector;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input>", args[0]);
        process::exit(1);
    }

    let detector = Detector::default();
    let result = detector.analyze_file(args[1].as_ref(), None);

    match &result.report {
        Some(report) => {
            println!("{}", report.message);
            for detail in &report.analysis.details {
                println!("  {:<18} {:>5.1}  {}", detail.label, detail.score, detail.verdict);
            }
            println!("Confidence: {}", report.confidence);
        }
        None => {
            eprintln!("Error: {}", result.message);
            process::exit(1);
        }
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use image_palette_wasm::{Config, PaletteExtractor};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Print the prominent colors of one or more images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input images (png, jpg, gif, bmp): paths, file:// or http(s):// URIs
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Sample every Nth pixel in both directions
    #[arg(short, long, default_value_t = 10)]
    precision: u32,

    /// Maximum number of colors to report per image
    #[arg(short = 'k', long, default_value_t = 5)]
    num_colors: usize,

    /// Show how many samples matched each color
    #[arg(long)]
    counts: bool,

    /// Emit a JSON document instead of plain text
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn setup_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let config = Config::new(args.precision, args.num_colors)?;
    let extractor = PaletteExtractor::new(config).context("initialising palette extractor")?;

    let mut reports = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let palette = extractor
            .extract_path(input)
            .with_context(|| format!("extracting colors from {}", input.display()))?;
        let ranked = palette.ranked();

        if args.json {
            let colors: Vec<_> = ranked
                .iter()
                .map(|c| {
                    if args.counts {
                        json!({ "hex": c.hex, "count": c.count })
                    } else {
                        json!(c.hex)
                    }
                })
                .collect();
            reports.push(json!({
                "path": input.display().to_string(),
                "samples": palette.sample_count(),
                "colors": colors,
            }));
        } else {
            let line: Vec<String> = ranked
                .iter()
                .map(|c| {
                    if args.counts {
                        format!("{} ({})", c.hex, c.count)
                    } else {
                        c.hex.to_string()
                    }
                })
                .collect();
            println!("{}: {}", input.display(), line.join(" "));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

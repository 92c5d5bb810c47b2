mod io;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use forkpix_bench::{Benchmark, BenchmarkConfig};
use forkpix_core::{ConvolutionMatrix, EFFECTS, Kernel};

/// Benchmark sequential vs fork-join pixel transforms on 1..=12 workers.
#[derive(Parser, Debug)]
#[command(name = "forkpix", version, about)]
struct Cli {
    /// Image file, or a directory of frames to process as one batch
    input: PathBuf,

    /// Effect to apply: grayscale, sepia, blur, edge-detection, sharpen
    #[arg(short, long, default_value = "grayscale", conflicts_with = "matrix")]
    effect: String,

    /// Custom convolution matrix, rows separated by ';' (e.g. "0,-1,0;-1,5,-1;0,-1,0")
    #[arg(short, long)]
    matrix: Option<String>,

    /// Largest row range a leaf task processes without splitting
    #[arg(short, long)]
    threshold: Option<u32>,

    /// Highest worker count in the sweep
    #[arg(short = 'w', long)]
    max_workers: Option<usize>,

    /// Resize input to WIDTHxHEIGHT before processing
    #[arg(long)]
    resize: Option<String>,

    /// JSON benchmark config; command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write sequential and parallel outputs as PNG into this directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn kernel(&self) -> Result<Kernel> {
        match &self.matrix {
            Some(text) => Ok(Kernel::Convolution(ConvolutionMatrix::parse(text)?)),
            None => self
                .effect
                .parse()
                .with_context(|| format!("expected one of: {}", EFFECTS.join(", "))),
        }
    }

    fn benchmark_config(&self) -> Result<BenchmarkConfig> {
        let mut config = match &self.config {
            Some(path) => BenchmarkConfig::load(path)?,
            None => BenchmarkConfig::default(),
        };
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let kernel = cli.kernel()?;
    let config = cli.benchmark_config()?;
    let size = cli.resize.as_deref().map(io::parse_size).transpose()?;
    let bench = Benchmark::new(config);

    if cli.input.is_dir() {
        let frames = io::load_frames(&cli.input, size)?;
        let result = bench.run_frames(&frames, &kernel)?;
        if cli.json {
            println!("{}", result.report().to_json()?);
        } else {
            print!("{result}");
        }

        if let Some(dir) = &cli.out_dir {
            for (i, frame) in result.outputs.iter().enumerate() {
                io::save_png(frame, &dir.join(format!("frame_{:04}.png", i + 1)))?;
            }
            info!(frames = result.outputs.len(), ?dir, "wrote frames");
        }
        return Ok(());
    }

    let src = io::load_image(&cli.input, size)?;
    let result = bench.run(&src, &kernel)?;

    if cli.json {
        println!("{}", result.report().to_json()?);
    } else {
        print!("{result}");
    }

    if let Some(dir) = &cli.out_dir {
        io::save_png(&result.sequential_image, &dir.join("sequential.png"))?;
        io::save_png(&result.parallel_image, &dir.join("parallel.png"))?;
        info!(?dir, "wrote outputs");
    }

    Ok(())
}

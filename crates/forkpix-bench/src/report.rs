use std::fmt;

use serde::{Deserialize, Serialize};

use forkpix_core::{PixelBuffer, TaskStats};

use crate::harness::{BenchmarkResult, FrameBenchmarkResult};
use crate::metrics::{Speedup, TimingTable};

const BAR_WIDTH: usize = 40;

/// Serializable summary of a benchmark, without the pixel data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub kernel: String,
    pub width: u32,
    pub height: u32,
    pub threshold: u32,
    pub sequential_ms: u64,
    pub parallel: Vec<WorkerRow>,
    pub speedup: Option<Speedup>,
    pub fastest_workers: Option<usize>,
    pub stats: TaskStats,
    pub ops_per_pixel: u64,
    pub sequential_digest: String,
    pub parallel_digest: String,
    pub outputs_match: bool,
}

/// Serializable summary of a frame-batch benchmark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameBenchmarkReport {
    pub kernel: String,
    pub frames: usize,
    pub sequential_ms: u64,
    pub parallel: Vec<WorkerRow>,
    pub speedup: Option<Speedup>,
    pub fastest_workers: Option<usize>,
    pub stats: TaskStats,
    /// BLAKE3 digest of each output frame, in input order.
    pub frame_digests: Vec<String>,
    pub outputs_match: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerRow {
    pub workers: usize,
    pub elapsed_ms: u64,
    pub speedup: Option<f64>,
}

impl BenchmarkReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FrameBenchmarkReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn worker_rows(timings: &TimingTable) -> Vec<WorkerRow> {
    timings
        .speedup_curve()
        .into_iter()
        .zip(&timings.parallel)
        .map(|((workers, s), t)| WorkerRow {
            workers,
            elapsed_ms: t.millis(),
            speedup: s.map(|s| s.speedup),
        })
        .collect()
}

impl BenchmarkResult {
    pub fn report(&self) -> BenchmarkReport {
        BenchmarkReport {
            kernel: self.kernel.name(),
            width: self.width,
            height: self.height,
            threshold: self.threshold,
            sequential_ms: self.sequential_ms(),
            parallel: worker_rows(&self.timings),
            speedup: self.speedup,
            fastest_workers: self.timings.fastest().map(|t| t.workers),
            stats: self.parallel_stats,
            ops_per_pixel: self.kernel.ops_per_pixel(),
            sequential_digest: self.sequential_image.digest(),
            parallel_digest: self.parallel_image.digest(),
            outputs_match: self.outputs_match(),
        }
    }
}

impl FrameBenchmarkResult {
    pub fn report(&self) -> FrameBenchmarkReport {
        FrameBenchmarkReport {
            kernel: self.kernel.name(),
            frames: self.frames,
            sequential_ms: self.timings.sequential_ms(),
            parallel: worker_rows(&self.timings),
            speedup: self.speedup,
            fastest_workers: self.timings.fastest().map(|t| t.workers),
            stats: self.stats,
            frame_digests: self.outputs.iter().map(PixelBuffer::digest).collect(),
            outputs_match: self.outputs_match,
        }
    }
}

/// Time table with one proportional bar per row, scaled to the slowest run.
fn write_table(f: &mut fmt::Formatter<'_>, timings: &TimingTable) -> fmt::Result {
    let slowest = timings
        .parallel
        .iter()
        .map(|t| t.elapsed)
        .chain(std::iter::once(timings.sequential))
        .max()
        .unwrap_or_default()
        .as_secs_f64();

    let bar = |secs: f64| {
        let len = if slowest > 0.0 {
            ((secs / slowest) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        "#".repeat(len.max(1))
    };

    writeln!(
        f,
        "  sequential  {:>8} ms  {}",
        timings.sequential_ms(),
        bar(timings.sequential.as_secs_f64())
    )?;
    for t in &timings.parallel {
        writeln!(
            f,
            "  {:>2} workers  {:>8} ms  {}",
            t.workers,
            t.millis(),
            bar(t.elapsed.as_secs_f64())
        )?;
    }
    Ok(())
}

fn write_speedup(
    f: &mut fmt::Formatter<'_>,
    timings: &TimingTable,
    speedup: Option<Speedup>,
) -> fmt::Result {
    let workers = timings.widest().map_or(0, |t| t.workers);
    match speedup {
        Some(s) => {
            writeln!(f, "Speedup ({workers} workers): {:.2}x", s.speedup)?;
            writeln!(f, "Efficiency: {:.2}%", s.efficiency)?;
        }
        None => writeln!(f, "Speedup ({workers} workers): n/a (parallel run too fast to time)")?,
    }
    if let Some(t) = timings.fastest() {
        writeln!(f, "Fastest: {} workers ({} ms)", t.workers, t.millis())?;
    }
    Ok(())
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} on {}x{} (threshold {} rows)",
            self.kernel, self.width, self.height, self.threshold
        )?;
        write_table(f, &self.timings)?;
        write_speedup(f, &self.timings, self.speedup)?;
        writeln!(
            f,
            "Task tree: {} leaves, depth {}, {} operations ({} per pixel)",
            self.parallel_stats.leaves,
            self.parallel_stats.max_depth,
            self.parallel_stats.operations,
            self.kernel.ops_per_pixel()
        )?;
        writeln!(
            f,
            "Outputs: {}",
            if self.outputs_match() {
                "identical"
            } else {
                "DIFFER"
            }
        )
    }
}

impl fmt::Display for FrameBenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} on {} frames", self.kernel, self.frames)?;
        write_table(f, &self.timings)?;
        write_speedup(f, &self.timings, self.speedup)?;
        writeln!(
            f,
            "Outputs: {}",
            if self.outputs_match { "identical" } else { "DIFFER" }
        )
    }
}

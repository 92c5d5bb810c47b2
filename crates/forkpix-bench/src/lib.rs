pub mod config;
pub mod harness;
pub mod metrics;
pub mod report;

pub use config::{BenchmarkConfig, MAX_WORKERS};
pub use harness::{Benchmark, BenchmarkResult, FrameBenchmarkResult, benchmark, benchmark_frames};
pub use metrics::{Speedup, TimingTable, WorkerTiming};
pub use report::{BenchmarkReport, FrameBenchmarkReport, WorkerRow};

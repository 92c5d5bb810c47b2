use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed wall time of one parallel run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerTiming {
    pub workers: usize,
    pub elapsed: Duration,
}

impl WorkerTiming {
    pub fn millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Sequential baseline plus one entry per worker count, ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingTable {
    pub sequential: Duration,
    pub parallel: Vec<WorkerTiming>,
}

impl TimingTable {
    pub fn sequential_ms(&self) -> u64 {
        self.sequential.as_millis() as u64
    }

    pub fn parallel_ms_by_workers(&self) -> Vec<(usize, u64)> {
        self.parallel.iter().map(|t| (t.workers, t.millis())).collect()
    }

    /// Timing of the widest run, which the headline speedup is taken from.
    pub fn widest(&self) -> Option<&WorkerTiming> {
        self.parallel.iter().max_by_key(|t| t.workers)
    }

    /// Fastest parallel run; ties go to the smaller pool.
    pub fn fastest(&self) -> Option<&WorkerTiming> {
        self.parallel
            .iter()
            .min_by(|a, b| a.elapsed.cmp(&b.elapsed).then(a.workers.cmp(&b.workers)))
    }

    pub fn speedup(&self) -> Option<Speedup> {
        let widest = self.widest()?;
        Speedup::from_elapsed(self.sequential, widest.elapsed, widest.workers)
    }

    /// Speedup at every worker count, in table order.
    pub fn speedup_curve(&self) -> Vec<(usize, Option<Speedup>)> {
        self.parallel
            .iter()
            .map(|t| (t.workers, Speedup::from_elapsed(self.sequential, t.elapsed, t.workers)))
            .collect()
    }
}

/// `speedup = S / P`, `efficiency = speedup / workers * 100`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Speedup {
    pub speedup: f64,
    /// Percent of ideal linear scaling.
    pub efficiency: f64,
}

impl Speedup {
    /// `None` when the parallel run took no measurable time or `workers` is 0.
    pub fn from_elapsed(sequential: Duration, parallel: Duration, workers: usize) -> Option<Self> {
        if parallel.is_zero() || workers == 0 {
            return None;
        }
        let speedup = sequential.as_secs_f64() / parallel.as_secs_f64();
        Some(Self {
            speedup,
            efficiency: speedup / workers as f64 * 100.0,
        })
    }

    pub fn from_millis(sequential_ms: u64, parallel_ms: u64, workers: usize) -> Option<Self> {
        Self::from_elapsed(
            Duration::from_millis(sequential_ms),
            Duration::from_millis(parallel_ms),
            workers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(seq: u64, par: &[u64]) -> TimingTable {
        TimingTable {
            sequential: Duration::from_millis(seq),
            parallel: par
                .iter()
                .enumerate()
                .map(|(i, &ms)| WorkerTiming {
                    workers: i + 1,
                    elapsed: Duration::from_millis(ms),
                })
                .collect(),
        }
    }

    #[test]
    fn speedup_and_efficiency_at_twelve_workers() {
        let s = Speedup::from_millis(100, 10, 12).unwrap();
        assert!((s.speedup - 10.0).abs() < 1e-9);
        assert!((s.efficiency - 83.33).abs() < 0.01);
    }

    #[test]
    fn zero_parallel_time_has_no_speedup() {
        assert!(Speedup::from_millis(100, 0, 12).is_none());
        assert!(Speedup::from_millis(100, 10, 0).is_none());
    }

    #[test]
    fn table_speedup_uses_widest_run() {
        let t = table(120, &[100, 60, 40, 30, 24, 20, 18, 16, 15, 14, 13, 12]);
        let s = t.speedup().unwrap();
        assert!((s.speedup - 10.0).abs() < 1e-9);
        assert_eq!(t.widest().unwrap().workers, 12);
    }

    #[test]
    fn fastest_prefers_smaller_pool_on_tie() {
        let t = table(50, &[40, 20, 10, 10, 12]);
        assert_eq!(t.fastest().unwrap().workers, 3);
    }

    #[test]
    fn millisecond_views() {
        let t = table(7, &[5, 3]);
        assert_eq!(t.sequential_ms(), 7);
        assert_eq!(t.parallel_ms_by_workers(), vec![(1, 5), (2, 3)]);
    }

    #[test]
    fn speedup_curve_per_worker_count() {
        let t = table(100, &[100, 50, 0]);
        let curve = t.speedup_curve();
        assert_eq!(curve.len(), 3);
        assert!((curve[0].1.unwrap().efficiency - 100.0).abs() < 1e-9);
        assert!((curve[1].1.unwrap().speedup - 2.0).abs() < 1e-9);
        assert!(curve[2].1.is_none());
    }

    #[test]
    fn empty_table_has_no_speedup() {
        assert!(TimingTable::default().speedup().is_none());
        assert!(TimingTable::default().fastest().is_none());
    }
}

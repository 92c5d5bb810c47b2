use serde::{Deserialize, Serialize};

/// Half-open row interval `[start_y, end_y)` owned by one unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskRange {
    pub start_y: u32,
    pub end_y: u32,
}

impl TaskRange {
    pub fn new(start_y: u32, end_y: u32) -> Self {
        debug_assert!(start_y <= end_y);
        Self { start_y, end_y }
    }

    pub fn rows(&self) -> u32 {
        self.end_y - self.start_y
    }

    /// Split at `start_y + rows / 2` into two adjacent halves.
    pub fn split(&self) -> (TaskRange, TaskRange) {
        let mid = self.start_y + self.rows() / 2;
        (
            TaskRange::new(self.start_y, mid),
            TaskRange::new(mid, self.end_y),
        )
    }
}

/// Work accounting for a subtree of the task tree.
///
/// Each leaf fills in its own counters; parents combine their children's
/// stats after the join, so no counter is ever shared between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub leaves: u64,
    pub pixels: u64,
    pub operations: u64,
    pub max_depth: u32,
}

impl TaskStats {
    pub fn leaf(pixels: u64, ops_per_pixel: u64, depth: u32) -> Self {
        Self {
            leaves: 1,
            pixels,
            operations: pixels * ops_per_pixel,
            max_depth: depth,
        }
    }

    pub fn merge(self, other: TaskStats) -> TaskStats {
        TaskStats {
            leaves: self.leaves + other.leaves,
            pixels: self.pixels + other.pixels,
            operations: self.operations + other.operations,
            max_depth: self.max_depth.max(other.max_depth),
        }
    }
}

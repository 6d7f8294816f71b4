use std::collections::VecDeque;

use super::snapshot::SystemSnapshot;

pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Bounded FIFO ring of recent system snapshots for trend display.
///
/// Owned exclusively by the render loop; never shared across cycles.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    capacity: usize,
    entries: VecDeque<SystemSnapshot>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Append a snapshot, evicting the oldest entry once full.
    pub fn push(&mut self, snapshot: SystemSnapshot) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemSnapshot> {
        self.entries.iter()
    }

    /// CPU usage series scaled by 10 for the bar-chart widget
    /// (0-100% becomes 0-1000, preserving one decimal of precision).
    pub fn cpu_series(&self) -> Vec<u64> {
        self.entries
            .iter()
            .map(|s| (s.cpu_percent * 10.0) as u64)
            .collect()
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(cpu: f64) -> SystemSnapshot {
        SystemSnapshot {
            cpu_percent: cpu,
            ..Default::default()
        }
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut history = SnapshotHistory::with_capacity(100);
        for i in 0..250 {
            history.push(snap(i as f64));
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.capacity(), 100);
    }

    #[test]
    fn test_oldest_evicted_first() {
        let mut history = SnapshotHistory::with_capacity(3);
        for i in 0..5 {
            history.push(snap(i as f64));
        }
        let cpus: Vec<f64> = history.iter().map(|s| s.cpu_percent).collect();
        assert_eq!(cpus, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_cpu_series_scaled() {
        let mut history = SnapshotHistory::with_capacity(10);
        history.push(snap(12.5));
        assert_eq!(history.cpu_series(), vec![125]);
    }
}

//! Trajectory recording and best-run ghost playback
//!
//! A run's positions are sampled into fixed 10 ms elapsed-time buckets. The
//! current run is write-only; the best prior run is read-only during play
//! and forward-filled at load time so sampling gaps hold the ghost in place
//! instead of teleporting it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BUCKET_MS, TRAJECTORY_BUCKETS};

/// Positions of one run, indexed by `elapsed_ms / BUCKET_MS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    buckets: Vec<Option<Vec2>>,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Trajectory {
    pub fn new() -> Self {
        Self {
            buckets: vec![None; TRAJECTORY_BUCKETS],
        }
    }

    #[inline]
    fn bucket(elapsed_ms: u64) -> usize {
        (elapsed_ms / BUCKET_MS) as usize
    }

    /// Record a position. Multiple writes within one bucket are fine; the
    /// last one wins. Writes beyond capacity are ignored, which bounds the
    /// maximum trackable run length.
    pub fn record(&mut self, elapsed_ms: u64, pos: Vec2) {
        if let Some(slot) = self.buckets.get_mut(Self::bucket(elapsed_ms)) {
            *slot = Some(pos);
        }
    }

    /// Position at the bucket covering `elapsed_ms`, index clamped into
    /// capacity rather than read out of bounds.
    pub fn position_at(&self, elapsed_ms: u64) -> Option<Vec2> {
        let i = Self::bucket(elapsed_ms).min(self.buckets.len() - 1);
        self.buckets[i]
    }

    /// Propagate each sample forward into immediately following empty
    /// buckets, so playback gaps hold the last known position.
    pub fn forward_fill(&mut self) {
        for i in 1..self.buckets.len() {
            if self.buckets[i].is_none() {
                self.buckets[i] = self.buckets[i - 1];
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Option::is_none)
    }
}

/// Records the current run and serves the best prior run for rendering
#[derive(Debug, Default)]
pub struct ReplayRecorder {
    current: Trajectory,
    best: Option<Trajectory>,
}

impl ReplayRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a persisted best run, forward-filling it for playback.
    pub fn load_best(&mut self, mut best: Trajectory) {
        best.forward_fill();
        self.best = Some(best);
    }

    pub fn has_best(&self) -> bool {
        self.best.is_some()
    }

    /// Begin a fresh current-run buffer.
    pub fn start_run(&mut self) {
        self.current = Trajectory::new();
    }

    /// Sample the live ball position into the current run.
    pub fn record(&mut self, elapsed_ms: u64, pos: Vec2) {
        self.current.record(elapsed_ms, pos);
    }

    /// Best-run position for the given elapsed time, for ghost rendering.
    pub fn ghost_position(&self, elapsed_ms: u64) -> Option<Vec2> {
        self.best.as_ref()?.position_at(elapsed_ms)
    }

    /// Promote the current run to best if it beats `best_known_ms` (or no
    /// best exists). Returns the raw buffer to persist on promotion.
    pub fn commit_if_better(
        &mut self,
        completion_ms: u64,
        best_known_ms: Option<u64>,
    ) -> Option<Trajectory> {
        let improved = best_known_ms.is_none_or(|best| completion_ms < best);
        if !improved {
            return None;
        }
        let raw = self.current.clone();
        self.load_best(raw.clone());
        log::debug!("best run replaced at {completion_ms} ms");
        Some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_in_bucket_wins() {
        let mut t = Trajectory::new();
        t.record(12, Vec2::new(1.0, 1.0));
        t.record(19, Vec2::new(2.0, 2.0));
        assert_eq!(t.position_at(15), Some(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_forward_fill_holds_last_sample() {
        let mut t = Trajectory::new();
        t.record(0, Vec2::new(1.0, 1.0));
        t.record(5 * BUCKET_MS, Vec2::new(2.0, 2.0));
        t.forward_fill();

        // Gap buckets hold the prior sample
        assert_eq!(t.position_at(3 * BUCKET_MS), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(t.position_at(6 * BUCKET_MS), Some(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_out_of_capacity_reads_and_writes() {
        let mut t = Trajectory::new();
        let last_ms = (TRAJECTORY_BUCKETS as u64 - 1) * BUCKET_MS;
        t.record(last_ms, Vec2::new(9.0, 9.0));
        // Beyond capacity: write dropped, read clamped to the final bucket
        t.record(last_ms + BUCKET_MS * 100, Vec2::new(0.0, 0.0));
        assert_eq!(
            t.position_at(last_ms + BUCKET_MS * 500),
            Some(Vec2::new(9.0, 9.0))
        );
    }

    #[test]
    fn test_commit_replaces_only_on_improvement() {
        let mut rec = ReplayRecorder::new();
        rec.record(0, Vec2::new(1.0, 1.0));
        assert!(rec.commit_if_better(30_000, None).is_some());
        assert!(rec.has_best());

        // A slower follow-up run must not replace the best buffer
        rec.start_run();
        rec.record(0, Vec2::new(5.0, 5.0));
        assert!(rec.commit_if_better(40_000, Some(30_000)).is_none());
        assert_eq!(rec.ghost_position(0), Some(Vec2::new(1.0, 1.0)));

        // A faster one does
        rec.start_run();
        rec.record(0, Vec2::new(7.0, 7.0));
        assert!(rec.commit_if_better(20_000, Some(30_000)).is_some());
        assert_eq!(rec.ghost_position(0), Some(Vec2::new(7.0, 7.0)));
    }

    #[test]
    fn test_ghost_unavailable_without_best() {
        let rec = ReplayRecorder::new();
        assert_eq!(rec.ghost_position(0), None);
    }
}

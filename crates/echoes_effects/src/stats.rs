//! Effect statistics.

/// Counters from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Canvas calls issued.
    pub draw_calls: u32,
    /// Records drawn.
    pub records_drawn: u32,
    /// Link segments drawn.
    pub links: u32,
}

/// Result of one executed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Tick number (1-based).
    pub tick: u64,
    /// Records after pruning.
    pub records: usize,
    /// Records spawned this tick.
    pub spawned: usize,
    /// Records pruned this tick.
    pub pruned: usize,
    /// Render counters.
    pub draw: DrawStats,
    /// Layer opacity after the idle fade.
    pub opacity: f32,
    /// Simulation was suspended (hidden effect).
    pub suspended: bool,
    /// Wall time of the tick (microseconds).
    pub elapsed_us: u32,
}

/// Running totals for one effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectStats {
    /// Frame callbacks received.
    pub callbacks: u64,
    /// Ticks executed.
    pub ticks: u64,
    /// Callbacks skipped by the frame cap.
    pub dropped_frames: u64,
    /// Ticks executed while suspended.
    pub suspended_ticks: u64,
    /// Current record count.
    pub records: usize,
    /// Records spawned so far.
    pub spawned_total: u64,
    /// Records pruned so far.
    pub pruned_total: u64,
    /// Last render pass.
    pub last_draw: DrawStats,
    /// Last tick time (microseconds).
    pub last_tick_us: u32,
    /// Worst tick time (microseconds).
    pub worst_tick_us: u32,
}

impl EffectStats {
    /// Folds a tick report into the totals.
    pub fn record_tick(&mut self, report: &TickReport) {
        self.ticks += 1;
        if report.suspended {
            self.suspended_ticks += 1;
        }
        self.records = report.records;
        self.spawned_total += report.spawned as u64;
        self.pruned_total += report.pruned as u64;
        self.last_draw = report.draw;
        self.last_tick_us = report.elapsed_us;
        self.worst_tick_us = self.worst_tick_us.max(report.elapsed_us);
    }

    /// Fraction of callbacks the frame cap skipped.
    #[must_use]
    pub fn drop_ratio(&self) -> f32 {
        if self.callbacks == 0 {
            0.0
        } else {
            self.dropped_frames as f32 / self.callbacks as f32
        }
    }

    /// Executed ticks per second over `elapsed_ms` of host time.
    #[must_use]
    pub fn effective_fps(&self, elapsed_ms: f64) -> f32 {
        if elapsed_ms > 0.0 {
            (self.ticks as f64 * 1_000.0 / elapsed_ms) as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tick_tracks_worst() {
        let mut stats = EffectStats::default();
        stats.record_tick(&TickReport {
            tick: 1,
            records: 10,
            spawned: 3,
            elapsed_us: 250,
            ..TickReport::default()
        });
        stats.record_tick(&TickReport {
            tick: 2,
            records: 12,
            spawned: 3,
            pruned: 1,
            elapsed_us: 100,
            suspended: true,
            ..TickReport::default()
        });

        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.records, 12);
        assert_eq!(stats.spawned_total, 6);
        assert_eq!(stats.pruned_total, 1);
        assert_eq!(stats.worst_tick_us, 250);
        assert_eq!(stats.last_tick_us, 100);
        assert_eq!(stats.suspended_ticks, 1);
    }

    #[test]
    fn test_ratios() {
        let stats = EffectStats {
            callbacks: 100,
            ticks: 24,
            dropped_frames: 76,
            ..EffectStats::default()
        };
        assert!((stats.drop_ratio() - 0.76).abs() < 1e-6);
        assert!((stats.effective_fps(1_000.0) - 24.0).abs() < 1e-6);
        assert_eq!(EffectStats::default().drop_ratio(), 0.0);
    }
}

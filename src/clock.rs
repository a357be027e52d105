// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

use std::time::{Duration, Instant};

/// A wall-clock stopwatch. Rather than accumulating the control loop's
/// nominal 10ms periods, which would drift, it remembers a reference
/// instant equal to "now minus elapsed" and recomputes elapsed time from
/// the clock on every sample.
///
/// Callers supply `now` to every operation, which keeps the stopwatch
/// deterministic under test.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    /// Set while running. Subtracting it from the current instant yields
    /// the elapsed time.
    reference: Option<Instant>,

    /// The elapsed value we froze at the last stop.
    frozen: Duration,
}
impl Stopwatch {
    /// Begins (or resumes) advancing elapsed time. Resuming from a pause
    /// continues from the frozen value; it never jumps back to zero.
    pub fn start(&mut self, now: Instant) {
        if self.reference.is_none() {
            self.reference = Some(now - self.frozen);
        }
    }

    /// Freezes elapsed time at its current value.
    pub fn stop(&mut self, now: Instant) {
        if let Some(reference) = self.reference.take() {
            self.frozen = now.duration_since(reference);
        }
    }

    /// Zeroes the stopwatch.
    pub fn reset(&mut self) {
        self.reference = None;
        self.frozen = Duration::ZERO;
    }

    /// The current elapsed time: live while running, frozen while stopped.
    pub fn sample(&self, now: Instant) -> Duration {
        match self.reference {
            Some(reference) => now.duration_since(reference),
            None => self.frozen,
        }
    }

    pub fn is_running(&self) -> bool {
        self.reference.is_some()
    }
}

/// Renders elapsed milliseconds as MM:SS, each field zero-padded to two
/// digits. Minutes keep growing past 99 rather than wrapping.
pub fn format_time(elapsed_millis: u64) -> String {
    let total_seconds = elapsed_millis / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_ge;

    #[test]
    fn stopwatch_advances_only_while_running() {
        let base = Instant::now();
        let mut sw = Stopwatch::default();
        assert!(!sw.is_running());
        assert_eq!(sw.sample(base), Duration::ZERO);

        sw.start(base);
        assert!(sw.is_running());
        assert_eq!(sw.sample(base + Duration::from_millis(2500)), Duration::from_millis(2500));

        sw.stop(base + Duration::from_secs(5));
        assert!(!sw.is_running());
        assert_eq!(sw.sample(base + Duration::from_secs(9)), Duration::from_secs(5));
        assert_eq!(sw.sample(base + Duration::from_secs(60)), Duration::from_secs(5));
    }

    #[test]
    fn stopwatch_resumes_from_frozen_value() {
        let base = Instant::now();
        let mut sw = Stopwatch::default();
        sw.start(base);
        sw.stop(base + Duration::from_secs(5));

        sw.start(base + Duration::from_secs(9));
        assert_eq!(sw.sample(base + Duration::from_secs(11)), Duration::from_secs(7));
    }

    #[test]
    fn stopwatch_start_while_running_is_a_no_op() {
        let base = Instant::now();
        let mut sw = Stopwatch::default();
        sw.start(base);
        sw.start(base + Duration::from_secs(3));
        assert_eq!(sw.sample(base + Duration::from_secs(4)), Duration::from_secs(4));
    }

    #[test]
    fn stopwatch_sample_is_monotonic_while_running() {
        let base = Instant::now();
        let mut sw = Stopwatch::default();
        sw.start(base);
        let mut last = Duration::ZERO;
        for ms in (0..1000).step_by(10) {
            let sample = sw.sample(base + Duration::from_millis(ms));
            assert_ge!(sample, last);
            last = sample;
        }
    }

    #[test]
    fn stopwatch_reset_zeroes() {
        let base = Instant::now();
        let mut sw = Stopwatch::default();
        sw.start(base);
        sw.stop(base + Duration::from_secs(42));
        sw.reset();
        assert!(!sw.is_running());
        assert_eq!(sw.sample(base + Duration::from_secs(50)), Duration::ZERO);
    }

    #[test]
    fn format_time_pads_and_carries() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(999), "00:00");
        assert_eq!(format_time(59_999), "00:59");
        assert_eq!(format_time(60_000), "01:00");
        assert_eq!(format_time(61_000), "01:01");
        assert_eq!(format_time(3_599_000), "59:59");
        assert_eq!(format_time(6_000_000), "100:00");
    }
}

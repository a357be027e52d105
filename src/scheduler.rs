// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

/// Watches the sampled elapsed-time stream and decides when the minute
/// chime fires. There is no dedicated timer here; correctness relies on the
/// tracker's 10ms sampling period being far finer than the one-second
/// granularity of the boundary check, so no boundary's window can be
/// skipped between samples.
#[derive(Clone, Debug, Default)]
pub struct MinuteChime {
    /// The whole-second mark of the last chime, which makes firing
    /// idempotent per boundary. Always a positive multiple of 60 when set.
    last_boundary: Option<u64>,
}
impl MinuteChime {
    /// Consumes one elapsed-time update. Returns the boundary (in whole
    /// seconds) to fire for, at most once per boundary per session.
    pub fn on_elapsed_update(
        &mut self,
        elapsed_millis: u64,
        is_running: bool,
        audio_ready: bool,
    ) -> Option<u64> {
        if !is_running || !audio_ready || elapsed_millis == 0 {
            return None;
        }
        let total_seconds = elapsed_millis / 1000;
        if total_seconds > 0
            && total_seconds % 60 == 0
            && self.last_boundary != Some(total_seconds)
        {
            self.last_boundary = Some(total_seconds);
            Some(total_seconds)
        } else {
            None
        }
    }

    /// Forgets the boundary memory. Part of the session's Reset action.
    pub fn clear(&mut self) {
        self.last_boundary = None;
    }

    pub fn last_boundary(&self) -> Option<u64> {
        self.last_boundary
    }
}

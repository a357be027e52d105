// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

use crate::{
    audio::AudioQueue,
    clock::{self, Stopwatch},
    scheduler::MinuteChime,
    synth::{MinuteCue, Waveform, DEFAULT_PITCH},
    traits::{Generates, Resets, Ticks},
    ParameterType, StereoSample,
};
use std::time::Instant;

/// The single stopwatch session per process: the elapsed-time tracker, the
/// chime scheduler, and whatever chime is currently in flight. All state is
/// owned here and mutated only by the control loop, so there is no locking.
#[derive(Debug)]
pub struct Session {
    stopwatch: Stopwatch,
    chime: MinuteChime,

    /// The last published elapsed value, in milliseconds. Monotonically
    /// non-decreasing while running, frozen while paused, zeroed by reset.
    elapsed_millis: u64,

    /// Set once by the first successful audio activation; never reverts.
    audio_ready: bool,
    sample_rate: usize,
    queue: Option<AudioQueue>,

    /// The chime in flight, if any. It keeps rendering across Stop and
    /// Reset and is dropped when it reports finished.
    active_cue: Option<MinuteCue>,

    waveform: Waveform,
    pitch: ParameterType,
}
impl Default for Session {
    fn default() -> Self {
        Self::new_with(Waveform::default(), DEFAULT_PITCH)
    }
}
impl Session {
    pub fn new_with(waveform: Waveform, pitch: ParameterType) -> Self {
        Self {
            stopwatch: Default::default(),
            chime: Default::default(),
            elapsed_millis: Default::default(),
            audio_ready: false,
            sample_rate: Default::default(),
            queue: None,
            active_cue: None,
            waveform,
            pitch,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    pub fn audio_ready(&self) -> bool {
        self.audio_ready
    }

    pub fn last_beep_boundary(&self) -> Option<u64> {
        self.chime.last_boundary()
    }

    pub fn has_active_cue(&self) -> bool {
        self.active_cue.is_some()
    }

    /// Records the outcome of the one-time audio activation. Later calls
    /// (e.g. a redundant Reset event from the interface) are ignored.
    pub fn set_audio_ready(&mut self, sample_rate: usize, queue: AudioQueue) {
        if !self.audio_ready {
            self.audio_ready = true;
            self.sample_rate = sample_rate;
            self.queue = Some(queue);
            log::info!("audio ready at {sample_rate}Hz");
        }
    }

    /// The Start/Pause action. The caller resolves audio activation before
    /// invoking this; the toggle itself is unconditional.
    pub fn toggle(&mut self, now: Instant) {
        if self.stopwatch.is_running() {
            self.stopwatch.stop(now);
            self.elapsed_millis = self.stopwatch.sample(now).as_millis() as u64;
            log::debug!("paused at {}ms", self.elapsed_millis);
        } else {
            self.stopwatch.start(now);
            log::debug!("running from {}ms", self.elapsed_millis);
        }
    }

    /// The Reset action: stops the tracker, zeroes elapsed time, and clears
    /// the chime's boundary memory. A no-op while already stopped at zero
    /// (the action is disabled then). Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        if self.elapsed_millis == 0 && !self.stopwatch.is_running() {
            return false;
        }
        self.stopwatch.reset();
        self.chime.clear();
        self.elapsed_millis = 0;
        true
    }

    /// One pass of the control loop: resamples the tracker and lets the
    /// chime scheduler look at the published value.
    pub fn advance(&mut self, now: Instant) {
        if !self.stopwatch.is_running() {
            return;
        }
        self.elapsed_millis = self.stopwatch.sample(now).as_millis() as u64;
        if let Some(boundary) =
            self.chime
                .on_elapsed_update(self.elapsed_millis, true, self.audio_ready)
        {
            log::info!("minute boundary at {boundary}s; firing chime");
            self.fire_cue();
        }
    }

    // Fire and forget: the new chime replaces any leftover and plays out on
    // its own, independent of the session's running state.
    fn fire_cue(&mut self) {
        let mut cue = MinuteCue::new_with(self.waveform, self.pitch);
        cue.reset(self.sample_rate);
        self.active_cue = Some(cue);
    }

    /// Refills the audio queue with up to `count` samples when the
    /// interface reports free space. Runs whether or not the stopwatch is
    /// running, so a chime in flight completes across Stop and Reset.
    pub fn supply_audio(&mut self, count: usize) {
        let Some(queue) = self.queue.as_ref() else {
            return;
        };
        for _ in 0..count {
            let sample = if let Some(cue) = self.active_cue.as_mut() {
                cue.tick(1);
                cue.value()
            } else {
                StereoSample::SILENCE
            };
            if queue.push(sample).is_err() {
                break;
            }
        }
        if self
            .active_cue
            .as_ref()
            .is_some_and(|cue| cue.is_finished())
        {
            log::debug!("chime finished; releasing synth");
            self.active_cue = None;
        }
    }

    /// The MM:SS display string for the current elapsed time.
    pub fn display(&self) -> String {
        clock::format_time(self.elapsed_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::queue::ArrayQueue;
    use std::{sync::Arc, time::Duration};

    const TEST_SAMPLE_RATE: usize = 1024;

    fn ready_session() -> (Session, AudioQueue) {
        let mut session = Session::new_with(Waveform::Sine, 256.0);
        let queue: AudioQueue = Arc::new(ArrayQueue::new(TEST_SAMPLE_RATE * 8));
        session.set_audio_ready(TEST_SAMPLE_RATE, Arc::clone(&queue));
        (session, queue)
    }

    // Drives the control loop's sampling pass in 10ms steps.
    fn run_span(session: &mut Session, base: Instant, from_ms: u64, to_ms: u64) {
        let mut at = from_ms;
        while at <= to_ms {
            session.advance(base + Duration::from_millis(at));
            at += 10;
        }
    }

    #[test]
    fn elapsed_is_frozen_while_stopped_and_resumes() {
        let (mut session, _queue) = ready_session();
        let base = Instant::now();

        session.toggle(base);
        run_span(&mut session, base, 0, 5_000);
        assert_eq!(session.elapsed_millis(), 5_000);

        session.toggle(base + Duration::from_millis(5_000));
        run_span(&mut session, base, 5_010, 9_000);
        assert_eq!(session.elapsed_millis(), 5_000);

        session.toggle(base + Duration::from_millis(9_000));
        run_span(&mut session, base, 9_010, 11_000);
        assert_eq!(session.elapsed_millis(), 7_000);
    }

    #[test]
    fn no_chime_before_audio_is_ready() {
        let mut session = Session::default();
        let base = Instant::now();
        session.toggle(base);
        run_span(&mut session, base, 0, 61_000);
        assert_eq!(session.last_beep_boundary(), None);
        assert!(!session.has_active_cue());
    }

    #[test]
    fn one_chime_per_boundary() {
        let (mut session, _queue) = ready_session();
        let base = Instant::now();
        session.toggle(base);

        run_span(&mut session, base, 0, 59_990);
        assert!(!session.has_active_cue());

        run_span(&mut session, base, 60_000, 60_500);
        assert_eq!(session.last_beep_boundary(), Some(60));
        assert!(session.has_active_cue());
        assert_eq!(session.display(), "01:00");

        // Drain the chime, then make sure the same boundary doesn't refire.
        session.supply_audio(TEST_SAMPLE_RATE * 4);
        assert!(!session.has_active_cue());
        run_span(&mut session, base, 60_510, 119_990);
        assert_eq!(session.last_beep_boundary(), Some(60));
        assert!(!session.has_active_cue());

        run_span(&mut session, base, 120_000, 120_500);
        assert_eq!(session.last_beep_boundary(), Some(120));
        assert!(session.has_active_cue());
    }

    #[test]
    fn chime_in_flight_survives_stop_and_reset() {
        let (mut session, queue) = ready_session();
        let base = Instant::now();
        session.toggle(base);
        run_span(&mut session, base, 0, 60_050);
        assert!(session.has_active_cue());

        session.toggle(base + Duration::from_millis(60_050));
        assert!(session.reset());
        assert!(session.has_active_cue());

        // The chime keeps producing audible samples after the reset.
        session.supply_audio(TEST_SAMPLE_RATE / 8);
        let mut heard_tone = false;
        while let Some(sample) = queue.pop() {
            if sample != StereoSample::SILENCE {
                heard_tone = true;
            }
        }
        assert!(heard_tone);
    }

    #[test]
    fn reset_clears_state_and_is_idempotent() {
        let (mut session, _queue) = ready_session();
        let base = Instant::now();

        // Disabled while stopped at zero.
        assert!(!session.reset());

        session.toggle(base);
        run_span(&mut session, base, 0, 61_000);
        session.toggle(base + Duration::from_millis(61_000));

        assert!(session.reset());
        assert_eq!(session.elapsed_millis(), 0);
        assert!(!session.is_running());
        assert_eq!(session.last_beep_boundary(), None);
        assert_eq!(session.display(), "00:00");

        assert!(!session.reset());
    }

    #[test]
    fn reset_while_running_stops_the_tracker() {
        let (mut session, _queue) = ready_session();
        let base = Instant::now();
        session.toggle(base);
        run_span(&mut session, base, 0, 3_000);
        assert!(session.is_running());

        assert!(session.reset());
        assert!(!session.is_running());
        assert_eq!(session.elapsed_millis(), 0);
    }

    #[test]
    fn boundary_can_refire_after_reset() {
        let (mut session, _queue) = ready_session();
        let base = Instant::now();
        session.toggle(base);
        run_span(&mut session, base, 0, 60_050);
        assert_eq!(session.last_beep_boundary(), Some(60));

        session.toggle(base + Duration::from_millis(60_050));
        session.reset();

        // A fresh run crosses the 60s boundary again.
        let restart = base + Duration::from_millis(70_000);
        session.toggle(restart);
        let mut at = 0;
        while at <= 60_500 {
            session.advance(restart + Duration::from_millis(at));
            at += 10;
        }
        assert_eq!(session.last_beep_boundary(), Some(60));
        assert!(session.has_active_cue());
    }

    #[test]
    fn supply_audio_emits_silence_when_no_chime_is_active() {
        let (mut session, queue) = ready_session();
        session.supply_audio(16);
        assert_eq!(queue.len(), 16);
        while let Some(sample) = queue.pop() {
            assert_eq!(sample, StereoSample::SILENCE);
        }
    }
}

// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

use crate::{
    traits::{Generates, Resets, Ticks},
    ParameterType, Sample, StereoSample,
};
use std::f64::consts::PI;
use strum_macros::{Display, EnumString};

/// C5, the pitch of the chime tones.
pub const DEFAULT_PITCH: ParameterType = 523.25;

/// A waveform the chime oscillator can produce.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
}

/// A fixed-frequency audio-rate oscillator.
#[derive(Clone, Debug)]
pub struct Oscillator {
    waveform: Waveform,

    /// Hertz. Any positive number. 440 = A4.
    frequency: ParameterType,

    /// An internal copy of the current sample rate.
    sample_rate: usize,

    /// The current signal, normalized to [-1.0, 1.0].
    signal: f64,

    // The "cursor" within the current waveform cycle, in [0.0, 1.0).
    // Tracking it incrementally avoids recomputing the phase from a frame
    // count on every tick.
    cycle_position: f64,
    delta: f64,

    // Set on construction and reset().
    is_reset_pending: bool,
}
impl Oscillator {
    pub fn new_with(waveform: Waveform, frequency: ParameterType) -> Self {
        Self {
            waveform,
            frequency,
            sample_rate: Default::default(),
            signal: Default::default(),
            cycle_position: Default::default(),
            delta: Default::default(),
            is_reset_pending: true,
        }
    }

    fn amplitude_for_position(&self, position: f64) -> f64 {
        match self.waveform {
            Waveform::Sine => (position * 2.0 * PI).sin(),
            Waveform::Square => {
                if position < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 4.0 * (position - (position + 0.5).floor()).abs() - 1.0,
        }
    }
}
impl Generates<f64> for Oscillator {
    fn value(&self) -> f64 {
        self.signal
    }

    fn batch_values(&mut self, values: &mut [f64]) {
        for value in values {
            self.tick(1);
            *value = self.signal;
        }
    }
}
impl Resets for Oscillator {
    fn reset(&mut self, sample_rate: usize) {
        self.sample_rate = sample_rate;
        self.is_reset_pending = true;
    }
}
impl Ticks for Oscillator {
    fn tick(&mut self, tick_count: usize) {
        for _ in 0..tick_count {
            if self.is_reset_pending {
                self.delta = self.frequency / self.sample_rate as f64;
                self.cycle_position = 0.0;
                self.is_reset_pending = false;
            } else {
                self.cycle_position += self.delta;
                if self.cycle_position >= 1.0 {
                    self.cycle_position -= 1.0;
                }
            }
            self.signal = self.amplitude_for_position(self.cycle_position);
        }
    }
}

// Chime timing. Three tones a second apart, each a 120-BPM eighth note,
// with a short linear ramp at each edge so the tones don't click.
const TONE_OFFSETS_SECONDS: [f64; 3] = [0.0, 1.0, 2.0];
const TONE_SECONDS: f64 = 0.25;
const RAMP_SECONDS: f64 = 0.005;

/// The chime keeps its resources a little past the last tone before
/// declaring itself finished.
const CHIME_SPAN_SECONDS: f64 = 3.5;

const OUTPUT_LEVEL: f64 = 0.5;

/// Renders the triple-beep minute chime. One [MinuteCue] is created per
/// minute boundary, plays out to completion regardless of later Stop/Reset
/// actions, and is dropped once [MinuteCue::is_finished] reports true.
#[derive(Debug)]
pub struct MinuteCue {
    oscillator: Oscillator,
    sample_rate: usize,
    frames: usize,
    signal: StereoSample,
    is_finished: bool,
}
impl MinuteCue {
    pub fn new_with(waveform: Waveform, frequency: ParameterType) -> Self {
        Self {
            oscillator: Oscillator::new_with(waveform, frequency),
            sample_rate: Default::default(),
            frames: Default::default(),
            signal: StereoSample::SILENCE,
            is_finished: false,
        }
    }

    /// True once the chime's span has elapsed and its resources can be
    /// released.
    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    // The tone gate for the given moment within the chime, in [0.0, 1.0].
    fn gate_for_time(&self, seconds: f64) -> f64 {
        for offset in TONE_OFFSETS_SECONDS {
            let position = seconds - offset;
            if (0.0..TONE_SECONDS).contains(&position) {
                let attack = (position / RAMP_SECONDS).min(1.0);
                let release = ((TONE_SECONDS - position) / RAMP_SECONDS).min(1.0);
                return attack.min(release);
            }
        }
        0.0
    }
}
impl Generates<StereoSample> for MinuteCue {
    fn value(&self) -> StereoSample {
        self.signal
    }

    fn batch_values(&mut self, values: &mut [StereoSample]) {
        for value in values {
            self.tick(1);
            *value = self.signal;
        }
    }
}
impl Resets for MinuteCue {
    fn reset(&mut self, sample_rate: usize) {
        self.sample_rate = sample_rate;
        self.frames = 0;
        self.is_finished = false;
        self.signal = StereoSample::SILENCE;
        self.oscillator.reset(sample_rate);
    }
}
impl Ticks for MinuteCue {
    fn tick(&mut self, tick_count: usize) {
        for _ in 0..tick_count {
            // A zero sample rate means reset() was never called; there is
            // nothing sensible to render.
            if self.is_finished || self.sample_rate == 0 {
                self.is_finished = true;
                self.signal = StereoSample::SILENCE;
                continue;
            }
            let seconds = self.frames as f64 / self.sample_rate as f64;
            if seconds >= CHIME_SPAN_SECONDS {
                self.is_finished = true;
                self.signal = StereoSample::SILENCE;
                continue;
            }
            self.oscillator.tick(1);
            let amplitude = Sample(self.oscillator.value())
                * (self.gate_for_time(seconds) * OUTPUT_LEVEL);
            self.signal = amplitude.into();
            self.frames += 1;
        }
    }
}

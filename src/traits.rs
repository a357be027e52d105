// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

/// Something that [Generates] creates the given type as its work product
/// over time. The oscillator produces a bipolar signal, and the chime
/// produces [crate::StereoSample]s ready for the audio queue.
pub trait Generates<V>: Send + std::fmt::Debug + Ticks {
    /// The value for the current frame. Advance the frame by calling
    /// Ticks::tick().
    fn value(&self) -> V;

    /// The batch version of value(). Delivers each value by calling tick()
    /// internally.
    fn batch_values(&mut self, values: &mut [V]);
}

/// Something that [Ticks] runs on a sample-rate clock: one tick, one audio
/// frame.
pub trait Ticks: Send + std::fmt::Debug {
    /// Advances the device by the given number of frames.
    fn tick(&mut self, tick_count: usize);
}

/// Something that [Resets] can adopt a new sample rate and restart its
/// internal time from zero.
pub trait Resets {
    fn reset(&mut self, sample_rate: usize);
}

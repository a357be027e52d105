// Copyright (c) 2026 The minute-minder Authors. All rights reserved.

//! minute-minder is a terminal stopwatch that chimes three times at every
//! full-minute mark while it runs. The interesting parts are the
//! elapsed-time tracker ([clock]), the minute-boundary scheduler
//! ([scheduler]), and the chime renderer ([synth]); everything else is
//! plumbing between them and the audio interface.

pub use crate::session::Session;

/// The [audio] module encapsulates the connection to the audio interface.
pub mod audio;
/// The [clock] module tracks wall-clock elapsed time and formats it.
pub mod clock;
/// The [scheduler] module decides when the minute chime fires.
pub mod scheduler;
/// The [session] module owns the one stopwatch session per process.
pub mod session;
/// The [synth] module generates the chime's audio signal.
pub mod synth;
/// The [traits] module describes the interfaces between signal generators
/// and their consumers.
pub mod traits;

use std::ops::Mul;

/// [SampleType] is the underlying primitive that makes up [Sample] and
/// [StereoSample].
pub type SampleType = f64;

/// Use [ParameterType] for quantities without range restrictions, such as a
/// frequency in Hertz.
pub type ParameterType = f64;

/// [Sample] represents a single audio sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Sample(pub SampleType);
impl Sample {
    pub const SILENCE_VALUE: SampleType = 0.0;
    pub const SILENCE: Sample = Sample(Self::SILENCE_VALUE);
}
impl Mul<f64> for Sample {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// [StereoSample] is a two-channel [Sample], left then right.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoSample(pub Sample, pub Sample);
impl StereoSample {
    pub const SILENCE: StereoSample = StereoSample(Sample::SILENCE, Sample::SILENCE);
}
impl From<Sample> for StereoSample {
    fn from(value: Sample) -> Self {
        Self(value, value)
    }
}

/// The version number given in the crate metadata.
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_scales_and_widens_to_stereo() {
        let attenuated = Sample(0.5) * 0.5;
        assert_eq!(attenuated, Sample(0.25));
        assert_eq!(
            StereoSample::from(attenuated),
            StereoSample(attenuated, attenuated)
        );
        assert_eq!(
            StereoSample::from(Sample::SILENCE),
            StereoSample::SILENCE
        );
    }
}

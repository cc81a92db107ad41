//! Check of a digitized ECG capture.
//!
//! The capture passes if the main (QRS) peak around 0.25 s is visible in the
//! samples.
use core::ops::Range;

use super::sink::Sample;

/// Lowest sampled voltage that counts as the main peak.
pub const PEAK_THRESHOLD: f64 = 0.012;

/// Time window of the main peak in seconds.
pub const PEAK_WINDOW: Range<f64> = 0.2..0.3;

pub const HINTS: [&str; 3] = [
    "Make sure that the time between conversions is smaller than the duration of the voltage peak at approximately 0.25 seconds.",
    "Use a number of bits that differentiates between the main voltage peak at approximately 0.25 seconds and the smaller peak at approximately 0.48 seconds.",
    "Check whether the maximum voltage is appropriate. It is a good idea to set it to the maximum voltage of the input signal.",
];

/// Settings known to capture the peak.
pub const SOLUTION: &str =
    "/bits=8 /maximum_voltage=0.02 /time_between_conversions=0.02";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Assessment {
    /// The peak was captured by this sample.
    Pass(Sample),
    Fail,
}

impl Assessment {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

pub fn assess(samples: impl IntoIterator<Item = Sample>) -> Assessment {
    samples
        .into_iter()
        .find(|s| s.voltage > PEAK_THRESHOLD && PEAK_WINDOW.contains(&s.time))
        .map_or(Assessment::Fail, Assessment::Pass)
}

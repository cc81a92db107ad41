//! Headless simulation of digital-to-analog and analog-to-digital conversion.
//!
//! The sessions in this crate replay the classic teaching setups:
//!
//! * [dac::Sweep] walks the bits of an R-2R ladder DAC and records its output.
//! * [adc::SuccessiveApproximationConverter] digitizes a continuous signal by
//!   binary search against an R-2R ladder.
//! * [fixed::FixedPointSession] shows how a word of bits decodes to a
//!   fixed-point number.
//!
//! All sessions report to a [sink::SampleSink] as a one-way stream of
//! [sink::Event]s and are paced by an [embedded_hal::delay::DelayNs].

use core::ops::RangeInclusive;

pub mod adc;
pub mod assessment;
pub mod dac;
pub mod fixed;
pub mod pacing;
pub mod settings;
pub mod sink;

pub use analog_signal;
pub use fixed_point;
pub use r2r_ladder;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("DAC: {0}")]
    Dac(#[from] r2r_ladder::Error),
    #[error("Fixed point: {0}")]
    FixedPoint(#[from] fixed_point::Error),
    #[error("Signal: {0}")]
    Signal(#[from] analog_signal::Error),
    #[error("Invalid resolution {bits}, must be within {range:?}")]
    Resolution {
        bits: u32,
        range: RangeInclusive<u32>,
    },
    #[error("Invalid interval {0}, must be larger than zero")]
    Interval(f64),
    #[error("Invalid duration {0}")]
    Duration(f64),
    #[error("Setting `{path}`: {message}")]
    Settings { path: String, message: String },
    #[error("Event encoding")]
    Encode,
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn check_interval(interval: f64) -> Result<f64, Error> {
    if interval > 0.0 && interval.is_finite() {
        Ok(interval)
    } else {
        Err(Error::Interval(interval))
    }
}

pub(crate) fn check_duration(duration: f64) -> Result<f64, Error> {
    if duration >= 0.0 && duration.is_finite() {
        Ok(duration)
    } else {
        Err(Error::Duration(duration))
    }
}

/// Tolerance of a run endpoint in units of the step interval.
///
/// A step whose time exceeds the duration by less than this is still taken.
pub const ENDPOINT_TOLERANCE: f64 = 1e-9;

/// Index of the last step at or before `duration`.
pub(crate) fn last_step(duration: f64, interval: f64) -> u64 {
    (duration / interval + ENDPOINT_TOLERANCE).floor() as u64
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint() {
        assert_eq!(last_step(0.7, 0.02), 35);
        assert_eq!(last_step(0.7, 0.1), 7);
        assert_eq!(last_step(0.3, 0.1), 3);
        assert_eq!(last_step(0.35, 0.1), 3);
        assert_eq!(last_step(0.0, 0.5), 0);
        assert_eq!(last_step(0.4, 0.5), 0);
    }
}

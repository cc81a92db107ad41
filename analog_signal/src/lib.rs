#![cfg_attr(not(test), no_std)]
//! Continuous analog test signals.
//!
//! A converter never reads a signal value directly. It only asks whether the
//! signal at a given time is below a candidate voltage. This admits signals
//! that are defined geometrically (as a filled region) rather than by a closed
//! form expression.

use core::ops::RangeInclusive;

use miniconf::Tree;
use serde::{Deserialize, Serialize};

mod ecg;
pub use ecg::Ecg;

/// Comparison oracle of a continuous signal.
pub trait ContinuousSignal {
    /// Time span the signal is defined over, starting at zero.
    fn time_range(&self) -> RangeInclusive<f64>;

    /// Span of the signal values, starting at zero.
    fn value_range(&self) -> RangeInclusive<f64>;

    /// Whether the true signal value at `time` is below `value`.
    fn is_below(&self, time: f64, value: f64) -> bool;
}

impl<S: ContinuousSignal + ?Sized> ContinuousSignal for &S {
    fn time_range(&self) -> RangeInclusive<f64> {
        (**self).time_range()
    }

    fn value_range(&self) -> RangeInclusive<f64> {
        (**self).value_range()
    }

    fn is_below(&self, time: f64, value: f64) -> bool {
        (**self).is_below(time, value)
    }
}

/// Represents the errors that can occur when configuring a signal.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Signal level out of range.
    #[error("Invalid level {0}")]
    Level(f64),
    /// Signal duration out of range.
    #[error("Invalid duration {0}")]
    Duration(f64),
}

fn check_duration(duration: f64) -> Result<f64, Error> {
    if duration > 0.0 && duration.is_finite() {
        Ok(duration)
    } else {
        Err(Error::Duration(duration))
    }
}

/// A DC level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Constant {
    value: f64,
    duration: f64,
}

impl Constant {
    pub fn new(value: f64, duration: f64) -> Result<Self, Error> {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(Error::Level(value));
        }
        Ok(Self {
            value,
            duration: check_duration(duration)?,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl ContinuousSignal for Constant {
    fn time_range(&self) -> RangeInclusive<f64> {
        0.0..=self.duration
    }

    fn value_range(&self) -> RangeInclusive<f64> {
        0.0..=self.value
    }

    fn is_below(&self, _time: f64, value: f64) -> bool {
        self.value < value
    }
}

/// A linear ramp starting at zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ramp {
    slope: f64,
    duration: f64,
}

impl Ramp {
    /// Construct a ramp rising by `slope` volts per second.
    pub fn new(slope: f64, duration: f64) -> Result<Self, Error> {
        if !(slope >= 0.0 && slope.is_finite()) {
            return Err(Error::Level(slope));
        }
        Ok(Self {
            slope,
            duration: check_duration(duration)?,
        })
    }

    pub fn value(&self, time: f64) -> f64 {
        self.slope * time.clamp(0.0, self.duration)
    }
}

impl ContinuousSignal for Ramp {
    fn time_range(&self) -> RangeInclusive<f64> {
        0.0..=self.duration
    }

    fn value_range(&self) -> RangeInclusive<f64> {
        0.0..=self.slope * self.duration
    }

    fn is_below(&self, time: f64, value: f64) -> bool {
        self.value(time) < value
    }
}

/// Any of the available signals.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Waveform {
    Ecg(Ecg),
    Constant(Constant),
    Ramp(Ramp),
}

impl From<Ecg> for Waveform {
    fn from(value: Ecg) -> Self {
        Self::Ecg(value)
    }
}

impl From<Constant> for Waveform {
    fn from(value: Constant) -> Self {
        Self::Constant(value)
    }
}

impl From<Ramp> for Waveform {
    fn from(value: Ramp) -> Self {
        Self::Ramp(value)
    }
}

impl ContinuousSignal for Waveform {
    fn time_range(&self) -> RangeInclusive<f64> {
        match self {
            Self::Ecg(s) => s.time_range(),
            Self::Constant(s) => s.time_range(),
            Self::Ramp(s) => s.time_range(),
        }
    }

    fn value_range(&self) -> RangeInclusive<f64> {
        match self {
            Self::Ecg(s) => s.value_range(),
            Self::Constant(s) => s.value_range(),
            Self::Ramp(s) => s.value_range(),
        }
    }

    #[inline]
    fn is_below(&self, time: f64, value: f64) -> bool {
        match self {
            Self::Ecg(s) => s.is_below(time, value),
            Self::Constant(s) => s.is_below(time, value),
            Self::Ramp(s) => s.is_below(time, value),
        }
    }
}

/// Types of signals that can be selected.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Signal {
    Ecg,
    Constant,
    Ramp,
}

/// Signal selection settings.
#[derive(Clone, Debug, Tree, Serialize, Deserialize)]
pub struct Config {
    /// The input signal. See [Signal] variants.
    #[tree(with=miniconf::leaf)]
    pub signal: Signal,

    /// Constant: level in volts. Ramp: slope in volts per second. Unused for ECG.
    pub level: f64,

    /// Duration in seconds. Unused for ECG.
    pub duration: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signal: Signal::Ecg,
            level: 0.01,
            duration: Ecg::DURATION,
        }
    }
}

impl Config {
    pub fn build(&self) -> Result<Waveform, Error> {
        Ok(match self.signal {
            Signal::Ecg => Ecg::new().into(),
            Signal::Constant => {
                Constant::new(self.level, self.duration)?.into()
            }
            Signal::Ramp => Ramp::new(self.level, self.duration)?.into(),
        })
    }
}

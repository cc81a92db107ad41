//! Session Settings
//!
//! # Design
//! Each demo application has a settings tree. The defaults reproduce the
//! classic classroom setups. Individual leaves can be overridden from the
//! command line using `path=value` pairs where `path` is the slash separated
//! path of the leaf and `value` is its JSON representation, e.g.
//!
//! ```text
//! adc /bits=6 /signal/signal='"Ramp"' /signal/level=0.03
//! ```
//!
//! Settings are validated when the session is built from them.
use analog_signal::Waveform;
use fixed_point::{FixedPointDecoder, Fraction};
use miniconf::{Tree, TreeDeserializeOwned};
use r2r_ladder::R2RResistorLadder;
use serde::{Deserialize, Serialize};

use super::{
    adc::SuccessiveApproximationConverter, check_duration, dac::Sweep,
    fixed::FixedPointSession, Error,
};

/// Apply `path=value` overrides to a settings tree.
pub fn apply<'a, T: TreeDeserializeOwned>(
    settings: &mut T,
    overrides: impl IntoIterator<Item = &'a str>,
) -> Result<(), Error> {
    for arg in overrides {
        let Some((path, value)) = arg.split_once('=') else {
            return Err(Error::Settings {
                path: arg.into(),
                message: "expected `path=value`".into(),
            });
        };
        miniconf::json_core::set(settings, path, value.as_bytes()).map_err(
            |e| Error::Settings {
                path: path.into(),
                message: format!("{e:?}"),
            },
        )?;
        log::info!("Set `{path}` to {value}");
    }
    Ok(())
}

#[derive(Clone, Debug, Tree, Serialize, Deserialize)]
pub struct DacSweepSettings {
    /// DAC resolution
    ///
    /// # Value
    /// Integer within [2, 64]
    pub bits: u32,

    /// DAC full scale output voltage in volts
    ///
    /// # Value
    /// Positive float
    pub maximum_voltage: f64,

    /// Interval between DAC updates in seconds
    ///
    /// # Value
    /// Positive float
    pub time_between_updates: f64,

    /// Simulated duration in seconds
    pub duration: f64,

    /// Playback pause per update in milliseconds, 0 for headless operation
    pub pace_ms: u32,
}

impl Default for DacSweepSettings {
    fn default() -> Self {
        Self {
            bits: 5,
            maximum_voltage: 10.0,
            time_between_updates: 0.5,
            duration: 7.0,
            pace_ms: 500,
        }
    }
}

impl DacSweepSettings {
    pub fn build(&self) -> Result<Sweep, Error> {
        check_duration(self.duration)?;
        Sweep::new(
            R2RResistorLadder::new(self.bits, self.maximum_voltage)?,
            self.time_between_updates,
        )
    }
}

#[derive(Clone, Debug, Tree, Serialize, Deserialize)]
pub struct AdcSettings {
    /// Converter resolution
    ///
    /// # Value
    /// Integer within [1, 64]
    pub bits: u32,

    /// Full scale input voltage in volts, the DAC reference
    ///
    /// # Value
    /// Positive float
    pub maximum_voltage: f64,

    /// Sampling interval in seconds
    ///
    /// # Value
    /// Positive float
    pub time_between_conversions: f64,

    /// Simulated duration in seconds, 0 for the length of the input signal
    pub duration: f64,

    /// The input signal
    pub signal: analog_signal::Config,

    /// Playback pause per conversion in milliseconds, 0 for headless operation
    pub pace_ms: u32,
}

impl Default for AdcSettings {
    fn default() -> Self {
        Self {
            bits: 8,
            maximum_voltage: analog_signal::Ecg::VOLTAGE,
            time_between_conversions: 0.02,
            duration: 0.0,
            signal: Default::default(),
            pace_ms: 100,
        }
    }
}

impl AdcSettings {
    /// Build the converter, the input signal and the conversion duration.
    pub fn build(
        &self,
    ) -> Result<(SuccessiveApproximationConverter, Waveform, f64), Error> {
        use analog_signal::ContinuousSignal;

        let signal = self.signal.build()?;
        let duration = check_duration(self.duration)?;
        let duration = if duration == 0.0 {
            *signal.time_range().end()
        } else {
            duration
        };
        let adc = SuccessiveApproximationConverter::new(
            R2RResistorLadder::new(self.bits, self.maximum_voltage)?,
            self.time_between_conversions,
        )?;
        Ok((adc, signal, duration))
    }
}

#[derive(Clone, Debug, Tree, Serialize, Deserialize)]
pub struct FixedPointSettings {
    /// Word length
    ///
    /// # Value
    /// Integer within [1, 64]
    pub bits: u32,

    /// Scaling factor nominator
    pub nominator: i64,

    /// Scaling factor denominator
    ///
    /// # Value
    /// Nonzero integer
    pub denominator: i64,

    /// Bits to set, in order
    #[tree(with=miniconf::leaf)]
    pub set_bits: heapless::Vec<u32, 64>,

    /// Bits to clear after setting, in order
    #[tree(with=miniconf::leaf)]
    pub clear_bits: heapless::Vec<u32, 64>,

    /// Playback pause per step in milliseconds, 0 for headless operation
    pub pace_ms: u32,
}

impl Default for FixedPointSettings {
    fn default() -> Self {
        Self {
            bits: 8,
            nominator: 1,
            denominator: 255,
            set_bits: heapless::Vec::from_slice(&[0, 1, 4, 5])
                .unwrap_or_default(),
            clear_bits: heapless::Vec::new(),
            pace_ms: 1500,
        }
    }
}

impl FixedPointSettings {
    pub fn build(&self) -> Result<FixedPointSession, Error> {
        let scale = Fraction::new(self.nominator, self.denominator)?;
        Ok(FixedPointSession::new(FixedPointDecoder::new(self.bits, scale)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analog_signal::{ContinuousSignal, Signal};

    #[test]
    fn defaults() {
        let sweep = DacSweepSettings::default().build().unwrap();
        assert_eq!(sweep.dac().number_of_bits(), 5);
        let (adc, signal, duration) = AdcSettings::default().build().unwrap();
        assert_eq!(adc.dac().number_of_bits(), 8);
        assert_eq!(duration, 0.7);
        assert_eq!(signal.value_range(), 0.0..=0.02);
        let fixed = FixedPointSettings::default();
        assert_eq!(fixed.set_bits[..], [0, 1, 4, 5]);
        assert_eq!(fixed.build().unwrap().word().raw(), 0);
    }

    #[test]
    fn overrides() {
        let mut s = AdcSettings::default();
        apply(
            &mut s,
            ["/bits=6", "/maximum_voltage=1.5", "/signal/level=0.25"],
        )
        .unwrap();
        assert_eq!(s.bits, 6);
        assert_eq!(s.maximum_voltage, 1.5);
        assert_eq!(s.signal.level, 0.25);
        s.signal.signal = Signal::Constant;
        s.signal.duration = 2.0;
        let (_, _, duration) = s.build().unwrap();
        assert_eq!(duration, 2.0);

        assert!(matches!(
            apply(&mut s, ["/bits"]),
            Err(Error::Settings { .. })
        ));
        assert!(matches!(
            apply(&mut s, ["/nonexistent=1"]),
            Err(Error::Settings { .. })
        ));
    }

    #[test]
    fn validation() {
        let mut s = DacSweepSettings::default();
        s.bits = 1;
        assert!(matches!(s.build(), Err(Error::Resolution { .. })));
        s.bits = 65;
        assert!(matches!(
            s.build(),
            Err(Error::Dac(r2r_ladder::Error::Resolution(65)))
        ));
        s.bits = 5;
        s.maximum_voltage = 0.0;
        assert!(matches!(
            s.build(),
            Err(Error::Dac(r2r_ladder::Error::ReferenceVoltage(_)))
        ));

        let mut s = AdcSettings::default();
        s.time_between_conversions = -0.1;
        assert!(matches!(s.build(), Err(Error::Interval(_))));
        s.time_between_conversions = 0.1;
        s.duration = f64::NAN;
        assert!(matches!(s.build(), Err(Error::Duration(_))));

        let mut s = FixedPointSettings::default();
        s.denominator = 0;
        assert!(matches!(
            s.build(),
            Err(Error::FixedPoint(fixed_point::Error::ZeroDenominator))
        ));
    }
}

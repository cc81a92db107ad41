//! Successive approximation ADC
//!
//! A successive approximation register (SAR) converter determines the digital
//! code of an analog input by binary search. Starting from the most significant
//! bit, each bit is tentatively set and the resulting DAC output is compared to
//! the input. If the DAC output exceeds the input, the bit is cleared again.
//! After `N` comparisons the register holds the largest code whose DAC voltage
//! does not exceed the input.
//!
//! Like the hardware it models, the search never terminates early: every
//! conversion takes exactly `N` steps.
use analog_signal::ContinuousSignal;
use embedded_hal::delay::DelayNs;
use r2r_ladder::R2RResistorLadder;

use super::{
    check_duration, check_interval, last_step,
    pacing::Pacer,
    sink::{Event, Sample, SampleSink},
    Error,
};

/// The result of one conversion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Conversion {
    /// Simulated time of the conversion in seconds.
    pub time: f64,
    /// Digital output code.
    pub code: u64,
    /// DAC voltage of the output code.
    pub voltage: f64,
}

impl From<Conversion> for Sample {
    fn from(c: Conversion) -> Self {
        Self {
            time: c.time,
            voltage: c.voltage,
        }
    }
}

/// A conversion session: the SAR logic, its DAC and the simulated clock.
#[derive(Clone, Debug)]
pub struct SuccessiveApproximationConverter {
    dac: R2RResistorLadder,
    time_between_conversions: f64,
    step: u64,
}

impl SuccessiveApproximationConverter {
    /// Construct a converter at time zero.
    ///
    /// # Args
    /// * `dac` - The feedback DAC. Its resolution is the converter resolution and its reference
    ///   voltage the full scale input voltage.
    /// * `time_between_conversions` - Sampling interval in seconds. Must be larger than zero.
    pub fn new(
        mut dac: R2RResistorLadder,
        time_between_conversions: f64,
    ) -> Result<Self, Error> {
        dac.clear_all_bits();
        Ok(Self {
            dac,
            time_between_conversions: check_interval(time_between_conversions)?,
            step: 0,
        })
    }

    pub fn dac(&self) -> &R2RResistorLadder {
        &self.dac
    }

    /// Current simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.step as f64 * self.time_between_conversions
    }

    pub fn time_between_conversions(&self) -> f64 {
        self.time_between_conversions
    }

    /// Describe the converter to a display and reset the display state.
    pub fn announce<K: SampleSink + ?Sized>(&mut self, sink: &mut K) {
        sink.send(Event::SetDacResolution(self.dac.number_of_bits()));
        sink.send(Event::SetMaximumVoltage(self.dac.reference_voltage()));
        sink.send(Event::ClearSamples);
        self.dac.clear_all_bits();
        sink.send(Event::ClearAllBits);
    }

    /// Perform one conversion at the current time.
    ///
    /// Emits the bit decisions and the final sample to `sink`. The clock is
    /// not advanced, see [Self::advance()].
    pub fn convert<S, K, D>(
        &mut self,
        signal: &S,
        sink: &mut K,
        pacer: &mut Pacer<D>,
    ) -> Result<Conversion, Error>
    where
        S: ContinuousSignal + ?Sized,
        K: SampleSink + ?Sized,
        D: DelayNs,
    {
        let time = self.time();
        self.dac.clear_all_bits();
        for index in (0..self.dac.number_of_bits()).rev() {
            self.dac.set_bit(index)?;
            sink.send(Event::SetBit(index));
            let voltage = self.dac.output_voltage();
            sink.send(Event::ShowOutputVoltage(Sample { time, voltage }));
            // Reject if the trial voltage strictly exceeds the input, ties keep the bit.
            let reject = signal.is_below(time, voltage);
            if reject {
                self.dac.clear_bit(index)?;
                sink.send(Event::ClearBit(index));
            }
            log::trace!("t={time} bit {index}: {voltage} V, keep {}", !reject);
            pacer.step();
        }

        let conversion = Conversion {
            time,
            code: self.dac.pattern(),
            voltage: self.dac.output_voltage(),
        };
        sink.send(Event::SaveSample(conversion.into()));
        log::debug!(
            "t={time}: code {:#x}, {} V",
            conversion.code,
            conversion.voltage
        );

        self.dac.clear_all_bits();
        sink.send(Event::ClearAllBits);
        Ok(conversion)
    }

    /// Advance the clock to the next conversion.
    pub fn advance(&mut self) {
        self.step += 1;
    }

    /// Restart the clock at zero, announce and convert every interval up to
    /// and including `duration`.
    ///
    /// A conversion within [crate::ENDPOINT_TOLERANCE] intervals past
    /// `duration` is still taken.
    ///
    /// # Returns
    /// All conversions in order of time.
    pub fn run<S, K, D>(
        &mut self,
        signal: &S,
        sink: &mut K,
        pacer: &mut Pacer<D>,
        duration: f64,
    ) -> Result<Vec<Conversion>, Error>
    where
        S: ContinuousSignal + ?Sized,
        K: SampleSink + ?Sized,
        D: DelayNs,
    {
        let duration = check_duration(duration)?;
        log::info!(
            "Converting {duration} s at {} bits, {} V full scale, every {} s",
            self.dac.number_of_bits(),
            self.dac.reference_voltage(),
            self.time_between_conversions
        );
        self.step = 0;
        self.announce(sink);
        let last = last_step(duration, self.time_between_conversions);
        let mut conversions = Vec::new();
        while self.step <= last {
            conversions.push(self.convert(signal, sink, pacer)?);
            pacer.wait();
            self.advance();
        }
        log::info!("Captured {} samples", conversions.len());
        Ok(conversions)
    }
}

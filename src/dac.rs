//! R-2R DAC bit sweep
//!
//! Demonstrates the DAC transfer function: one bit after the other is set
//! until the output reaches full scale, then all bits are cleared and the
//! cycle repeats. The DAC output is only updated at fixed intervals and held
//! in between.
use embedded_hal::delay::DelayNs;
use r2r_ladder::R2RResistorLadder;

use super::{
    check_duration, check_interval, last_step,
    pacing::Pacer,
    sink::{Event, Sample, SampleSink},
    Error,
};

/// Supported sweep resolutions.
pub const RESOLUTION: core::ops::RangeInclusive<u32> = 2..=64;

#[derive(Clone, Debug)]
pub struct Sweep {
    dac: R2RResistorLadder,
    time_between_updates: f64,
    step: u64,
}

impl Sweep {
    /// # Args
    /// * `dac` - The swept DAC, at least two bits wide.
    /// * `time_between_updates` - DAC update interval in seconds. Must be larger than zero.
    pub fn new(
        mut dac: R2RResistorLadder,
        time_between_updates: f64,
    ) -> Result<Self, Error> {
        let bits = dac.number_of_bits();
        if !RESOLUTION.contains(&bits) {
            return Err(Error::Resolution {
                bits,
                range: RESOLUTION,
            });
        }
        dac.clear_all_bits();
        Ok(Self {
            dac,
            time_between_updates: check_interval(time_between_updates)?,
            step: 0,
        })
    }

    pub fn dac(&self) -> &R2RResistorLadder {
        &self.dac
    }

    /// Current simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.step as f64 * self.time_between_updates
    }

    fn sample(&self) -> Event {
        Event::SaveSample(Sample {
            time: self.time(),
            voltage: self.dac.output_voltage(),
        })
    }

    /// Restart the clock at zero and sweep for
    /// `floor(duration / time_between_updates)` updates.
    ///
    /// The ratio is rounded up when within [crate::ENDPOINT_TOLERANCE] of the
    /// next integer.
    pub fn run<K, D>(
        &mut self,
        sink: &mut K,
        pacer: &mut Pacer<D>,
        duration: f64,
    ) -> Result<(), Error>
    where
        K: SampleSink + ?Sized,
        D: DelayNs,
    {
        let duration = check_duration(duration)?;
        let bits = self.dac.number_of_bits();
        let steps = last_step(duration, self.time_between_updates);
        log::info!(
            "Sweeping {bits} bits, {} V full scale, {steps} updates",
            self.dac.reference_voltage()
        );

        sink.send(Event::SetDacResolution(bits));
        sink.send(Event::SetMaximumVoltage(self.dac.reference_voltage()));
        sink.send(Event::ClearSamples);
        self.step = 0;
        self.dac.clear_all_bits();
        sink.send(Event::ClearAllBits);

        while self.step < steps {
            match (self.step % (bits as u64 + 1)) as u32 {
                0 => {
                    self.dac.clear_all_bits();
                    sink.send(Event::ClearAllBits);
                }
                bit => {
                    self.dac.set_bit(bit - 1)?;
                    sink.send(Event::SetBit(bit - 1));
                }
            }
            sink.send(self.sample());
            log::debug!(
                "t={}: {:#x}, {} V",
                self.time(),
                self.dac.pattern(),
                self.dac.output_voltage()
            );
            pacer.step();

            // Hold the output until the next update
            self.step += 1;
            sink.send(self.sample());
            pacer.wait();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Recorder;

    #[test]
    fn rejects_resolution() {
        let dac = R2RResistorLadder::new(1, 1.0).unwrap();
        assert!(matches!(
            Sweep::new(dac, 0.5),
            Err(Error::Resolution { bits: 1, .. })
        ));
        let dac = R2RResistorLadder::new(2, 1.0).unwrap();
        assert!(matches!(Sweep::new(dac, 0.0), Err(Error::Interval(_))));
    }

    #[test]
    fn hold() {
        let dac = R2RResistorLadder::new(3, 7.0).unwrap();
        let mut sweep = Sweep::new(dac, 0.25).unwrap();
        let mut rec = Recorder::new();
        sweep.run(&mut rec, &mut Pacer::headless(), 1.0).unwrap();
        assert_eq!(sweep.time(), 1.0);
        let v: Vec<(f64, f64)> =
            rec.samples().iter().map(|s| (s.time, s.voltage)).collect();
        assert_eq!(
            v,
            [
                (0.0, 0.0),
                (0.25, 0.0),
                (0.25, 1.0),
                (0.5, 1.0),
                (0.5, 3.0),
                (0.75, 3.0),
                (0.75, 7.0),
                (1.0, 7.0)
            ]
        );
    }

    #[test]
    fn rerun() {
        let dac = R2RResistorLadder::new(3, 7.0).unwrap();
        let mut sweep = Sweep::new(dac, 0.1).unwrap();
        let mut rec = Recorder::new();
        sweep.run(&mut rec, &mut Pacer::headless(), 0.3).unwrap();
        let first = rec.samples().to_vec();
        // 0.3 / 0.1 rounds to just below 3
        assert_eq!(first.len(), 6);
        sweep.run(&mut rec, &mut Pacer::headless(), 0.3).unwrap();
        assert_eq!(rec.samples(), &first[..]);
        assert_eq!(rec.samples()[0].time, 0.0);
        assert_eq!(sweep.time(), 3.0 * 0.1);
    }
}

#![cfg_attr(not(test), no_std)]
//! R-2R resistor ladder digital-to-analog converter model.
//!
//! Every bit of the digital input drives one switch of the ladder. A set bit
//! connects its 2R leg to the reference voltage, a cleared bit connects it to
//! ground. The superposition of all legs yields an output voltage that is
//! proportional to the input code:
//!
//! `V_out = V_ref * code / (2^N - 1)`
//!
//! so that a full code outputs `V_ref` and a zero code outputs 0 V.

use num_traits::float::FloatCore;

/// Widest supported ladder, in bits.
pub const MAX_BITS: u32 = u64::BITS;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Invalid resolution {0}, must be within 1..=64 bits")]
    Resolution(u32),
    #[error("Invalid reference voltage {0}, must be larger than zero")]
    ReferenceVoltage(f64),
    #[error("Bit index {index} out of range for {bits} bit ladder")]
    BitIndex { index: u32, bits: u32 },
}

/// Simulated R-2R ladder with a fixed resolution and reference voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct R2RResistorLadder {
    number_of_bits: u32,
    reference_voltage: f64,
    pattern: u64,
}

impl R2RResistorLadder {
    /// Construct a ladder with all switches connected to ground.
    ///
    /// # Args
    /// * `number_of_bits` - Number of ladder stages, within `1..=64`.
    /// * `reference_voltage` - Voltage of a set switch. Must be larger than zero.
    pub fn new(
        number_of_bits: u32,
        reference_voltage: f64,
    ) -> Result<Self, Error> {
        if !(1..=MAX_BITS).contains(&number_of_bits) {
            return Err(Error::Resolution(number_of_bits));
        }
        // Also rejects NaN
        if !(reference_voltage > 0.0) {
            return Err(Error::ReferenceVoltage(reference_voltage));
        }
        Ok(Self {
            number_of_bits,
            reference_voltage,
            pattern: 0,
        })
    }

    pub fn number_of_bits(&self) -> u32 {
        self.number_of_bits
    }

    pub fn reference_voltage(&self) -> f64 {
        self.reference_voltage
    }

    /// Current digital input code.
    pub fn pattern(&self) -> u64 {
        self.pattern
    }

    /// Mask of all valid bits.
    pub fn mask(&self) -> u64 {
        u64::MAX >> (MAX_BITS - self.number_of_bits)
    }

    fn check(&self, index: u32) -> Result<u64, Error> {
        if index < self.number_of_bits {
            Ok(1 << index)
        } else {
            Err(Error::BitIndex {
                index,
                bits: self.number_of_bits,
            })
        }
    }

    /// Connect the switch at `index` to the reference voltage.
    pub fn set_bit(&mut self, index: u32) -> Result<(), Error> {
        self.pattern |= self.check(index)?;
        Ok(())
    }

    /// Connect the switch at `index` to ground.
    pub fn clear_bit(&mut self, index: u32) -> Result<(), Error> {
        self.pattern &= !self.check(index)?;
        Ok(())
    }

    pub fn clear_all_bits(&mut self) {
        self.pattern = 0;
    }

    pub fn is_set(&self, index: u32) -> Result<bool, Error> {
        Ok(self.pattern & self.check(index)? != 0)
    }

    /// Full scale code count `2^N - 1`.
    ///
    /// Computed in floating point, `1 << 64` would overflow.
    fn full_scale(&self) -> f64 {
        FloatCore::powi(2.0f64, self.number_of_bits as i32) - 1.0
    }

    /// Output voltage of an arbitrary code. Bits beyond the resolution are ignored.
    pub fn voltage_for(&self, pattern: u64) -> f64 {
        self.reference_voltage * (pattern & self.mask()) as f64
            / self.full_scale()
    }

    /// Output voltage for the current switch positions.
    pub fn output_voltage(&self) -> f64 {
        self.voltage_for(self.pattern)
    }

    /// Voltage step of the least significant bit.
    pub fn lsb_voltage(&self) -> f64 {
        self.reference_voltage / self.full_scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isclose(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
        (a - b).abs() <= a.abs().max(b.abs()) * rtol + atol
    }

    #[test]
    fn rejects_resolution() {
        assert_eq!(R2RResistorLadder::new(0, 1.0), Err(Error::Resolution(0)));
        assert_eq!(
            R2RResistorLadder::new(65, 1.0),
            Err(Error::Resolution(65))
        );
        assert!(R2RResistorLadder::new(1, 1.0).is_ok());
        assert!(R2RResistorLadder::new(64, 1.0).is_ok());
    }

    #[test]
    fn rejects_reference() {
        assert!(matches!(
            R2RResistorLadder::new(4, 0.0),
            Err(Error::ReferenceVoltage(_))
        ));
        assert!(matches!(
            R2RResistorLadder::new(4, -1.0),
            Err(Error::ReferenceVoltage(_))
        ));
        assert!(matches!(
            R2RResistorLadder::new(4, f64::NAN),
            Err(Error::ReferenceVoltage(_))
        ));
    }

    #[test]
    fn rejects_index() {
        let mut dac = R2RResistorLadder::new(5, 10.0).unwrap();
        assert_eq!(
            dac.set_bit(5),
            Err(Error::BitIndex { index: 5, bits: 5 })
        );
        assert_eq!(
            dac.clear_bit(7),
            Err(Error::BitIndex { index: 7, bits: 5 })
        );
        assert_eq!(dac.pattern(), 0);
    }

    #[test]
    fn msb() {
        let mut dac = R2RResistorLadder::new(5, 10.0).unwrap();
        dac.set_bit(4).unwrap();
        assert_eq!(dac.pattern(), 0b10000);
        assert!(isclose(dac.output_voltage(), 10.0 * 16.0 / 31.0, 1e-12, 0.0));
        assert!(isclose(dac.output_voltage(), 5.1613, 0.0, 1e-4));
    }

    #[test]
    fn full_and_zero_scale() {
        for bits in 1..=MAX_BITS {
            let mut dac = R2RResistorLadder::new(bits, 3.3).unwrap();
            assert_eq!(dac.output_voltage(), 0.0);
            for i in 0..bits {
                dac.set_bit(i).unwrap();
            }
            assert_eq!(dac.pattern(), dac.mask());
            assert!(
                isclose(dac.output_voltage(), 3.3, 1e-12, 0.0),
                "{bits}: {}",
                dac.output_voltage()
            );
            dac.clear_all_bits();
            assert_eq!(dac.output_voltage(), 0.0);
        }
    }

    #[test]
    fn idempotent() {
        let mut dac = R2RResistorLadder::new(8, 5.0).unwrap();
        dac.set_bit(3).unwrap();
        let v = dac.output_voltage();
        dac.set_bit(3).unwrap();
        assert_eq!(dac.output_voltage(), v);
        dac.clear_bit(2).unwrap();
        assert_eq!(dac.output_voltage(), v);
        dac.clear_bit(3).unwrap();
        dac.clear_bit(3).unwrap();
        assert_eq!(dac.output_voltage(), 0.0);
        assert!(!dac.is_set(3).unwrap());
    }

    #[test]
    fn lsb() {
        let dac = R2RResistorLadder::new(8, 2.55).unwrap();
        assert!(isclose(dac.lsb_voltage(), 0.01, 1e-12, 0.0));
        assert!(isclose(dac.voltage_for(0x1ff), 2.55, 1e-12, 0.0));
    }
}

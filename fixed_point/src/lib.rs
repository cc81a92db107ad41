#![cfg_attr(not(test), no_std)]
//! Unsigned fixed-point numbers.
//!
//! A fixed-point number is an integer whose value is interpreted as scaled by
//! a constant rational factor: `value = raw * nominator / denominator`.

use core::fmt;

/// Widest supported fixed-point word, in bits.
pub const MAX_BITS: u32 = u64::BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("The denominator must not be zero")]
    ZeroDenominator,
    #[error("Invalid number of bits {0}, must be within 1..=64")]
    Resolution(u32),
    #[error("Bit index {index} out of range for {bits} bits")]
    BitIndex { index: u32, bits: u32 },
    #[error("Sign of {nominator}/{denominator} can not be moved to the nominator")]
    Overflow { nominator: i64, denominator: i64 },
}

/// Exact rational number used as a scaling factor.
///
/// The denominator is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    nominator: i64,
    denominator: i64,
}

impl Fraction {
    pub const ONE: Self = Self {
        nominator: 1,
        denominator: 1,
    };

    pub fn new(nominator: i64, denominator: i64) -> Result<Self, Error> {
        if denominator == 0 {
            return Err(Error::ZeroDenominator);
        }
        // Move the sign to the nominator
        let (nominator, denominator) = if denominator < 0 {
            nominator
                .checked_neg()
                .zip(denominator.checked_neg())
                .ok_or(Error::Overflow {
                    nominator,
                    denominator,
                })?
        } else {
            (nominator, denominator)
        };
        Ok(Self {
            nominator,
            denominator,
        })
    }

    pub fn nominator(&self) -> i64 {
        self.nominator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn value(&self) -> f64 {
        self.nominator as f64 / self.denominator as f64
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<(i64, i64)> for Fraction {
    type Error = Error;
    fn try_from((nominator, denominator): (i64, i64)) -> Result<Self, Error> {
        Self::new(nominator, denominator)
    }
}

impl From<Fraction> for (i64, i64) {
    fn from(f: Fraction) -> Self {
        (f.nominator, f.denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{2044}{}", self.nominator, self.denominator)
    }
}

/// An unsigned fixed-point word of `number_of_bits` bits.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPointDecoder {
    number_of_bits: u32,
    scaling_factor: Fraction,
    raw: u64,
}

impl FixedPointDecoder {
    /// Construct a zero valued word.
    pub fn new(
        number_of_bits: u32,
        scaling_factor: Fraction,
    ) -> Result<Self, Error> {
        if !(1..=MAX_BITS).contains(&number_of_bits) {
            return Err(Error::Resolution(number_of_bits));
        }
        Ok(Self {
            number_of_bits,
            scaling_factor,
            raw: 0,
        })
    }

    pub fn number_of_bits(&self) -> u32 {
        self.number_of_bits
    }

    pub fn scaling_factor(&self) -> Fraction {
        self.scaling_factor
    }

    /// The word interpreted as an unsigned integer.
    pub fn raw(&self) -> u64 {
        self.raw
    }

    fn mask(&self, index: u32) -> Result<u64, Error> {
        if index < self.number_of_bits {
            Ok(1 << index)
        } else {
            Err(Error::BitIndex {
                index,
                bits: self.number_of_bits,
            })
        }
    }

    pub fn set_bit(&mut self, index: u32) -> Result<(), Error> {
        self.raw |= self.mask(index)?;
        Ok(())
    }

    pub fn clear_bit(&mut self, index: u32) -> Result<(), Error> {
        self.raw &= !self.mask(index)?;
        Ok(())
    }

    /// The word interpreted as a fixed-point number.
    pub fn decoded_value(&self) -> f64 {
        self.raw as f64 * self.scaling_factor.value()
    }
}

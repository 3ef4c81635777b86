//! Exact decimal literals.
//!
//! A decimal keeps the digits it was written with: `1.50` stays `1.50`. The value is an
//! unscaled integer and a scale, `unscaled * 10^-scale`.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;
use std::str::FromStr;

/// Largest scale or power-of-ten shift a literal may carry.
pub const MAX_EXP: u32 = 4 << 10; // 4096

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }
}

/// Error returned when text is not a plain decimal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError(String);

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal literal '{}'", self.0)
    }
}

impl std::error::Error for ParseDecimalError {}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts `[-+]digits[.digits][(e|E)[-+]digits]`. The resulting scale, or the shift
    /// applied for a positive exponent, must not exceed [MAX_EXP].
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDecimalError(text.to_string());

        let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
            Some(at) => {
                let exponent: i64 = text[at + 1..].parse().map_err(|_| invalid())?;
                (&text[..at], exponent)
            }
            None => (text, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let digits = int_part.trim_start_matches(&['-', '+'][..]);
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
            || int_part.len() - digits.len() > 1
        {
            return Err(invalid());
        }

        let sign = if int_part.starts_with('-') { "-" } else { "" };
        let unscaled = BigInt::from_str(&format!("{}{}{}", sign, digits, frac_part))
            .map_err(|_| invalid())?;
        let scale = i64::try_from(frac_part.len())
            .ok()
            .and_then(|len| len.checked_sub(exponent))
            .ok_or_else(invalid)?;
        if scale.unsigned_abs() > u64::from(MAX_EXP) {
            return Err(invalid());
        }
        if scale >= 0 {
            let scale = u32::try_from(scale).map_err(|_| invalid())?;
            Ok(Decimal::new(unscaled, scale))
        } else {
            let shift = u32::try_from(-scale).map_err(|_| invalid())?;
            Ok(Decimal::new(unscaled * BigInt::from(10).pow(shift), 0))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.abs().to_string();
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        let sign = if self.unscaled.is_zero() { "" } else { sign };
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_source_digits() {
        let value: Decimal = "1.50".parse().unwrap();
        assert_eq!(value.scale(), 2);
        assert_eq!(value.unscaled(), &BigInt::from(150));
        assert_eq!(value.to_string(), "1.50");
    }

    #[test]
    fn test_small_and_negative_values() {
        assert_eq!("0.05".parse::<Decimal>().unwrap().to_string(), "0.05");
        assert_eq!("-0.5".parse::<Decimal>().unwrap().to_string(), "-0.5");
        assert_eq!("12".parse::<Decimal>().unwrap().to_string(), "12");
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!("1.5e3".parse::<Decimal>().unwrap().to_string(), "1500");
        assert_eq!("15E-3".parse::<Decimal>().unwrap().to_string(), "0.015");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("".parse::<Decimal>().is_err());
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("--1".parse::<Decimal>().is_err());
        assert!("abc".parse::<Decimal>().is_err());
        assert!("1e".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_exponent_out_of_range() {
        assert!("1e-9223372036854775808".parse::<Decimal>().is_err());
        assert!("1e9223372036854775807".parse::<Decimal>().is_err());
        assert!("1e-100000000".parse::<Decimal>().is_err());
        assert!("1e100000000".parse::<Decimal>().is_err());
        assert_eq!("1e-4096".parse::<Decimal>().unwrap().scale(), MAX_EXP);
        assert!("1e-4097".parse::<Decimal>().is_err());
    }
}

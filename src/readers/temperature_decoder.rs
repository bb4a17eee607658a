use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DECIMAL_POINT, DEFAULT_FRACTIONAL_DIGITS, MAX_FRACTIONAL_DIGITS, MINUS_SIGN,
};
use thiserror::Error;

/// Integer plus fractional digits that still fit exactly in an f64 mantissa
const MAX_TOTAL_DIGITS: usize = 15;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty value")]
    Empty,

    #[error("no integer digits before the decimal point")]
    MissingDigits,

    #[error("unexpected byte {byte:#04x} at position {position}")]
    UnexpectedByte { byte: u8, position: usize },

    #[error("missing decimal point")]
    MissingDecimalPoint,

    #[error("expected {expected} fractional digit(s), found {found}")]
    FractionalDigits { expected: u8, found: usize },

    #[error("value has more than 15 digits")]
    TooManyDigits,
}

/// Decoder for fixed-format decimals such as `-12.3`.
///
/// Accepts an optional leading `-`, one or more integer digits, a `.` and
/// exactly `fractional_digits` digits. The digits are accumulated as an exact
/// integer count of fractional units and divided once, so the result is the
/// nearest f64 to the written decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureDecoder {
    fractional_digits: u8,
    scale: f64,
}

impl TemperatureDecoder {
    pub fn new(fractional_digits: u8) -> Result<Self> {
        if fractional_digits == 0 || fractional_digits > MAX_FRACTIONAL_DIGITS {
            return Err(ProcessingError::Config(format!(
                "fractional digits must be between 1 and {}, got {}",
                MAX_FRACTIONAL_DIGITS, fractional_digits
            )));
        }

        Ok(Self {
            fractional_digits,
            scale: 10f64.powi(fractional_digits as i32),
        })
    }

    pub fn decode(&self, bytes: &[u8]) -> std::result::Result<f64, DecodeError> {
        let (negative, digits) = match bytes.split_first() {
            None => return Err(DecodeError::Empty),
            Some((&MINUS_SIGN, rest)) => (true, rest),
            Some(_) => (false, bytes),
        };
        let sign_len = usize::from(negative);

        if digits.is_empty() {
            return Err(DecodeError::MissingDigits);
        }

        let point = digits
            .iter()
            .rposition(|&b| b == DECIMAL_POINT)
            .ok_or(DecodeError::MissingDecimalPoint)?;
        if point == 0 {
            return Err(DecodeError::MissingDigits);
        }
        if digits.len() - 1 > MAX_TOTAL_DIGITS {
            return Err(DecodeError::TooManyDigits);
        }

        // Right to left: fractional digits first, then the integer part
        let mut units: u64 = 0;
        let mut place: u64 = 1;
        for (index, &byte) in digits.iter().enumerate().rev() {
            if index == point {
                continue;
            }
            let digit = byte.wrapping_sub(b'0');
            if digit > 9 {
                return Err(DecodeError::UnexpectedByte {
                    byte,
                    position: index + sign_len,
                });
            }
            units += u64::from(digit) * place;
            place *= 10;
        }

        let found = digits.len() - point - 1;
        if found != self.fractional_digits as usize {
            return Err(DecodeError::FractionalDigits {
                expected: self.fractional_digits,
                found,
            });
        }

        let value = units as f64 / self.scale;
        Ok(if negative { -value } else { value })
    }
}

impl Default for TemperatureDecoder {
    fn default() -> Self {
        Self {
            fractional_digits: DEFAULT_FRACTIONAL_DIGITS,
            scale: 10f64.powi(DEFAULT_FRACTIONAL_DIGITS as i32),
        }
    }
}

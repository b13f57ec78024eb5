//! Errors raised while reading a single segment.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("field {position} is not valid UTF-8")]
    InvalidUtf8 { position: usize },

    #[error("amount {value} is outside the decimal range")]
    AmountOutOfRange { value: String },

    #[error("adding {amount} overflows the running total")]
    TotalOverflow { amount: rust_decimal::Decimal },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

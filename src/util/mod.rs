//! Helper routines for checking and conditioning generated sequences.

use std::error;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum MathError {
    ConvertError,
    EmptyBufferError,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let desc = match *self {
            MathError::ConvertError => "Type conversion from generic failed",
            MathError::EmptyBufferError => {
                "Input buffer must contain at least one sample"
            }
        };
        write!(f, "Math error: {}", desc)
    }
}

impl error::Error for MathError {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Some basic math functions used elsewhere in the project
pub mod math;

//! Errors raised by array construction, indexing and elementwise operations

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// Two shapes cannot be broadcast together
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    /// An index is outside the dimension it addresses
    IndexOutOfBounds {
        index: isize,
        axis: usize,
        size: usize,
    },
    /// More indices than the array has dimensions
    TooManyIndices { given: usize, ndim: usize },
    /// Reduction axis does not exist
    AxisOutOfRange { axis: usize, ndim: usize },
    /// Label sequence does not match the dimension it labels
    LabelLengthMismatch {
        axis: usize,
        expected: usize,
        actual: usize,
    },
    /// Nested input where sibling lists have different lengths
    RaggedInput,
    /// Input that is not a number, boolean or nested list of them
    InvalidInput(String),
    /// Integer raised to a negative integer power
    NegativeIntegerPower,
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { left, right } => write!(
                f,
                "operands could not be broadcast together with shapes {:?} {:?}",
                left, right
            ),
            Self::IndexOutOfBounds { index, axis, size } => write!(
                f,
                "index {} is out of bounds for axis {} with size {}",
                index, axis, size
            ),
            Self::TooManyIndices { given, ndim } => write!(
                f,
                "too many indices: array is {}-dimensional, but {} were indexed",
                ndim, given
            ),
            Self::AxisOutOfRange { axis, ndim } => {
                write!(f, "axis {} is out of bounds for array of dimension {}", axis, ndim)
            }
            Self::LabelLengthMismatch {
                axis,
                expected,
                actual,
            } => write!(
                f,
                "axis {} has {} entries but {} labels were given",
                axis, expected, actual
            ),
            Self::RaggedInput => write!(f, "nested lists have inconsistent lengths"),
            Self::InvalidInput(msg) => write!(f, "invalid array input: {}", msg),
            Self::NegativeIntegerPower => {
                write!(f, "integers to negative integer powers are not allowed")
            }
        }
    }
}

impl std::error::Error for ArrayError {}

use std::fmt::Display;

/// Errors returned by indicator computations.
///
/// Division by zero inside an indicator is never an error: the components
/// that divide (RSI) guard their denominators themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The bar sequence is shorter than the indicator's minimum history.
    #[error("insufficient data for {indicator}: requires {required} bars, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// A required input field is unusable as a whole.
    ///
    /// Individual non-finite values are not errors: they become undefined
    /// positions in the extracted series.
    #[error("invalid input in {field}: {fault}")]
    InvalidInput {
        field: &'static str,
        fault: InputFault,
    },
}

/// Reason an input field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFault {
    /// Every bar carries a non-finite value for the field.
    NoFiniteValues,
    /// Timestamp at `index` does not advance past its predecessor.
    OutOfOrder { index: usize },
}

impl Display for InputFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFiniteValues => write!(f, "no finite values"),
            Self::OutOfOrder { index } => write!(f, "not strictly increasing at index {index}"),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn insufficient(indicator: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            indicator,
            required,
            actual,
        }
    }
}

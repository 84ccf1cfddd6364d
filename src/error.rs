//! Error types for lanekit operations.
//!
//! Vector operations themselves never fail at run time. These errors come from
//! the safe constructors that move data between slices and vectors.

use std::fmt;

/// Errors that can occur when moving data in or out of vectors and masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanekitError {
    /// A slice was shorter than the vector it feeds or receives.
    LengthError {
        /// Number of lanes the vector needs.
        expected: usize,
        /// Number of elements the slice holds.
        actual: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A slice did not meet the alignment of the native register.
    AlignmentError {
        /// Address of the first element.
        address: usize,
        /// Required alignment in bytes.
        required: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A vector lane was neither all-ones nor all-zeros.
    MaskError {
        /// Index of the first offending lane.
        lane: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for LanekitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanekitError::LengthError {
                expected,
                actual,
                message,
            } => write!(
                f,
                "Length mismatch: {} (expected at least {} elements, got {})",
                message, expected, actual
            ),
            LanekitError::AlignmentError {
                address,
                required,
                message,
            } => write!(
                f,
                "Misaligned data: {} (address: {:#x}, required alignment: {})",
                message, address, required
            ),
            LanekitError::MaskError { lane, message } => {
                write!(f, "Invalid mask: {} (lane {})", message, lane)
            }
        }
    }
}

impl std::error::Error for LanekitError {}

/// Result type alias for lanekit operations.
pub type Result<T> = std::result::Result<T, LanekitError>;

/// Creates a length error.
pub fn length_error(expected: usize, actual: usize, message: impl Into<String>) -> LanekitError {
    LanekitError::LengthError {
        expected,
        actual,
        message: message.into(),
    }
}

/// Creates an alignment error.
pub fn alignment_error(address: usize, required: usize, message: impl Into<String>) -> LanekitError {
    LanekitError::AlignmentError {
        address,
        required,
        message: message.into(),
    }
}

/// Creates a mask error.
pub fn mask_error(lane: usize, message: impl Into<String>) -> LanekitError {
    LanekitError::MaskError {
        lane,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_error_display() {
        let error = length_error(16, 3, "source slice too short");
        let display = format!("{}", error);
        assert!(display.contains("Length mismatch"));
        assert!(display.contains("expected at least 16"));
        assert!(display.contains("got 3"));
        assert!(display.contains("source slice too short"));
    }

    #[test]
    fn test_alignment_error_display() {
        let error = alignment_error(0x1004, 16, "aligned load");
        let display = format!("{}", error);
        assert!(display.contains("Misaligned data"));
        assert!(display.contains("0x1004"));
        assert!(display.contains("required alignment: 16"));
    }

    #[test]
    fn test_mask_error_display() {
        let error = mask_error(5, "lane is not all-ones or all-zeros");
        let display = format!("{}", error);
        assert!(display.contains("Invalid mask"));
        assert!(display.contains("lane 5"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = length_error(8, 4, "test");
        let error2 = length_error(8, 4, "test");
        let error3 = length_error(8, 5, "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(mask_error(0, "test"));
        assert!(error.to_string().contains("Invalid mask"));
    }
}

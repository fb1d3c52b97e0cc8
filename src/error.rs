use std::fmt::{Debug, Display, Formatter, Result};

/// Errors that can occur while allocating an FFT configuration.
///
/// Once a configuration exists, transforms on it can't fail.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// The length is zero, or not valid for the requested transform (real transforms need an even length).
    InvalidLength { len: usize },
    /// A table for this length could not be allocated.
    AllocationFailure { len: usize },
    /// Factoring the length needs more stages than a plan can hold.
    FactorizationOverflow { len: usize, stages: usize },
    /// No configuration was planned for this length.
    NullConfig { len: usize },
}

impl Display for FftError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            FftError::InvalidLength { len } => write!(f, "Invalid FFT length: {}", len),
            FftError::AllocationFailure { len } => {
                write!(f, "Failed to allocate FFT tables for length {}", len)
            }
            FftError::FactorizationOverflow { len, stages } => write!(
                f,
                "Factoring length {} needs {} stages, more than the supported {}",
                len,
                stages,
                crate::factor::MAX_STAGES
            ),
            FftError::NullConfig { len } => {
                write!(f, "No FFT configuration was planned for length {}", len)
            }
        }
    }
}

impl Debug for FftError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for FftError {}

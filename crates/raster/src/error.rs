/// The painter's result type.
pub type PaintResult = Result<(), PaintError>;

/// Describes an unexpected internal state.
///
/// These indicate a bug in the rasterizer rather than a problem with the
/// input; they are surfaced so that tests can catch them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InternalError {
    CoverageOverflow,
    ErrorCode(i16),
}

#[cfg(feature = "std")]
impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InternalError::CoverageOverflow => {
                std::write!(f, "Coverage accumulator exceeded the sampling grid")
            }
            InternalError::ErrorCode(i) => {
                std::write!(f, "Error code: #{i}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InternalError {}

/// The painter's error enumeration.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintError {
    /// A subpath handed to `fill` does not end in a closing edge.
    PathNotClosed,
    /// The stroke transformation is singular and cannot be inverted.
    InvalidMatrix,
    /// A pattern pixel has a color channel exceeding its alpha channel.
    PixelSourceNotPreMultiplied,
    /// The destination surface's pixel format is not usable for this operation.
    InvalidPixelFormat,
    /// An internal invariant was breached.
    InvalidState(InternalError),
}

#[cfg(feature = "std")]
impl core::fmt::Display for PaintError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PaintError::PathNotClosed => {
                std::write!(f, "Path is not closed")
            }
            PaintError::InvalidMatrix => {
                std::write!(f, "Transformation matrix is not invertible")
            }
            PaintError::PixelSourceNotPreMultiplied => {
                std::write!(f, "Pixel source is not pre-multiplied")
            }
            PaintError::InvalidPixelFormat => {
                std::write!(f, "Invalid pixel format")
            }
            PaintError::InvalidState(e) => {
                std::write!(f, "Internal error: {e}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PaintError {}

impl core::convert::From<InternalError> for PaintError {
    fn from(value: InternalError) -> Self {
        Self::InvalidState(value)
    }
}

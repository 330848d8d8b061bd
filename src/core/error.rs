use std::fmt;

/// Errors raised by a blur call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlurError {
    /// A precondition on the buffer or the radius does not hold.
    /// Always reported before any pixel is touched.
    InvalidArgument(String),
    /// A worker thread panicked. The source buffer was not modified.
    WorkerPanicked,
}

impl BlurError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl fmt::Display for BlurError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {}", message),
            Self::WorkerPanicked => write!(f, "a blur worker panicked"),
        }
    }
}

impl std::error::Error for BlurError {}

use thiserror::Error;

/// Failures of the window host. The rendering kernel itself never fails.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("window error: {0}")]
    Window(String),

    #[error(transparent)]
    Surface(#[from] pixels::Error),

    #[error("font error: {0}")]
    Font(String),

    #[error("invalid argument {flag}: {reason}")]
    InvalidArgument { flag: &'static str, reason: String },

    #[error("unreadable telemetry line {line:?}: {reason}")]
    BadTelemetry { line: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<winit::error::EventLoopError> for HostError {
    fn from(err: winit::error::EventLoopError) -> Self {
        HostError::Window(err.to_string())
    }
}

impl From<winit::error::OsError> for HostError {
    fn from(err: winit::error::OsError) -> Self {
        HostError::Window(err.to_string())
    }
}

/// Convenience type alias for results using [`HostError`].
pub type Result<T> = std::result::Result<T, HostError>;

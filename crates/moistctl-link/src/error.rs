use std::time::Duration;

/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// I/O failure on the byte pipe.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A received frame failed length or checksum validation.
    #[error("frame error: {0}")]
    Frame(#[from] moistctl_frame::FrameError),

    /// No acknowledgment arrived within the deadline.
    #[error("timeout of {0:.1?} exceeded waiting for acknowledgment")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, LinkError>;

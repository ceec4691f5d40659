/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The byte count does not match header + payload + checksum.
    #[error("invalid frame length ({actual} bytes, expected {expected})")]
    LengthMismatch { expected: usize, actual: usize },

    /// The recomputed checksum does not match the transmitted one.
    #[error("FCS mismatch (computed {computed:#06x}, received {received:#06x})")]
    FcsMismatch { computed: u16, received: u16 },

    /// The payload exceeds the link's fixed payload length.
    #[error("payload too long ({len} bytes, max {max})")]
    PayloadTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

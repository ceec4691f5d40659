use std::fmt;
use std::io;

use moistctl_frame::FrameError;
use moistctl_link::LinkError;
use moistctl_proto::{ConfigFormatError, ProtocolError};
use moistctl_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const REMOTE_ERROR: i32 = 32;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
    }
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Io(source) => io_error(context, source),
        LinkError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        LinkError::Frame(FrameError::FcsMismatch { .. }) => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        LinkError::Frame(other) => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn proto_error(context: &str, err: ProtocolError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn config_error(context: &str, err: ConfigFormatError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

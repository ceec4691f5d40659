//! Frame-control byte layout.
//!
//! The low bits carry control flags; the top two bits carry a remote error
//! code that is inspected before any payload interpretation.

/// Request a communication reset.
pub const FC_RESET: u8 = 0x01;

/// The sender expects an acknowledgment frame.
pub const FC_REQ_ACK: u8 = 0x02;

/// This frame acknowledges a previous request.
pub const FC_ACK: u8 = 0x04;

/// Mask of the 2-bit error code in the frame-control byte.
pub const FC_ERRCODE_MASK: u8 = 0xC0;

/// Shift of the error code within the frame-control byte.
pub const FC_ERRCODE_SHIFT: u8 = 6;

/// Remote error code carried in the top bits of the frame-control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// No error.
    Ok = 0,
    /// The remote side failed to handle the request.
    Fail = 1,
    /// The remote side saw a checksum error.
    Fcs = 2,
    /// The remote receive queue overflowed.
    Queue = 3,
}

impl ErrorCode {
    /// Extract the error code from a frame-control byte.
    pub fn from_fc(fc: u8) -> Self {
        match (fc & FC_ERRCODE_MASK) >> FC_ERRCODE_SHIFT {
            0 => ErrorCode::Ok,
            1 => ErrorCode::Fail,
            2 => ErrorCode::Fcs,
            _ => ErrorCode::Queue,
        }
    }

    /// Fold the error code back into a frame-control byte.
    pub fn into_fc(self, fc: u8) -> u8 {
        (fc & !FC_ERRCODE_MASK) | ((self as u8) << FC_ERRCODE_SHIFT)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::Ok => "ok",
            ErrorCode::Fail => "remote failure",
            ErrorCode::Fcs => "remote checksum error",
            ErrorCode::Queue => "remote queue overflow",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errcode_is_orthogonal_to_flags() {
        let fc = ErrorCode::Fcs.into_fc(FC_REQ_ACK | FC_ACK);
        assert_eq!(fc & FC_REQ_ACK, FC_REQ_ACK);
        assert_eq!(fc & FC_ACK, FC_ACK);
        assert_eq!(ErrorCode::from_fc(fc), ErrorCode::Fcs);
    }

    #[test]
    fn all_codes_round_trip() {
        for code in [
            ErrorCode::Ok,
            ErrorCode::Fail,
            ErrorCode::Fcs,
            ErrorCode::Queue,
        ] {
            assert_eq!(ErrorCode::from_fc(code.into_fc(0)), code);
        }
    }
}

use bytes::{BufMut, Bytes, BytesMut};

use crate::crc::crc16;
use crate::error::{FrameError, Result};
use crate::fc::ErrorCode;

/// Frame header: fc (1) + seq (1) + sa/da nibbles (1) + reserved (1).
pub const HEADER_LEN: usize = 4;

/// Trailing frame check sequence: CRC16, low byte first.
pub const FCS_LEN: usize = 2;

/// Total wire size of one frame for a given fixed payload length.
pub fn frame_len(payload_len: usize) -> usize {
    HEADER_LEN + payload_len + FCS_LEN
}

/// One bus frame.
///
/// Addresses are 4-bit bus addresses; they are masked at construction and
/// on every setter, so an out-of-range value silently wraps into the nibble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame-control byte (flags + embedded error code).
    pub fc: u8,
    /// Sequence number, assigned by the link layer.
    pub seq: u8,
    sa: u8,
    da: u8,
    /// Payload bytes. Zero-padded to the link's payload length on encode.
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame with the given control bits and payload.
    ///
    /// Addressing and sequencing are stamped by the link layer on send.
    pub fn new(fc: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            fc,
            seq: 0,
            sa: 0,
            da: 0,
            payload: payload.into(),
        }
    }

    /// Source bus address (4 bits).
    pub fn sa(&self) -> u8 {
        self.sa
    }

    /// Destination bus address (4 bits).
    pub fn da(&self) -> u8 {
        self.da
    }

    /// Set the source address, masking to 4 bits.
    pub fn set_sa(&mut self, sa: u8) {
        self.sa = sa & 0xF;
    }

    /// Set the destination address, masking to 4 bits.
    pub fn set_da(&mut self, da: u8) {
        self.da = da & 0xF;
    }

    /// Remote error code embedded in the frame-control byte.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_fc(self.fc)
    }
}

/// Encode a frame into its wire bytes.
///
/// The payload is zero-padded to `payload_len`; a longer payload is
/// rejected with [`FrameError::PayloadTooLong`]. The checksum covers the
/// header and the padded payload and is appended low byte first.
pub fn encode_frame(frame: &Frame, payload_len: usize) -> Result<BytesMut> {
    if frame.payload.len() > payload_len {
        return Err(FrameError::PayloadTooLong {
            len: frame.payload.len(),
            max: payload_len,
        });
    }

    let mut buf = BytesMut::with_capacity(frame_len(payload_len));
    buf.put_u8(frame.fc);
    buf.put_u8(frame.seq);
    buf.put_u8((frame.sa & 0xF) | ((frame.da & 0xF) << 4));
    buf.put_u8(0x00);
    buf.put_slice(&frame.payload);
    buf.put_bytes(0x00, payload_len - frame.payload.len());

    let fcs = crc16(&buf);
    buf.put_u16_le(fcs);
    Ok(buf)
}

/// Decode one frame from exactly `frame_len(payload_len)` bytes.
pub fn decode_frame(data: &[u8], payload_len: usize) -> Result<Frame> {
    let expected = frame_len(payload_len);
    if data.len() != expected {
        return Err(FrameError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }

    let body = &data[..expected - FCS_LEN];
    let received = u16::from(data[expected - 2]) | (u16::from(data[expected - 1]) << 8);
    let computed = crc16(body);
    if computed != received {
        tracing::debug!(computed, received, "dropping frame with bad checksum");
        return Err(FrameError::FcsMismatch { computed, received });
    }

    Ok(Frame {
        fc: data[0],
        seq: data[1],
        sa: data[2] & 0xF,
        da: (data[2] >> 4) & 0xF,
        payload: Bytes::copy_from_slice(&data[HEADER_LEN..HEADER_LEN + payload_len]),
    })
}

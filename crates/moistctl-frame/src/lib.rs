//! Fixed-length frame codec for the moistcontrol serial bus.
//!
//! Every frame on the wire has the same shape:
//! - A 4-byte header: frame control, sequence number, source/destination
//!   address nibbles, one reserved zero byte
//! - A fixed-length payload (configured per link, zero-padded)
//! - A 2-byte little-endian CRC16 over everything preceding it
//!
//! The codec is lossless and checksum-verified in both directions. Bus
//! addressing and timing live one layer up in `moistctl-link`.

pub mod codec;
pub mod crc;
pub mod error;
pub mod fc;

pub use codec::{decode_frame, encode_frame, frame_len, Frame, FCS_LEN, HEADER_LEN};
pub use crc::crc16;
pub use error::{FrameError, Result};
pub use fc::{ErrorCode, FC_ACK, FC_ERRCODE_MASK, FC_ERRCODE_SHIFT, FC_REQ_ACK, FC_RESET};

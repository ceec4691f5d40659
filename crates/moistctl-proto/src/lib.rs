//! Typed messages carried inside bus frame payloads.
//!
//! Payload byte 0 is a numeric message-type tag; the remaining bytes are a
//! fixed per-type field layout (little-endian 16-bit integers, bit-packed
//! shared words). Twelve message types exist in six pairs: a data message
//! and its fetch counterpart. Fetch messages carry no meaningful body and
//! always request acknowledgment.
//!
//! On top of the wire codec this crate provides:
//! - [`LogItem`]: the nested record inside LOG messages, with its packed
//!   32-bit timestamp and text rendering
//! - a line-oriented `[Section]` / `key=value` text form for the RTC and
//!   configuration messages, for offline editing independent of the wire

pub mod consts;
pub mod error;
pub mod log;
pub mod message;
pub mod textcfg;
pub mod timeofday;

mod wire;

pub use error::{ConfigFormatError, ProtocolError, Result};
pub use log::{LogItem, LogKind, Timestamp};
pub use message::{
    Envelope, GlobalConfig, ManualMode, Message, MessageType, PotConfig, PotState, Rtc,
};
pub use timeofday::{pack_time_of_day, unpack_time_of_day};

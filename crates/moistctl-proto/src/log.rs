//! Event-log records carried inside LOG messages.
//!
//! One record is 7 wire bytes: a tag byte (7-bit type, overflow flag in
//! bit 7), a packed 32-bit timestamp, and two type-specific bytes.

use crate::consts::pot_state_name;
use crate::error::ProtocolError;
use crate::wire::Reader;

const LOG_TYPE_MASK: u8 = 0x7F;
const LOG_OVERFLOW: u8 = 0x80;

const LOG_ERROR: u8 = 0;
const LOG_INFO: u8 = 1;
const LOG_SENSOR_DATA: u8 = 2;

/// Error code: a sensor measurement was implausible.
pub const LOG_ERR_SENSOR: u8 = 0;

/// Info code: firmware debug message.
pub const LOG_INFO_DEBUG: u8 = 0;
/// Info code: pot controller state machine transition.
pub const LOG_INFO_STATE_CHANGE: u8 = 1;
/// Info code: watering started or stopped on a pot.
pub const LOG_INFO_WATERING_CHANGE: u8 = 2;

/// Timestamp of a log record, bit-packed into 32 bits on the wire.
///
/// `year` is the offset from 2000, `month` and `day` are zero-based.
/// Decoding clamps each field into its calendar range but performs no
/// cross-field validation; a day 30 in a short month passes through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u8,
}

impl Timestamp {
    /// Bit layout from LSB: second[0:6) minute[6:12) hour[12:17)
    /// day[17:22) month[22:26) year[26:32).
    pub fn pack(&self) -> u32 {
        u32::from(self.second & 0x3F)
            | (u32::from(self.minute & 0x3F) << 6)
            | (u32::from(self.hour & 0x1F) << 12)
            | (u32::from(self.day & 0x1F) << 17)
            | (u32::from(self.month & 0x0F) << 22)
            | (u32::from(self.year & 0x3F) << 26)
    }

    /// Unpack a wire timestamp, clamping every field into range.
    pub fn unpack(value: u32) -> Self {
        Self {
            second: ((value & 0x3F) as u8).min(59),
            minute: (((value >> 6) & 0x3F) as u8).min(59),
            hour: (((value >> 12) & 0x1F) as u8).min(23),
            day: (((value >> 17) & 0x1F) as u8).min(30),
            month: (((value >> 22) & 0x0F) as u8).min(11),
            year: (((value >> 26) & 0x3F) as u8).min(99),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}.{:02}.{:02} {:02}:{:02}:{:02}",
            u16::from(self.year) + 2000,
            self.month + 1,
            self.day + 1,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Type-specific body of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Firmware error report.
    Error { code: u8, data: u8 },
    /// Informational event.
    Info { code: u8, data: u8 },
    /// Raw sensor measurement: 6-bit sensor index, 10-bit ADC value.
    SensorData { sensor: u8, value: u16 },
}

/// One decoded event-log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogItem {
    /// The firmware log queue overflowed before this record.
    pub overflow: bool,
    pub timestamp: Timestamp,
    pub kind: LogKind,
}

impl LogItem {
    /// Decode a record from the bytes following the LOG message tag.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = Reader::new(data);
        let tag = r.u8()?;
        let log_type = tag & LOG_TYPE_MASK;
        let overflow = tag & LOG_OVERFLOW != 0;
        let timestamp = Timestamp::unpack(r.u32_le()?);

        let kind = match log_type {
            LOG_ERROR => LogKind::Error {
                code: r.u8()?,
                data: r.u8()?,
            },
            LOG_INFO => LogKind::Info {
                code: r.u8()?,
                data: r.u8()?,
            },
            LOG_SENSOR_DATA => {
                let sv = r.u16_le()?;
                LogKind::SensorData {
                    sensor: ((sv >> 10) & 0x3F) as u8,
                    value: sv & 0x3FF,
                }
            }
            other => return Err(ProtocolError::UnknownLogItemType(other)),
        };

        Ok(Self {
            overflow,
            timestamp,
            kind,
        })
    }

    /// Encode this record into its 7 wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let log_type = match self.kind {
            LogKind::Error { .. } => LOG_ERROR,
            LogKind::Info { .. } => LOG_INFO,
            LogKind::SensorData { .. } => LOG_SENSOR_DATA,
        };
        let tag = (log_type & LOG_TYPE_MASK) | if self.overflow { LOG_OVERFLOW } else { 0 };

        let mut out = Vec::with_capacity(7);
        out.push(tag);
        out.extend_from_slice(&self.timestamp.pack().to_le_bytes());
        match self.kind {
            LogKind::Error { code, data } | LogKind::Info { code, data } => {
                out.push(code);
                out.push(data);
            }
            LogKind::SensorData { sensor, value } => {
                let sv = (value & 0x3FF) | (u16::from(sensor & 0x3F) << 10);
                out.extend_from_slice(&sv.to_le_bytes());
            }
        }
        out
    }

    /// Human-readable event text, without the timestamp prefix.
    pub fn text(&self) -> String {
        match self.kind {
            LogKind::Error { code, data } => {
                if code == LOG_ERR_SENSOR {
                    let pot = data & 0xF;
                    format!(
                        "Error: Measurement at pot {} returned an implausible result.",
                        pot + 1
                    )
                } else {
                    format!("Error {code} ({data}) occurred")
                }
            }
            LogKind::Info { code, data } => match code {
                LOG_INFO_DEBUG => format!("Debug message: {data}"),
                LOG_INFO_STATE_CHANGE => {
                    let pot = data & 0xF;
                    let state = (data >> 4) & 0xF;
                    format!(
                        "Pot {} state machine transition to {}",
                        pot + 1,
                        pot_state_name(state)
                    )
                }
                LOG_INFO_WATERING_CHANGE => {
                    let pot = data & 0xF;
                    let started = data & 0x80 != 0;
                    format!(
                        "Pot {} watering {}",
                        pot + 1,
                        if started { "started" } else { "stopped" }
                    )
                }
                other => format!("Info message {other} ({data})"),
            },
            LogKind::SensorData { sensor, value } => {
                format!("Pot {} sensor ADC value measured: {}", sensor + 1, value)
            }
        }
    }
}

impl std::fmt::Display for LogItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.overflow { " QUEUE OVERFLOW" } else { "" };
        write!(f, "[{}{}] {}", self.timestamp, marker, self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> Timestamp {
        Timestamp {
            second: 30,
            minute: 15,
            hour: 12,
            day: 3,
            month: 4,
            year: 13,
        }
    }

    #[test]
    fn timestamp_bit_layout() {
        let packed = stamp().pack();
        assert_eq!(packed & 0x3F, 30);
        assert_eq!((packed >> 6) & 0x3F, 15);
        assert_eq!((packed >> 12) & 0x1F, 12);
        assert_eq!((packed >> 17) & 0x1F, 3);
        assert_eq!((packed >> 22) & 0x0F, 4);
        assert_eq!((packed >> 26) & 0x3F, 13);
        assert_eq!(Timestamp::unpack(packed), stamp());
    }

    #[test]
    fn timestamp_decode_clamps_fields() {
        // second=63, minute=63 are representable on the wire but not valid.
        let raw = 63u32 | (63 << 6) | (31 << 12) | (31 << 17) | (15 << 22) | (63 << 26);
        let ts = Timestamp::unpack(raw);
        assert_eq!(
            ts,
            Timestamp {
                second: 59,
                minute: 59,
                hour: 23,
                day: 30,
                month: 11,
                year: 63
            }
        );
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(stamp().to_string(), "2013.05.04 12:15:30");
    }

    #[test]
    fn error_item_round_trips() {
        let item = LogItem {
            overflow: false,
            timestamp: stamp(),
            kind: LogKind::Error { code: 7, data: 3 },
        };
        let bytes = item.to_bytes();
        assert_eq!(bytes.len(), 7);
        assert_eq!(LogItem::from_bytes(&bytes).unwrap(), item);
    }

    #[test]
    fn info_item_round_trips_with_overflow() {
        let item = LogItem {
            overflow: true,
            timestamp: stamp(),
            kind: LogKind::Info {
                code: LOG_INFO_WATERING_CHANGE,
                data: 0x82,
            },
        };
        let bytes = item.to_bytes();
        assert_eq!(bytes[0] & 0x80, 0x80);
        assert_eq!(LogItem::from_bytes(&bytes).unwrap(), item);
    }

    #[test]
    fn sensor_data_packs_ten_and_six_bits() {
        let item = LogItem {
            overflow: false,
            timestamp: stamp(),
            kind: LogKind::SensorData {
                sensor: 0x3F,
                value: 0x3FF,
            },
        };
        let bytes = item.to_bytes();
        assert_eq!(u16::from_le_bytes([bytes[5], bytes[6]]), 0xFFFF);
        assert_eq!(LogItem::from_bytes(&bytes).unwrap(), item);

        let item = LogItem {
            kind: LogKind::SensorData {
                sensor: 2,
                value: 900,
            },
            ..item
        };
        assert_eq!(LogItem::from_bytes(&item.to_bytes()).unwrap(), item);
    }

    #[test]
    fn unknown_tag_fails() {
        let mut bytes = LogItem {
            overflow: false,
            timestamp: stamp(),
            kind: LogKind::Error { code: 0, data: 0 },
        }
        .to_bytes();
        bytes[0] = 0x05;
        assert!(matches!(
            LogItem::from_bytes(&bytes),
            Err(ProtocolError::UnknownLogItemType(5))
        ));
    }

    #[test]
    fn short_input_fails() {
        assert!(matches!(
            LogItem::from_bytes(&[0x00, 0x01, 0x02]),
            Err(ProtocolError::MessageTooShort)
        ));
    }

    #[test]
    fn rendered_text() {
        let item = LogItem {
            overflow: true,
            timestamp: stamp(),
            kind: LogKind::SensorData {
                sensor: 2,
                value: 512,
            },
        };
        let line = item.to_string();
        assert!(line.contains("2013.05.04 12:15:30"));
        assert!(line.contains("QUEUE OVERFLOW"));
        assert!(line.contains("Pot 3 sensor ADC value measured: 512"));
    }

    #[test]
    fn sensor_error_text() {
        let item = LogItem {
            overflow: false,
            timestamp: stamp(),
            kind: LogKind::Error {
                code: LOG_ERR_SENSOR,
                data: 0x04,
            },
        };
        assert_eq!(
            item.text(),
            "Error: Measurement at pot 5 returned an implausible result."
        );
    }
}

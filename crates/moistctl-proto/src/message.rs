use bytes::Bytes;
use moistctl_frame::{ErrorCode, Frame, FC_REQ_ACK};
use serde::Serialize;

use crate::error::ProtocolError;
use crate::log::LogItem;
use crate::wire::Reader;

/// Numeric message-type tags, payload byte 0 on the wire.
///
/// Types come in pairs: the even id carries data, the following odd id is
/// the fetch request that pulls that data from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Log = 0,
    LogFetch = 1,
    Rtc = 2,
    RtcFetch = 3,
    GlobalConfig = 4,
    GlobalConfigFetch = 5,
    PotConfig = 6,
    PotConfigFetch = 7,
    PotState = 8,
    PotStateFetch = 9,
    ManualMode = 10,
    ManualModeFetch = 11,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Log),
            1 => Some(Self::LogFetch),
            2 => Some(Self::Rtc),
            3 => Some(Self::RtcFetch),
            4 => Some(Self::GlobalConfig),
            5 => Some(Self::GlobalConfigFetch),
            6 => Some(Self::PotConfig),
            7 => Some(Self::PotConfigFetch),
            8 => Some(Self::PotState),
            9 => Some(Self::PotStateFetch),
            10 => Some(Self::ManualMode),
            11 => Some(Self::ManualModeFetch),
            _ => None,
        }
    }

    /// Fetch requests are the odd-numbered half of each pair.
    pub fn is_fetch(self) -> bool {
        self as u8 & 1 != 0
    }
}

/// Real-time clock state of the controller.
///
/// `day` and `month` are zero-based, `year` is the offset from 2000.
/// `day_of_week` is transmitted and stored but never cross-checked
/// against the date; it is an opaque pass-through field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rtc {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub day_of_week: u8,
}

impl Rtc {
    /// Clamp every field into its transmitted range.
    fn clamped(self) -> Self {
        Self {
            second: self.second.min(59),
            minute: self.minute.min(59),
            hour: self.hour.min(23),
            day: self.day.min(30),
            month: self.month.min(11),
            year: self.year.min(99),
            day_of_week: self.day_of_week.min(6),
        }
    }
}

/// Controller-global configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    pub flags: u8,
    pub sensor_lowest_value: u16,
    pub sensor_highest_value: u16,
}

/// Per-pot configuration. Schedule bounds are in the packed half-second
/// time-of-day format (see [`crate::timeofday`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PotConfig {
    pub pot_number: u8,
    pub flags: u8,
    pub min_threshold: u8,
    pub max_threshold: u8,
    pub start_time: u16,
    pub end_time: u16,
    pub dow_on_mask: u8,
}

/// Current state of one pot's controller state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PotState {
    pub pot_number: u8,
    pub state_id: u8,
    pub is_watering: bool,
    pub last_measured_raw_value: u16,
    pub last_measured_value: u8,
}

/// Manual override masks, one bit per pot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManualMode {
    pub force_stop_watering_mask: u8,
    pub valve_manual_mask: u8,
    pub valve_manual_state: u8,
}

/// One typed bus message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Log(LogItem),
    LogFetch,
    Rtc(Rtc),
    RtcFetch,
    GlobalConfig(GlobalConfig),
    GlobalConfigFetch,
    PotConfig(PotConfig),
    PotConfigFetch { pot_number: u8 },
    PotState(PotState),
    PotStateFetch { pot_number: u8 },
    ManualMode(ManualMode),
    ManualModeFetch,
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Log(_) => MessageType::Log,
            Message::LogFetch => MessageType::LogFetch,
            Message::Rtc(_) => MessageType::Rtc,
            Message::RtcFetch => MessageType::RtcFetch,
            Message::GlobalConfig(_) => MessageType::GlobalConfig,
            Message::GlobalConfigFetch => MessageType::GlobalConfigFetch,
            Message::PotConfig(_) => MessageType::PotConfig,
            Message::PotConfigFetch { .. } => MessageType::PotConfigFetch,
            Message::PotState(_) => MessageType::PotState,
            Message::PotStateFetch { .. } => MessageType::PotStateFetch,
            Message::ManualMode(_) => MessageType::ManualMode,
            Message::ManualModeFetch => MessageType::ManualModeFetch,
        }
    }

    /// Frame-control bits this message requires. Fetch requests always
    /// demand acknowledgment; everything else adds nothing beyond what
    /// the caller sets.
    pub fn frame_control(&self) -> u8 {
        if self.message_type().is_fetch() {
            FC_REQ_ACK
        } else {
            0
        }
    }

    /// Serialize into payload bytes: tag + packed fields.
    pub fn encode(&self) -> Vec<u8> {
        let tag = self.message_type() as u8;
        match self {
            Message::Log(item) => {
                let mut out = vec![tag];
                out.extend_from_slice(&item.to_bytes());
                out
            }
            Message::Rtc(rtc) => {
                let rtc = rtc.clamped();
                vec![
                    tag,
                    rtc.second,
                    rtc.minute,
                    rtc.hour,
                    rtc.day,
                    rtc.month,
                    rtc.year,
                    rtc.day_of_week,
                ]
            }
            Message::GlobalConfig(conf) => {
                let mut out = vec![tag, conf.flags];
                out.extend_from_slice(&conf.sensor_lowest_value.to_le_bytes());
                out.extend_from_slice(&conf.sensor_highest_value.to_le_bytes());
                out
            }
            Message::PotConfig(conf) => {
                let mut out = vec![
                    tag,
                    conf.pot_number,
                    conf.flags,
                    conf.min_threshold,
                    conf.max_threshold,
                ];
                out.extend_from_slice(&conf.start_time.to_le_bytes());
                out.extend_from_slice(&conf.end_time.to_le_bytes());
                out.push(conf.dow_on_mask);
                out
            }
            Message::PotState(state) => {
                let mut out = vec![tag, state.pot_number, state.state_id];
                out.push(u8::from(state.is_watering));
                out.extend_from_slice(&state.last_measured_raw_value.to_le_bytes());
                out.push(state.last_measured_value);
                out
            }
            Message::ManualMode(man) => vec![
                tag,
                man.force_stop_watering_mask,
                man.valve_manual_mask,
                man.valve_manual_state,
            ],
            Message::PotConfigFetch { pot_number } | Message::PotStateFetch { pot_number } => {
                vec![tag, *pot_number]
            }
            Message::LogFetch
            | Message::RtcFetch
            | Message::GlobalConfigFetch
            | Message::ManualModeFetch => vec![tag],
        }
    }

    /// Parse a payload that has already passed frame validation.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = Reader::new(payload);
        let tag = r.u8()?;
        let msg_type =
            MessageType::from_u8(tag).ok_or(ProtocolError::UnknownMessageType(tag))?;

        let msg = match msg_type {
            MessageType::Log => Message::Log(LogItem::from_bytes(&payload[1..])?),
            MessageType::LogFetch => Message::LogFetch,
            MessageType::Rtc => Message::Rtc(
                Rtc {
                    second: r.u8()?,
                    minute: r.u8()?,
                    hour: r.u8()?,
                    day: r.u8()?,
                    month: r.u8()?,
                    year: r.u8()?,
                    day_of_week: r.u8()?,
                }
                .clamped(),
            ),
            MessageType::RtcFetch => Message::RtcFetch,
            MessageType::GlobalConfig => Message::GlobalConfig(GlobalConfig {
                flags: r.u8()?,
                sensor_lowest_value: r.u16_le()?,
                sensor_highest_value: r.u16_le()?,
            }),
            MessageType::GlobalConfigFetch => Message::GlobalConfigFetch,
            MessageType::PotConfig => Message::PotConfig(PotConfig {
                pot_number: r.u8()?,
                flags: r.u8()?,
                min_threshold: r.u8()?,
                max_threshold: r.u8()?,
                start_time: r.u16_le()?,
                end_time: r.u16_le()?,
                dow_on_mask: r.u8()?,
            }),
            MessageType::PotConfigFetch => Message::PotConfigFetch {
                pot_number: r.u8()?,
            },
            MessageType::PotState => Message::PotState(PotState {
                pot_number: r.u8()?,
                state_id: r.u8()?,
                is_watering: r.u8()? != 0,
                last_measured_raw_value: r.u16_le()?,
                last_measured_value: r.u8()?,
            }),
            MessageType::PotStateFetch => Message::PotStateFetch {
                pot_number: r.u8()?,
            },
            MessageType::ManualMode => Message::ManualMode(ManualMode {
                force_stop_watering_mask: r.u8()?,
                valve_manual_mask: r.u8()?,
                valve_manual_state: r.u8()?,
            }),
            MessageType::ManualModeFetch => Message::ManualModeFetch,
        };
        Ok(msg)
    }

    /// Build a frame carrying this message, with the control bits the
    /// type requires. Addressing and sequencing are stamped on send.
    pub fn to_frame(&self) -> Frame {
        Frame::new(self.frame_control(), Bytes::from(self.encode()))
    }
}

/// A received frame with its payload interpreted.
///
/// When the embedded error code is not [`ErrorCode::Ok`] the payload is
/// not touched: the failure itself is the content, and `message` stays
/// `None` so the caller can inspect which remote error occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub fc: u8,
    pub seq: u8,
    pub sa: u8,
    pub da: u8,
    pub message: Option<Message>,
}

impl Envelope {
    /// Interpret a frame that already passed checksum validation.
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        let message = if frame.error_code() == ErrorCode::Ok {
            Some(Message::decode(&frame.payload)?)
        } else {
            tracing::debug!(code = %frame.error_code(), "remote signaled an error");
            None
        };
        Ok(Self {
            fc: frame.fc,
            seq: frame.seq,
            sa: frame.sa(),
            da: frame.da(),
            message,
        })
    }

    /// Remote error code carried in the frame-control byte.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from_fc(self.fc)
    }
}

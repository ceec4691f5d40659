//! Protocol constants shared with the controller firmware.

/// Maximum number of flowerpots the controller manages.
pub const MAX_POTS: usize = 6;

/// Default fixed payload length of a link to the controller: large
/// enough for the biggest message (pot configuration, 10 bytes).
pub const DEFAULT_PAYLOAD_LEN: usize = 10;

/// Global configuration: master enable for the whole controller.
pub const GLOBAL_FLG_ENABLE: u8 = 0x01;

/// Pot configuration: watering enabled on this pot.
pub const POT_FLG_ENABLED: u8 = 0x01;
/// Pot configuration: log state changes for this pot.
pub const POT_FLG_LOG: u8 = 0x02;
/// Pot configuration: additionally log raw sensor measurements.
pub const POT_FLG_LOGVERBOSE: u8 = 0x04;

/// Per-pot controller state machine identifiers, as reported in pot
/// state messages.
pub const POT_STATE_IDLE: u8 = 0;
pub const POT_STATE_START_MEASUREMENT: u8 = 1;
pub const POT_STATE_MEASURING: u8 = 2;
pub const POT_STATE_WAITING_FOR_VALVE: u8 = 3;

/// Name of a controller state machine state, or the number itself when
/// the state is unknown to this build.
pub fn pot_state_name(state_id: u8) -> String {
    match state_id {
        POT_STATE_IDLE => "POT_IDLE".to_string(),
        POT_STATE_START_MEASUREMENT => "POT_START_MEASUREMENT".to_string(),
        POT_STATE_MEASURING => "POT_MEASURING".to_string(),
        POT_STATE_WAITING_FOR_VALVE => "POT_WAITING_FOR_VALVE".to_string(),
        other => other.to_string(),
    }
}

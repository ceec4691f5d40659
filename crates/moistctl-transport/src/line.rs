use std::time::Duration;

/// Parity setting of the serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits on the serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Serial line parameters.
///
/// Only used for timing math ([`frame_duration`]). The actual line
/// discipline is configured on the device outside of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for LineSettings {
    fn default() -> Self {
        // Controller firmware default: 9600 8N1.
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl LineSettings {
    /// Symbols transmitted per byte: start bit + data bits + parity + stop.
    pub fn symbols_per_byte(&self) -> u32 {
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + u32::from(self.data_bits) + parity + stop
    }
}

/// Time one frame of `frame_len` bytes occupies the bus.
pub fn frame_duration(frame_len: usize, line: &LineSettings) -> Duration {
    let symbols = frame_len as u64 * u64::from(line.symbols_per_byte());
    Duration::from_secs_f64(symbols as f64 / f64::from(line.baud_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_line_is_9600_8n1() {
        let line = LineSettings::default();
        assert_eq!(line.baud_rate, 9600);
        assert_eq!(line.symbols_per_byte(), 10);
    }

    #[test]
    fn frame_duration_8n1() {
        // 14 bytes * 10 symbols at 9600 baud = 14.583 ms.
        let line = LineSettings::default();
        let d = frame_duration(14, &line);
        assert!((d.as_secs_f64() - 140.0 / 9600.0).abs() < 1e-9);
    }

    #[test]
    fn parity_and_stop_bits_add_symbols() {
        let line = LineSettings {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::Even,
            stop_bits: StopBits::Two,
        };
        assert_eq!(line.symbols_per_byte(), 12);
        assert!(frame_duration(14, &line) > frame_duration(14, &LineSettings::default()));
    }
}

//! CRC16 as spoken by the controller firmware.
//!
//! Reflected CRC-16 with polynomial 0xA001 (LSB-first), seeded with 0xFFFF
//! and finalized with `^ 0xFFFF`. Must match the firmware bit-for-bit.

fn crc16_update(mut crc: u16, data: u8) -> u16 {
    crc ^= u16::from(data);
    for _ in 0..8 {
        if crc & 1 != 0 {
            crc = (crc >> 1) ^ 0xA001;
        } else {
            crc >>= 1;
        }
    }
    crc
}

/// Checksum over `data`.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFF;
    for &d in data {
        crc = crc16_update(crc, d);
    }
    crc ^ 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        // Seed and final xor cancel out over an empty region.
        assert_eq!(crc16(&[]), 0x0000);
    }

    #[test]
    fn check_value() {
        // "123456789" under poly 0xA001, init 0xFFFF, xorout 0xFFFF.
        assert_eq!(crc16(b"123456789"), 0xB4C8);
    }

    #[test]
    fn sensitive_to_every_byte() {
        let data = [0x00u8, 0x05, 0x12, 0x00, 0x04, 0x01, 0x64, 0x00];
        let reference = crc16(&data);
        for i in 0..data.len() {
            let mut corrupted = data;
            corrupted[i] ^= 0x01;
            assert_ne!(crc16(&corrupted), reference, "byte {i} not covered");
        }
    }

    #[test]
    fn order_matters() {
        assert_ne!(crc16(&[0x01, 0x02]), crc16(&[0x02, 0x01]));
    }
}

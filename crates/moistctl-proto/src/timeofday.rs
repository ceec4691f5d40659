//! Packed time-of-day format of the pot schedule bounds.
//!
//! Schedule start/end times travel as a 16-bit count of half-seconds since
//! midnight. Round trips are exact only for even total-seconds inputs.

const CEILING: u32 = 23 * 3600 + 59 * 60 + 59;

/// Pack hours/minutes/seconds into the half-second wire format.
///
/// Inputs above 23:59:59 clamp to that ceiling before encoding.
pub fn pack_time_of_day(hours: u8, minutes: u8, seconds: u8) -> u16 {
    let total =
        u32::from(seconds) + u32::from(minutes) * 60 + u32::from(hours) * 3600;
    (total.min(CEILING) / 2) as u16
}

/// Unpack the half-second wire format back into (hours, minutes, seconds).
///
/// Each derived field is clamped into its valid range.
pub fn unpack_time_of_day(value: u16) -> (u8, u8, u8) {
    let mut total = u32::from(value).min(CEILING / 2) * 2;
    let hours = (total / 3600).min(23);
    total -= hours * 3600;
    let minutes = (total / 60).min(59);
    total -= minutes * 60;
    let seconds = total.min(59);
    (hours as u8, minutes as u8, seconds as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_round_trips() {
        assert_eq!(unpack_time_of_day(pack_time_of_day(0, 0, 0)), (0, 0, 0));
    }

    #[test]
    fn even_seconds_round_trip_exactly() {
        assert_eq!(
            unpack_time_of_day(pack_time_of_day(23, 59, 58)),
            (23, 59, 58)
        );
        assert_eq!(unpack_time_of_day(pack_time_of_day(6, 30, 0)), (6, 30, 0));
    }

    #[test]
    fn odd_seconds_lose_half_second_resolution() {
        assert_eq!(unpack_time_of_day(pack_time_of_day(12, 0, 1)), (12, 0, 0));
    }

    #[test]
    fn inputs_above_ceiling_clamp() {
        assert_eq!(pack_time_of_day(99, 99, 99), pack_time_of_day(23, 59, 59));
    }

    #[test]
    fn oversized_wire_values_clamp_on_unpack() {
        assert_eq!(unpack_time_of_day(u16::MAX), (23, 59, 58));
    }

    #[test]
    fn half_second_encoding() {
        // 01:00:00 = 3600 s = 1800 half-second ticks.
        assert_eq!(pack_time_of_day(1, 0, 0), 1800);
    }
}

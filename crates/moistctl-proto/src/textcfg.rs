//! Line-oriented text form of the RTC and configuration messages.
//!
//! One `[SectionName]` block per message with integer `key=value` lines,
//! for offline editing and settings import/export independent of the wire
//! protocol. Several sections may share one document; each message type
//! reads only its own section.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::ConfigFormatError;
use crate::message::{GlobalConfig, PotConfig, Rtc};

/// A parsed `[Section]` / `key=value` document.
#[derive(Debug)]
pub struct TextConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl TextConfig {
    /// Parse a whole document. Blank lines and `#`/`;` comments are
    /// skipped; anything else that is neither a section header nor a
    /// key=value pair is a syntax error naming the offending line.
    pub fn parse(text: &str) -> Result<Self, ConfigFormatError> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigFormatError::Syntax { line: idx + 1 });
            };
            let Some(section) = &current else {
                return Err(ConfigFormatError::Syntax { line: idx + 1 });
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { sections })
    }

    /// True if the document contains `[section]`.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Look up an integer value, with a specific error for each way the
    /// lookup can fail.
    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigFormatError> {
        let entries = self
            .sections
            .get(section)
            .ok_or_else(|| ConfigFormatError::MissingSection(section.to_string()))?;
        let value = entries.get(key).ok_or_else(|| ConfigFormatError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })?;
        value
            .parse::<i64>()
            .map_err(|_| ConfigFormatError::InvalidValue {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}

impl Rtc {
    /// Render as an `[RTC]` text block.
    pub fn to_text(&self) -> String {
        let mut out = String::from("[RTC]\n");
        let _ = writeln!(out, "second={}", self.second);
        let _ = writeln!(out, "minute={}", self.minute);
        let _ = writeln!(out, "hour={}", self.hour);
        let _ = writeln!(out, "day={}", self.day);
        let _ = writeln!(out, "month={}", self.month);
        let _ = writeln!(out, "year={}", self.year);
        let _ = writeln!(out, "day_of_week={}", self.day_of_week);
        out
    }

    /// Parse from a document containing an `[RTC]` section. Fields are
    /// clamped into their transmitted ranges before narrowing, so
    /// out-of-range text values saturate instead of wrapping.
    pub fn from_text(text: &str) -> Result<Self, ConfigFormatError> {
        let cfg = TextConfig::parse(text)?;
        let get = |key: &str, max: i64| -> Result<u8, ConfigFormatError> {
            Ok(cfg.get_int("RTC", key)?.clamp(0, max) as u8)
        };
        Ok(Self {
            second: get("second", 59)?,
            minute: get("minute", 59)?,
            hour: get("hour", 23)?,
            day: get("day", 30)?,
            month: get("month", 11)?,
            year: get("year", 99)?,
            day_of_week: get("day_of_week", 6)?,
        })
    }
}

impl GlobalConfig {
    /// Render as a `[GLOBAL_CONFIG]` text block.
    pub fn to_text(&self) -> String {
        format!(
            "[GLOBAL_CONFIG]\nflags={}\nsensor_lowest_value={}\nsensor_highest_value={}\n",
            self.flags, self.sensor_lowest_value, self.sensor_highest_value
        )
    }

    /// Parse from a document containing a `[GLOBAL_CONFIG]` section.
    pub fn from_text(text: &str) -> Result<Self, ConfigFormatError> {
        let cfg = TextConfig::parse(text)?;
        let get = |key| cfg.get_int("GLOBAL_CONFIG", key);
        Ok(Self {
            flags: get("flags")? as u8,
            sensor_lowest_value: get("sensor_lowest_value")? as u16,
            sensor_highest_value: get("sensor_highest_value")? as u16,
        })
    }
}

impl PotConfig {
    fn section_name(pot_number: u8) -> String {
        format!("POT_{pot_number}_CONFIG")
    }

    /// Render as a `[POT_<n>_CONFIG]` text block.
    pub fn to_text(&self) -> String {
        let mut out = format!("[{}]\n", Self::section_name(self.pot_number));
        let _ = writeln!(out, "flags={}", self.flags);
        let _ = writeln!(out, "min_threshold={}", self.min_threshold);
        let _ = writeln!(out, "max_threshold={}", self.max_threshold);
        let _ = writeln!(out, "start_time={}", self.start_time);
        let _ = writeln!(out, "end_time={}", self.end_time);
        let _ = writeln!(out, "dow_on_mask={}", self.dow_on_mask);
        out
    }

    /// Parse pot `pot_number`'s section from a document.
    pub fn from_text(pot_number: u8, text: &str) -> Result<Self, ConfigFormatError> {
        let cfg = TextConfig::parse(text)?;
        Self::from_config(pot_number, &cfg)
    }

    /// Parse pot `pot_number`'s section from an already-parsed document.
    pub fn from_config(pot_number: u8, cfg: &TextConfig) -> Result<Self, ConfigFormatError> {
        let section = Self::section_name(pot_number);
        let get = |key| cfg.get_int(&section, key);
        Ok(Self {
            pot_number,
            flags: get("flags")? as u8,
            min_threshold: get("min_threshold")? as u8,
            max_threshold: get("max_threshold")? as u8,
            start_time: get("start_time")? as u16,
            end_time: get("end_time")? as u16,
            dow_on_mask: get("dow_on_mask")? as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtc_round_trips_through_text() {
        let rtc = Rtc {
            second: 30,
            minute: 45,
            hour: 13,
            day: 20,
            month: 7,
            year: 26,
            day_of_week: 4,
        };
        assert_eq!(Rtc::from_text(&rtc.to_text()).unwrap(), rtc);
    }

    #[test]
    fn global_config_round_trips_through_text() {
        let conf = GlobalConfig {
            flags: 1,
            sensor_lowest_value: 100,
            sensor_highest_value: 900,
        };
        assert_eq!(GlobalConfig::from_text(&conf.to_text()).unwrap(), conf);
    }

    #[test]
    fn pot_config_round_trips_through_text() {
        let conf = PotConfig {
            pot_number: 3,
            flags: 0x05,
            min_threshold: 40,
            max_threshold: 200,
            start_time: 1800,
            end_time: 39599,
            dow_on_mask: 0x3E,
        };
        let text = conf.to_text();
        assert!(text.starts_with("[POT_3_CONFIG]\n"));
        assert_eq!(PotConfig::from_text(3, &text).unwrap(), conf);
    }

    #[test]
    fn missing_section_is_reported() {
        let err = GlobalConfig::from_text("[RTC]\nsecond=0\n").unwrap_err();
        assert!(
            matches!(err, ConfigFormatError::MissingSection(s) if s == "GLOBAL_CONFIG")
        );
    }

    #[test]
    fn missing_key_is_reported() {
        let err = GlobalConfig::from_text("[GLOBAL_CONFIG]\nflags=1\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFormatError::MissingKey { section, key }
                if section == "GLOBAL_CONFIG" && key == "sensor_lowest_value"
        ));
    }

    #[test]
    fn non_integer_value_is_reported() {
        let err = GlobalConfig::from_text(
            "[GLOBAL_CONFIG]\nflags=on\nsensor_lowest_value=0\nsensor_highest_value=0\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigFormatError::InvalidValue { key, .. } if key == "flags"
        ));
    }

    #[test]
    fn syntax_error_names_the_line() {
        let err = TextConfig::parse("[RTC]\nsecond=1\nwhat is this\n").unwrap_err();
        assert!(matches!(err, ConfigFormatError::Syntax { line: 3 }));
    }

    #[test]
    fn key_value_before_any_section_is_an_error() {
        let err = TextConfig::parse("flags=1\n").unwrap_err();
        assert!(matches!(err, ConfigFormatError::Syntax { line: 1 }));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "# exported settings\n\n[GLOBAL_CONFIG]\n; comment\nflags=1\nsensor_lowest_value=2\nsensor_highest_value=3\n";
        let conf = GlobalConfig::from_text(text).unwrap();
        assert_eq!(conf.flags, 1);
    }

    #[test]
    fn multi_section_document_serves_every_type() {
        let mut doc = String::new();
        doc.push_str(
            &GlobalConfig {
                flags: 1,
                sensor_lowest_value: 50,
                sensor_highest_value: 800,
            }
            .to_text(),
        );
        for pot in 0..2u8 {
            doc.push_str(
                &PotConfig {
                    pot_number: pot,
                    flags: 1,
                    min_threshold: 10 + pot,
                    max_threshold: 100,
                    start_time: 0,
                    end_time: 43199,
                    dow_on_mask: 0x7F,
                }
                .to_text(),
            );
        }

        let cfg = TextConfig::parse(&doc).unwrap();
        assert!(cfg.has_section("GLOBAL_CONFIG"));
        assert_eq!(GlobalConfig::from_text(&doc).unwrap().sensor_highest_value, 800);
        assert_eq!(PotConfig::from_config(1, &cfg).unwrap().min_threshold, 11);
        assert!(!cfg.has_section("POT_5_CONFIG"));
    }

    #[test]
    fn rtc_from_text_clamps_like_the_wire_decoder() {
        let text = "[RTC]\nsecond=99\nminute=0\nhour=0\nday=0\nmonth=0\nyear=0\nday_of_week=0\n";
        assert_eq!(Rtc::from_text(text).unwrap().second, 59);
    }

    #[test]
    fn rtc_from_text_saturates_values_wider_than_a_byte() {
        // 300 would wrap to 44 under a plain u8 cast; it must saturate.
        let text =
            "[RTC]\nsecond=300\nminute=1000\nhour=70000\nday=0\nmonth=0\nyear=0\nday_of_week=0\n";
        let rtc = Rtc::from_text(text).unwrap();
        assert_eq!(rtc.second, 59);
        assert_eq!(rtc.minute, 59);
        assert_eq!(rtc.hour, 23);
    }

    #[test]
    fn rtc_from_text_clamps_negative_values_to_zero() {
        let text = "[RTC]\nsecond=-5\nminute=-1\nhour=0\nday=0\nmonth=0\nyear=0\nday_of_week=0\n";
        let rtc = Rtc::from_text(text).unwrap();
        assert_eq!(rtc.second, 0);
        assert_eq!(rtc.minute, 0);
    }
}

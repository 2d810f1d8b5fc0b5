use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

pub const TIMESTAMP_WITH_SECONDS: &str = "%Y/%m/%d %H:%M:%S";
pub const TIMESTAMP_WITHOUT_SECONDS: &str = "%Y/%m/%d %H:%M";

/// How durations are presented as minutes.
///
/// `OneDecimal` rounds to a tenth of a minute (`7.5`); `Whole` truncates to
/// integer minutes (`7`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinutePolicy {
    #[default]
    OneDecimal,
    Whole,
}

impl MinutePolicy {
    pub fn minutes(&self, duration: Duration) -> f64 {
        let secs = duration.as_secs_f64();
        let minutes = (secs / 60.0).floor() + (secs % 60.0) / 60.0;
        match self {
            MinutePolicy::OneDecimal => (minutes * 10.0).round() / 10.0,
            MinutePolicy::Whole => minutes.floor(),
        }
    }

    pub fn display(&self, duration: Duration) -> String {
        Minutes::of(duration, *self).to_string()
    }
}

/// A minute count together with the policy it was produced under, so it is
/// written out the same way it is shown (`7.5` or `7`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minutes {
    value: f64,
    policy: MinutePolicy,
}

impl Minutes {
    pub fn new(value: f64, policy: MinutePolicy) -> Self {
        Self { value, policy }
    }

    pub fn of(duration: Duration, policy: MinutePolicy) -> Self {
        Self::new(policy.minutes(duration), policy)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn policy(&self) -> MinutePolicy {
        self.policy
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.policy {
            MinutePolicy::OneDecimal => write!(f, "{:.1}", self.value),
            MinutePolicy::Whole => write!(f, "{:.0}", self.value),
        }
    }
}

impl PartialEq<f64> for Minutes {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl Serialize for Minutes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Minutes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        let value = raw.parse::<f64>().map_err(serde::de::Error::custom)?;
        let policy = if raw.contains('.') {
            MinutePolicy::OneDecimal
        } else {
            MinutePolicy::Whole
        };
        Ok(Self::new(value, policy))
    }
}

/// Presentation settings for timestamps and minute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    pub show_seconds: bool,
    pub policy: MinutePolicy,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            show_seconds: true,
            policy: MinutePolicy::default(),
        }
    }
}

impl Formatter {
    pub fn new(show_seconds: bool, policy: MinutePolicy) -> Self {
        Self {
            show_seconds,
            policy,
        }
    }

    pub fn pattern(&self) -> &'static str {
        if self.show_seconds {
            TIMESTAMP_WITH_SECONDS
        } else {
            TIMESTAMP_WITHOUT_SECONDS
        }
    }

    pub fn timestamp(&self, wall: &DateTime<Local>) -> String {
        wall.format(self.pattern()).to_string()
    }

    pub fn minutes(&self, duration: Duration) -> String {
        self.policy.display(duration)
    }

    pub fn minutes_of(&self, duration: Duration) -> Minutes {
        Minutes::of(duration, self.policy)
    }
}

/// Parse a timestamp written by [`Formatter::timestamp`], with or without seconds.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_WITH_SECONDS)
        .or_else(|_| NaiveDateTime::parse_from_str(s, TIMESTAMP_WITHOUT_SECONDS))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn mins_secs(m: u64, s: u64) -> Duration {
        Duration::from_secs(m * 60 + s)
    }

    #[test]
    fn one_decimal_rounds_to_tenths() {
        let policy = MinutePolicy::OneDecimal;
        assert_eq!(policy.minutes(mins_secs(5, 0)), 5.0);
        assert_eq!(policy.minutes(mins_secs(7, 30)), 7.5);
        assert_eq!(policy.minutes(mins_secs(0, 2)), 0.0);
        assert_eq!(policy.minutes(mins_secs(0, 58)), 1.0);
        assert_eq!(policy.display(mins_secs(2, 0)), "2.0");
        assert_eq!(policy.display(mins_secs(12, 45)), "12.8");
    }

    #[test]
    fn whole_truncates() {
        let policy = MinutePolicy::Whole;
        assert_eq!(policy.minutes(mins_secs(7, 59)), 7.0);
        assert_eq!(policy.display(mins_secs(7, 59)), "7");
        assert_eq!(policy.display(mins_secs(0, 59)), "0");
    }

    #[test]
    fn sub_second_durations() {
        let policy = MinutePolicy::OneDecimal;
        assert_eq!(policy.minutes(Duration::from_millis(90_500)), 1.5);
    }

    #[test]
    fn minutes_display_follows_policy() {
        assert_eq!(Minutes::new(7.0, MinutePolicy::Whole).to_string(), "7");
        assert_eq!(Minutes::new(7.0, MinutePolicy::OneDecimal).to_string(), "7.0");
        assert_eq!(Minutes::of(mins_secs(7, 50), MinutePolicy::Whole), 7.0);
    }

    #[test]
    fn pattern_follows_seconds_setting() {
        let wall = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();

        let with = Formatter::new(true, MinutePolicy::OneDecimal);
        let without = Formatter::new(false, MinutePolicy::OneDecimal);

        assert_eq!(with.timestamp(&wall), "2024/03/01 09:05:07");
        assert_eq!(without.timestamp(&wall), "2024/03/01 09:05");
    }

    #[test]
    fn format_then_parse_keeps_minute() {
        let wall = Local.with_ymd_and_hms(2023, 12, 31, 23, 59, 41).unwrap();

        for formatter in [
            Formatter::new(true, MinutePolicy::OneDecimal),
            Formatter::new(false, MinutePolicy::Whole),
        ] {
            let parsed = parse_timestamp(&formatter.timestamp(&wall)).unwrap();
            assert_eq!(parsed.date(), wall.date_naive());
            assert_eq!(parsed.hour(), 23);
            assert_eq!(parsed.minute(), 59);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-03-01 09:05"), None);
    }
}

use crate::clock::Stamp;
use crate::format::Formatter;
use std::time::Duration;

/// Builds the status lines reported after each transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Messages {
    formatter: Formatter,
}

impl Messages {
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn started(&self, start: &Stamp) -> String {
        format!("Started activity ({})", self.formatter.timestamp(&start.wall))
    }

    pub fn interrupted(&self, delta: Duration) -> String {
        format!(
            "Interrupted activity: {} min current delta",
            self.formatter.minutes(delta)
        )
    }

    pub fn resumed(&self, interruption: Duration) -> String {
        format!(
            "Resumed activity: {} min interrupted.",
            self.formatter.minutes(interruption)
        )
    }

    pub fn stopped(&self, end: &Stamp, delta: Duration, interrupted: Duration) -> String {
        format!(
            "Stopped activity ({}): {} min total delta, {} min total interrupted.",
            self.formatter.timestamp(&end.wall),
            self.formatter.minutes(delta),
            self.formatter.minutes(interrupted)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::format::MinutePolicy;
    use chrono::{Local, TimeZone};

    #[test]
    fn stopped_message_embeds_all_values() {
        let clock =
            ManualClock::starting_at(Local.with_ymd_and_hms(2024, 5, 6, 14, 30, 0).unwrap());
        let messages = Messages::new(Formatter::new(false, MinutePolicy::OneDecimal));

        let msg = messages.stopped(
            &clock.now(),
            Duration::from_secs(8 * 60),
            Duration::from_secs(90),
        );

        assert_eq!(
            msg,
            "Stopped activity (2024/05/06 14:30): 8.0 min total delta, 1.5 min total interrupted."
        );
    }

    #[test]
    fn whole_minutes_policy_in_messages() {
        let messages = Messages::new(Formatter::new(true, MinutePolicy::Whole));

        assert_eq!(
            messages.interrupted(Duration::from_secs(5 * 60 + 50)),
            "Interrupted activity: 5 min current delta"
        );
        assert_eq!(
            messages.resumed(Duration::from_secs(59)),
            "Resumed activity: 0 min interrupted."
        );
    }
}

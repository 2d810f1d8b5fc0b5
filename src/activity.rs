use crate::clock::{Clock, Stamp, SystemClock};
use crate::interruption::Interruption;
use crate::log_file::LogEntry;
use crate::messages::Messages;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    NotStarted,
    Active,
    Interrupted,
    Stopped,
}

/// Timer for a single step of work.
///
/// Moves through `not_started -> active <-> interrupted -> stopped`. Each
/// transition returns the status line to show the user, or `None` when the
/// transition does not apply to the current status. Once stopped, the timer
/// no longer changes.
#[derive(Debug)]
pub struct Activity<C: Clock = SystemClock> {
    clock: C,
    messages: Messages,
    status: Status,
    start: Option<Stamp>,
    end: Option<Stamp>,
    interrupted_total: Duration,
    delta_total: Duration,
    current_interruption: Interruption,
    interruption_count: usize,
}

impl Activity<SystemClock> {
    pub fn new(messages: Messages) -> Self {
        Self::with_clock(SystemClock, messages)
    }
}

impl<C: Clock> Activity<C> {
    pub fn with_clock(clock: C, messages: Messages) -> Self {
        Self {
            clock,
            messages,
            status: Status::NotStarted,
            start: None,
            end: None,
            interrupted_total: Duration::ZERO,
            delta_total: Duration::ZERO,
            current_interruption: Interruption::new(),
            interruption_count: 0,
        }
    }

    pub fn start(&mut self) -> Option<String> {
        if self.status != Status::NotStarted {
            return None;
        }
        let now = self.clock.now();
        self.start = Some(now);
        self.status = Status::Active;
        log::debug!("activity started");
        Some(self.messages.started(&now))
    }

    pub fn interrupt(&mut self) -> Option<String> {
        if self.status != Status::Active {
            return None;
        }
        let start = self.start?;
        self.current_interruption.start(self.clock.now());
        let paused_at = *self.current_interruption.start_time()?;
        self.delta_total = paused_at
            .duration_since(&start)
            .saturating_sub(self.interrupted_total);
        self.status = Status::Interrupted;
        log::debug!("activity interrupted after {:?} active", self.delta_total);
        Some(self.messages.interrupted(self.delta_total))
    }

    pub fn resume(&mut self) -> Option<String> {
        if self.status != Status::Interrupted {
            return None;
        }
        let paused = self.close_interruption(self.clock.now())?;
        self.status = Status::Active;
        log::debug!("activity resumed after {:?} paused", paused);
        Some(self.messages.resumed(paused))
    }

    /// Finish the activity. An open interruption is closed first and counted
    /// towards the interrupted total.
    pub fn stop(&mut self) -> Option<String> {
        if !matches!(self.status, Status::Active | Status::Interrupted) {
            return None;
        }
        let start = self.start?;
        let now = self.clock.now();
        if self.status == Status::Interrupted {
            self.close_interruption(now)?;
        }
        self.end = Some(now);
        self.delta_total = now
            .duration_since(&start)
            .saturating_sub(self.interrupted_total);
        self.status = Status::Stopped;
        log::debug!(
            "activity stopped: {:?} delta, {:?} interrupted",
            self.delta_total,
            self.interrupted_total
        );
        Some(
            self.messages
                .stopped(&now, self.delta_total, self.interrupted_total),
        )
    }

    fn close_interruption(&mut self, now: Stamp) -> Option<Duration> {
        self.current_interruption.end(now);
        let paused = self.current_interruption.duration()?;
        self.interrupted_total += paused;
        self.interruption_count += 1;
        Some(paused)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Formatted start time, `None` before the activity starts.
    pub fn start_time(&self) -> Option<String> {
        if self.status == Status::NotStarted {
            return None;
        }
        self.start
            .as_ref()
            .map(|s| self.messages.formatter().timestamp(&s.wall))
    }

    /// Formatted end time, `None` until the activity stops.
    pub fn end_time(&self) -> Option<String> {
        if self.status != Status::Stopped {
            return None;
        }
        self.end
            .as_ref()
            .map(|s| self.messages.formatter().timestamp(&s.wall))
    }

    pub fn interrupted_total(&self) -> Duration {
        self.interrupted_total
    }

    /// Active time as of the last interrupt or stop.
    pub fn delta_total(&self) -> Duration {
        self.delta_total
    }

    pub fn current_interruption(&self) -> &Interruption {
        &self.current_interruption
    }

    pub fn interruption_count(&self) -> usize {
        self.interruption_count
    }

    /// Active time right now, for live display.
    pub fn elapsed(&self) -> Duration {
        match (self.status, &self.start) {
            (Status::Active, Some(start)) => self
                .clock
                .now()
                .duration_since(start)
                .saturating_sub(self.interrupted_total),
            (Status::Interrupted | Status::Stopped, _) => self.delta_total,
            _ => Duration::ZERO,
        }
    }

    /// How long the open interruption has been running.
    pub fn paused_for(&self) -> Option<Duration> {
        if self.status != Status::Interrupted {
            return None;
        }
        self.current_interruption
            .start_time()
            .map(|started| self.clock.now().duration_since(started))
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Record for the log file. Only available once stopped.
    pub fn summary(
        &self,
        program_name: &str,
        phase_name: &str,
        comment: &str,
    ) -> Option<LogEntry> {
        let formatter = self.messages.formatter();
        Some(LogEntry {
            program_name: program_name.to_string(),
            phase_name: phase_name.to_string(),
            start_time: self.start_time()?,
            interrupted_minutes: formatter.minutes_of(self.interrupted_total),
            end_time: self.end_time()?,
            delta_minutes: formatter.minutes_of(self.delta_total),
            comment: comment.to_string(),
        })
    }
}

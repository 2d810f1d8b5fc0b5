use crate::clock::Stamp;
use std::time::Duration;

/// A single pause within an activity.
///
/// Starting an interruption that is already running, or ending one that is
/// not, does nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interruption {
    start: Option<Stamp>,
    end: Option<Stamp>,
    active: bool,
}

impl Interruption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Stamp) {
        if !self.active {
            self.start = Some(now);
            self.end = None;
            self.active = true;
        }
    }

    pub fn end(&mut self, now: Stamp) {
        if self.active {
            self.end = Some(now);
            self.active = false;
        }
    }

    /// Length of the interruption, or `None` while it is still running or
    /// has never run.
    pub fn duration(&self) -> Option<Duration> {
        if self.active {
            return None;
        }
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    pub fn start_time(&self) -> Option<&Stamp> {
        self.start.as_ref()
    }

    pub fn end_time(&self) -> Option<&Stamp> {
        self.end.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

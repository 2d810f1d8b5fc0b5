use crate::format::parse_timestamp;
use crate::log_file::LogEntry;
use chrono::NaiveDateTime;

/// Logged time for one program/phase pair
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTotal {
    pub program_name: String,
    pub phase_name: String,
    pub entries: usize,
    pub delta_minutes: f64,
    pub interrupted_minutes: f64,
    pub first_start: Option<NaiveDateTime>,
    pub last_end: Option<NaiveDateTime>,
}

impl PhaseTotal {
    fn new(entry: &LogEntry) -> Self {
        Self {
            program_name: entry.program_name.clone(),
            phase_name: entry.phase_name.clone(),
            entries: 0,
            delta_minutes: 0.0,
            interrupted_minutes: 0.0,
            first_start: None,
            last_end: None,
        }
    }

    fn add(&mut self, entry: &LogEntry) {
        self.entries += 1;
        self.delta_minutes += entry.delta_minutes.value();
        self.interrupted_minutes += entry.interrupted_minutes.value();

        if let Some(start) = parse_timestamp(&entry.start_time) {
            self.first_start = Some(self.first_start.map_or(start, |s| s.min(start)));
        }
        if let Some(end) = parse_timestamp(&entry.end_time) {
            self.last_end = Some(self.last_end.map_or(end, |e| e.max(end)));
        }
    }
}

/// Group entries by program and phase, keeping the order in which each pair
/// first appears in the log.
pub fn summarize(entries: &[LogEntry]) -> Vec<PhaseTotal> {
    let mut totals: Vec<PhaseTotal> = Vec::new();

    for entry in entries {
        let idx = totals
            .iter()
            .position(|t| t.program_name == entry.program_name && t.phase_name == entry.phase_name);
        let total = match idx {
            Some(i) => &mut totals[i],
            None => {
                totals.push(PhaseTotal::new(entry));
                let last = totals.len() - 1;
                &mut totals[last]
            }
        };
        total.add(entry);
    }

    totals
}

pub fn render_report(totals: &[PhaseTotal]) -> Vec<String> {
    if totals.is_empty() {
        return vec!["No activities logged yet.".to_string()];
    }

    let program_width = totals
        .iter()
        .map(|t| t.program_name.len())
        .max()
        .unwrap_or(0)
        .max("program".len());
    let phase_width = totals
        .iter()
        .map(|t| t.phase_name.len())
        .max()
        .unwrap_or(0)
        .max("phase".len());

    let mut lines = vec![format!(
        "{:<pw$}  {:<fw$}  {:>7}  {:>9}  {:>11}",
        "program",
        "phase",
        "entries",
        "delta min",
        "interrupted",
        pw = program_width,
        fw = phase_width
    )];

    for t in totals {
        lines.push(format!(
            "{:<pw$}  {:<fw$}  {:>7}  {:>9.1}  {:>11.1}",
            t.program_name,
            t.phase_name,
            t.entries,
            t.delta_minutes,
            t.interrupted_minutes,
            pw = program_width,
            fw = phase_width
        ));
    }

    let delta: f64 = totals.iter().map(|t| t.delta_minutes).sum();
    let interrupted: f64 = totals.iter().map(|t| t.interrupted_minutes).sum();
    lines.push(format!(
        "total: {:.1} min active, {:.1} min interrupted",
        delta, interrupted
    ));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MinutePolicy, Minutes};

    fn entry(
        program: &str,
        phase: &str,
        start: &str,
        end: &str,
        delta: f64,
        int: f64,
    ) -> LogEntry {
        LogEntry {
            program_name: program.into(),
            phase_name: phase.into(),
            start_time: start.into(),
            interrupted_minutes: Minutes::new(int, MinutePolicy::OneDecimal),
            end_time: end.into(),
            delta_minutes: Minutes::new(delta, MinutePolicy::OneDecimal),
            comment: String::new(),
        }
    }

    #[test]
    fn groups_by_program_and_phase() {
        let entries = vec![
            entry("p1", "design", "2024/03/01 09:00", "2024/03/01 09:30", 25.0, 5.0),
            entry("p1", "code", "2024/03/01 10:00", "2024/03/01 11:00", 60.0, 0.0),
            entry("p1", "design", "2024/03/02 08:00:00", "2024/03/02 08:10:00", 8.5, 1.5),
        ];

        let totals = summarize(&entries);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].phase_name, "design");
        assert_eq!(totals[0].entries, 2);
        assert_eq!(totals[0].delta_minutes, 33.5);
        assert_eq!(totals[0].interrupted_minutes, 6.5);
        assert_eq!(
            totals[0].first_start,
            parse_timestamp("2024/03/01 09:00")
        );
        assert_eq!(
            totals[0].last_end,
            parse_timestamp("2024/03/02 08:10:00")
        );
        assert_eq!(totals[1].phase_name, "code");
        assert_eq!(totals[1].entries, 1);
    }

    #[test]
    fn unparsable_timestamps_still_count() {
        let entries = vec![entry("p", "q", "False", "False", 3.0, 0.0)];

        let totals = summarize(&entries);

        assert_eq!(totals[0].entries, 1);
        assert_eq!(totals[0].delta_minutes, 3.0);
        assert_eq!(totals[0].first_start, None);
        assert_eq!(totals[0].last_end, None);
    }

    #[test]
    fn empty_report() {
        assert_eq!(render_report(&[]), vec!["No activities logged yet."]);
    }

    #[test]
    fn report_lists_each_pair_and_total() {
        let entries = vec![
            entry("prog", "plan", "2024/03/01 09:00", "2024/03/01 09:30", 20.0, 10.0),
            entry("prog", "test", "2024/03/01 10:00", "2024/03/01 10:15", 15.0, 0.0),
        ];

        let lines = render_report(&summarize(&entries));

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("prog"));
        assert!(lines[1].contains("plan"));
        assert!(lines[1].contains("20.0"));
        assert_eq!(lines[3], "total: 35.0 min active, 10.0 min interrupted");
    }
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::activity::Status;
use crate::clock::Clock;
use crate::session::{Mode, Session};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn status_color(status: Status) -> Color {
    match status {
        Status::NotStarted => Color::Gray,
        Status::Active => Color::Green,
        Status::Interrupted => Color::Yellow,
        Status::Stopped => Color::Cyan,
    }
}

impl<C: Clock> Widget for &Session<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let activity = self.activity();
        let formatter = activity.messages().formatter();
        let status = activity.status();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let status_style = Style::default()
            .patch(bold_style)
            .fg(status_color(status));
        let key_style = Style::default().patch(bold_style).fg(Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(6), // Timing
                Constraint::Length(3), // Last message
                Constraint::Min(1),    // Commands or comment
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(self.program_name().to_string(), bold_style),
            Span::raw(" / "),
            Span::styled(self.phase_name().to_string(), bold_style),
        ]))
        .block(Block::default().borders(Borders::ALL).title("psplog"))
        .alignment(Alignment::Center);
        title.render(chunks[0], buf);

        let unavailable = || "--".to_string();
        let mut timing = vec![
            Line::from(vec![
                Span::styled("status       ", dim_style),
                Span::styled(status.to_string().to_uppercase(), status_style),
            ]),
            Line::from(vec![
                Span::styled("started      ", dim_style),
                Span::raw(activity.start_time().unwrap_or_else(unavailable)),
            ]),
            Line::from(vec![
                Span::styled("active       ", dim_style),
                Span::raw(format!("{} min", formatter.minutes(activity.elapsed()))),
            ]),
            Line::from(vec![
                Span::styled("interrupted  ", dim_style),
                Span::raw(format!(
                    "{} min ({} pauses)",
                    formatter.minutes(activity.interrupted_total()),
                    activity.interruption_count()
                )),
            ]),
        ];
        if let Some(paused) = activity.paused_for() {
            timing.push(Line::from(vec![
                Span::styled("paused for   ", dim_style),
                Span::styled(
                    format!("{} min", formatter.minutes(paused)),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
        }
        if let Some(end) = activity.end_time() {
            timing.push(Line::from(vec![
                Span::styled("stopped      ", dim_style),
                Span::raw(end),
            ]));
        }
        Paragraph::new(timing).render(chunks[1], buf);

        if let Some(message) = self.last_message() {
            Paragraph::new(Span::styled(
                message.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
        }

        match self.mode() {
            Mode::Tracking => {
                let mut spans = Vec::new();
                for command in self.available_commands() {
                    spans.push(Span::styled(format!("({})", command.key()), key_style));
                    spans.push(Span::styled(format!("{}  ", command.label()), dim_style));
                }
                Paragraph::new(Line::from(spans)).render(chunks[3], buf);
            }
            Mode::Comment => {
                let input = Paragraph::new(Line::from(vec![
                    Span::raw(self.comment().to_string()),
                    Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                ]))
                .block(Block::default().borders(Borders::ALL).title(format!(
                    "comment (max {}, enter to save, esc to skip)",
                    self.comment_max_len()
                )));
                input.render(chunks[3], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Activity;
    use crate::clock::ManualClock;
    use crate::messages::Messages;
    use crate::session::Command;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text<C: Clock>(session: &Session<C>) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(session, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn session() -> (ManualClock, Session<ManualClock>) {
        let clock = ManualClock::new();
        let activity = Activity::with_clock(clock.clone(), Messages::default());
        (clock, Session::new("prog1", "design", activity, 40))
    }

    #[test]
    fn renders_names_and_start_hint() {
        let (_, session) = session();

        let text = screen_text(&session);

        assert!(text.contains("prog1 / design"));
        assert!(text.contains("NOT_STARTED"));
        assert!(text.contains("(s)start"));
        assert!(text.contains("(q)quit"));
        assert!(!text.contains("(i)interrupt"));
    }

    #[test]
    fn renders_pause_while_interrupted() {
        let (clock, mut session) = session();
        session.apply(Command::Start);
        clock.advance_mins(5);
        session.apply(Command::Interrupt);
        clock.advance_mins(2);

        let text = screen_text(&session);

        assert!(text.contains("INTERRUPTED"));
        assert!(text.contains("paused for"));
        assert!(text.contains("2.0 min"));
        assert!(text.contains("(r)resume"));
    }

    #[test]
    fn renders_comment_prompt_after_stop() {
        let (clock, mut session) = session();
        session.apply(Command::Start);
        clock.advance_mins(1);
        session.apply(Command::Stop);
        session.push_comment_char('h');
        session.push_comment_char('i');

        let text = screen_text(&session);

        assert!(text.contains("STOPPED"));
        assert!(text.contains("comment (max 40"));
        assert!(text.contains("hi_"));
    }
}

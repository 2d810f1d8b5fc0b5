use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::activity::{Activity, Status};
use crate::clock::{Clock, SystemClock};
use crate::log_file::LogEntry;
use crate::util::sanitize_comment;

/// Single-letter commands offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Interrupt,
    Resume,
    Stop,
    Quit,
}

impl Command {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            's' => Some(Command::Start),
            'i' => Some(Command::Interrupt),
            'r' => Some(Command::Resume),
            't' => Some(Command::Stop),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn key(&self) -> char {
        match self {
            Command::Start => 's',
            Command::Interrupt => 'i',
            Command::Resume => 'r',
            Command::Stop => 't',
            Command::Quit => 'q',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Interrupt => "interrupt",
            Command::Resume => "resume",
            Command::Stop => "stop",
            Command::Quit => "quit",
        }
    }
}

/// Commands that make sense for an activity in `status`
pub fn available_commands(status: Status) -> &'static [Command] {
    match status {
        Status::NotStarted => &[Command::Start, Command::Quit],
        Status::Active => &[Command::Interrupt, Command::Stop, Command::Quit],
        Status::Interrupted => &[Command::Resume, Command::Stop, Command::Quit],
        Status::Stopped => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tracking,
    Comment,
}

/// Result of feeding input to a session
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Input was accepted; keep going.
    Applied,
    /// Input is not valid right now.
    Ignored,
    /// User asked to leave without saving.
    Quit,
    /// Activity is stopped and commented; ready to be logged.
    Finished(LogEntry),
}

/// Interactive state for tracking one step: the activity plus what the
/// driver needs around it.
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    program_name: String,
    phase_name: String,
    activity: Activity<C>,
    mode: Mode,
    comment: String,
    comment_max_len: usize,
    last_message: Option<String>,
}

impl<C: Clock> Session<C> {
    pub fn new(
        program_name: impl Into<String>,
        phase_name: impl Into<String>,
        activity: Activity<C>,
        comment_max_len: usize,
    ) -> Self {
        Self {
            program_name: program_name.into(),
            phase_name: phase_name.into(),
            activity,
            mode: Mode::Tracking,
            comment: String::new(),
            comment_max_len,
            last_message: None,
        }
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn phase_name(&self) -> &str {
        &self.phase_name
    }

    pub fn activity(&self) -> &Activity<C> {
        &self.activity
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn comment_max_len(&self) -> usize {
        self.comment_max_len
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn available_commands(&self) -> &'static [Command] {
        if self.mode == Mode::Comment {
            return &[];
        }
        available_commands(self.activity.status())
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        if !self.available_commands().contains(&command) {
            log::debug!(
                "ignoring {:?} while {}",
                command,
                self.activity.status()
            );
            return Outcome::Ignored;
        }

        let message = match command {
            Command::Start => self.activity.start(),
            Command::Interrupt => self.activity.interrupt(),
            Command::Resume => self.activity.resume(),
            Command::Stop => self.activity.stop(),
            Command::Quit => return Outcome::Quit,
        };

        match message {
            Some(msg) => {
                self.last_message = Some(msg);
                if command == Command::Stop {
                    self.mode = Mode::Comment;
                }
                Outcome::Applied
            }
            None => Outcome::Ignored,
        }
    }

    pub fn push_comment_char(&mut self, c: char) -> Outcome {
        if self.mode != Mode::Comment || c == ',' || c.is_control() {
            return Outcome::Ignored;
        }
        if self.comment.width() + c.width().unwrap_or(0) > self.comment_max_len {
            return Outcome::Ignored;
        }
        self.comment.push(c);
        Outcome::Applied
    }

    pub fn backspace(&mut self) -> Outcome {
        if self.mode != Mode::Comment || self.comment.pop().is_none() {
            return Outcome::Ignored;
        }
        Outcome::Applied
    }

    /// Close comment entry and produce the log record.
    pub fn submit(&mut self) -> Outcome {
        if self.mode != Mode::Comment {
            return Outcome::Ignored;
        }
        let comment = sanitize_comment(&self.comment, self.comment_max_len);
        match self
            .activity
            .summary(&self.program_name, &self.phase_name, &comment)
        {
            Some(entry) => Outcome::Finished(entry),
            None => Outcome::Ignored,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Outcome::Quit;
        }

        match self.mode {
            Mode::Tracking => match key.code {
                KeyCode::Char(c) => match Command::from_char(c) {
                    Some(command) => self.apply(command),
                    None => Outcome::Ignored,
                },
                _ => Outcome::Ignored,
            },
            Mode::Comment => match key.code {
                KeyCode::Char(c) => self.push_comment_char(c),
                KeyCode::Backspace => self.backspace(),
                KeyCode::Enter => self.submit(),
                KeyCode::Esc => {
                    self.comment.clear();
                    self.submit()
                }
                _ => Outcome::Ignored,
            },
        }
    }
}

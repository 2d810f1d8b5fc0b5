use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use psplog::{
    activity::Activity,
    clock::Clock,
    config::{Config, ConfigStore, FileConfigStore},
    format::MinutePolicy,
    log_file::{LogBook, LogEntry},
    logging,
    report::{render_report, summarize},
    runtime::{
        CrosstermEventSource, FixedTicker, Runner, Ticker, TrackerEvent, TrackerEventSource,
    },
    session::{Outcome, Session},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 500;

/// terminal time logger for personal-process steps
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Tracks the active time of one step of work, with interruptions, and appends a summary line to a log file when the step stops.\n\nKeys: (s) start, (i) interrupt, (r) resume, (t) stop, (q) quit without saving."
)]
pub struct Cli {
    /// program the work belongs to
    #[clap(required_unless_present_any = ["report", "save_config"])]
    program_name: Option<String>,

    /// process phase of the step (e.g. design, code, test)
    #[clap(required_unless_present_any = ["report", "save_config"])]
    phase_name: Option<String>,

    /// log file to append to (default: the configured or platform data location)
    #[clap(short = 'l', long)]
    log_file: Option<PathBuf>,

    /// show timestamps with minute resolution only
    #[clap(long)]
    no_seconds: bool,

    /// report truncated whole minutes instead of one decimal
    #[clap(long)]
    whole_minutes: bool,

    /// print logged totals per program and phase, then exit
    #[clap(long)]
    report: bool,

    /// write debug logging to this file
    #[clap(long)]
    debug_log: Option<PathBuf>,

    /// store the effective settings (config file plus these flags) as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags override values from the config file
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if self.no_seconds {
            config.show_seconds = false;
        }
        if self.whole_minutes {
            config.minute_policy = MinutePolicy::Whole;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    logging::init(cli.debug_log.as_deref())?;

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    let book = config.log_book();

    if cli.save_config {
        save_config(&store, &config)?;
    }

    if cli.report {
        return print_report(&book);
    }

    let (program_name, phase_name) = match (cli.program_name.clone(), cli.phase_name.clone()) {
        (Some(program), Some(phase)) => (program, phase),
        (None, None) if cli.save_config => return Ok(()),
        _ => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "program and phase names are required",
            )
            .exit(),
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    log::debug!(
        "tracking {}/{} into {}",
        program_name,
        phase_name,
        book.path().display()
    );

    let mut session = Session::new(
        program_name,
        phase_name,
        Activity::new(config.messages()),
        config.comment_max_len,
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut session, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result? {
        Outcome::Finished(entry) => {
            persist(&book, &entry, session.last_message())?;
            if let Some(message) = session.last_message() {
                println!("{}", message);
            }
            println!("Logged to {}", book.path().display());
        }
        _ => {
            log::info!("activity discarded without logging");
            println!("Discarded activity");
        }
    }

    Ok(())
}

/// Run the interactive loop until the user quits or a finished entry is ready
fn start_tui<B: Backend, C: Clock, E: TrackerEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    session: &mut Session<C>,
    runner: &Runner<E, T>,
) -> Result<Outcome, Box<dyn Error>> {
    loop {
        // redraw on every event so the active time keeps moving
        terminal.draw(|f| f.render_widget(&*session, f.area()))?;

        match runner.step() {
            TrackerEvent::Key(key) => match session.handle_key(key) {
                Outcome::Quit => return Ok(Outcome::Quit),
                finished @ Outcome::Finished(_) => return Ok(finished),
                Outcome::Applied | Outcome::Ignored => {}
            },
            TrackerEvent::Closed => {
                log::warn!("terminal input closed, leaving without logging");
                return Err("terminal input closed before the activity was logged".into());
            }
            TrackerEvent::Resize | TrackerEvent::Tick => {}
        }
    }
}

/// Append the finished entry. If the log cannot be written the stop message
/// and the would-be line go to stderr so the measurement is not lost.
fn persist(
    book: &LogBook,
    entry: &LogEntry,
    message: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if let Err(e) = book.append(entry) {
        eprintln!("could not write {}: {}", book.path().display(), e);
        if let Some(message) = message {
            eprintln!("{}", message);
        }
        if let Ok(line) = entry.to_csv_line() {
            eprint!("{}", line);
        }
        return Err(e.into());
    }
    Ok(())
}

fn save_config(store: &FileConfigStore, config: &Config) -> Result<(), Box<dyn Error>> {
    store.save(config)?;
    log::info!("saved settings to {}", store.path().display());
    println!("Saved settings to {}", store.path().display());
    Ok(())
}

fn print_report(book: &LogBook) -> Result<(), Box<dyn Error>> {
    let entries = book.read_entries()?;
    println!("{}", book.path().display());
    for line in render_report(&summarize(&entries)) {
        println!("{}", line);
    }
    Ok(())
}

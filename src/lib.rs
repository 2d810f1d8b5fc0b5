// Library surface for headless/integration tests and reuse.
// The terminal setup and argument parsing stay in main.rs.
pub mod activity;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod format;
pub mod interruption;
pub mod log_file;
pub mod logging;
pub mod messages;
pub mod report;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;

pub use activity::{Activity, Status};
pub use log_file::{LogBook, LogEntry};
pub use session::{Command, Outcome, Session};

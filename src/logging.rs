use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initialize the global logger.
///
/// Without a file, records go to stderr at the level given by `RUST_LOG`
/// (default `warn`). With a file, records are appended there at `debug` so
/// the full-screen interface stays clean.
pub fn init(debug_log: Option<&Path>) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    if let Some(path) = debug_log {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .filter_level(LevelFilter::Debug)
            .target(Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }

    // a second init (e.g. from tests) keeps the first logger
    let _ = builder.try_init();
    Ok(())
}

use crate::format::Minutes;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One finished activity, as persisted in the log file. Field order is the
/// column order on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub program_name: String,
    pub phase_name: String,
    pub start_time: String,
    pub interrupted_minutes: Minutes,
    pub end_time: String,
    pub delta_minutes: Minutes,
    pub comment: String,
}

impl LogEntry {
    /// The entry as it appears in the log file, trailing newline included.
    pub fn to_csv_line(&self) -> csv::Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(self)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Append-only comma separated log of finished activities
#[derive(Debug, Clone)]
pub struct LogBook {
    path: PathBuf,
}

impl LogBook {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> csv::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let line = entry.to_csv_line()?;
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        log::info!(
            "logged {}/{} to {}",
            entry.program_name,
            entry.phase_name,
            self.path.display()
        );
        Ok(())
    }

    /// All entries in file order. A missing file reads as an empty log.
    pub fn read_entries(&self) -> csv::Result<Vec<LogEntry>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .trim(csv::Trim::Fields)
            .from_reader(file);

        reader.deserialize().collect()
    }
}

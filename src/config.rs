use crate::app_dirs::AppDirs;
use crate::format::{Formatter, MinutePolicy};
use crate::log_file::LogBook;
use crate::messages::Messages;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_file: Option<PathBuf>,
    pub show_seconds: bool,
    pub minute_policy: MinutePolicy,
    pub comment_max_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: None,
            show_seconds: true,
            minute_policy: MinutePolicy::OneDecimal,
            comment_max_len: 80,
        }
    }
}

impl Config {
    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.show_seconds, self.minute_policy)
    }

    pub fn messages(&self) -> Messages {
        Messages::new(self.formatter())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(AppDirs::log_path)
    }

    pub fn log_book(&self) -> LogBook {
        LogBook::new(self.log_path())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!(
                        "ignoring unreadable config {}: {}",
                        self.path.display(),
                        e
                    );
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

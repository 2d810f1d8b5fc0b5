use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "psplog";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Default location of the activity log, `./log.txt` when no data
    /// directory can be resolved.
    pub fn log_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|proj_dirs| proj_dirs.data_local_dir().join("log.txt"))
            .unwrap_or_else(|| PathBuf::from("log.txt"))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("psplog_config.json"))
    }
}

//! Log file retention
//!
//! Every process run leaves one file in the logs directory (the control
//! panel and the display client each write their own). At startup the
//! control process sweeps files that have outlived the configured window.
//! A file's age is the timestamp `create_log_file_path` embedded in its
//! name, so the sweep only ever considers files this application wrote,
//! and the file the running process is writing is spared outright.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Local};

use super::file_writer::{parse_log_file_stamp, LogFileInfo};
use crate::config::Config;

/// Windows beyond a century behave as keep-everything
const MAX_WINDOW_DAYS: u64 = 36_500;

/// Age-based cleanup policy for the logs directory
#[derive(Debug, Clone)]
pub struct LogRetention {
    max_age_days: u64,
    current_log: Option<PathBuf>,
}

impl LogRetention {
    /// Build the policy from the configured retention window
    ///
    /// A window of 0 keeps nothing but the current log.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_age_days: config.log_retention_days.min(MAX_WINDOW_DAYS),
            current_log: None,
        }
    }

    /// Never remove this file, regardless of age
    pub fn with_current_log(mut self, current: &LogFileInfo) -> Self {
        self.current_log = Some(current.path.clone());
        self
    }

    /// Remove expired log files
    ///
    /// Returns how many files were removed. Names without a valid embedded
    /// stamp are not ours and are left alone.
    pub fn sweep(&self, logs_dir: &Path) -> Result<usize> {
        if !logs_dir.exists() {
            return Ok(0);
        }

        let cutoff = Local::now().naive_local() - Duration::days(self.max_age_days as i64);
        let mut removed = 0;

        let entries = fs::read_dir(logs_dir)
            .with_context(|| format!("Failed to read logs directory {}", logs_dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if Some(path.as_path()) == self.current_log.as_deref() {
                continue;
            }
            let Some(stamp) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_log_file_stamp)
            else {
                continue;
            };
            if stamp >= cutoff {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Removed expired log file: {}", path.display());
                    removed += 1;
                }
                Err(e) => tracing::warn!("Could not remove {}: {}", path.display(), e),
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::file_writer::{
        create_log_file_path, LOG_FILE_PREFIX, LOG_FILE_STAMP_FORMAT, LOG_FILE_SUFFIX,
    };
    use std::fs::File;
    use tempfile::TempDir;

    fn policy(days: u64) -> LogRetention {
        let config = Config {
            log_retention_days: days,
            ..Default::default()
        };
        LogRetention::from_config(&config)
    }

    fn stamped_log(dir: &Path, age_days: i64) -> PathBuf {
        let stamp = (Local::now().naive_local() - Duration::days(age_days))
            .format(LOG_FILE_STAMP_FORMAT)
            .to_string();
        let path = dir.join(format!("{LOG_FILE_PREFIX}{stamp}{LOG_FILE_SUFFIX}"));
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn test_sweep_removes_only_expired_files() {
        let temp_dir = TempDir::new().unwrap();
        let expired = stamped_log(temp_dir.path(), 10);
        let fresh = stamped_log(temp_dir.path(), 1);

        let removed = policy(7).sweep(temp_dir.path()).unwrap();

        assert_eq!(removed, 1);
        assert!(!expired.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn test_sweep_leaves_foreign_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let notes = temp_dir.path().join("notes.txt");
        let bad_stamp = temp_dir.path().join("podium-not-a-date.log");
        let other_app = temp_dir.path().join("other-2020-01-01_00-00-00.log");
        for path in [&notes, &bad_stamp, &other_app] {
            File::create(path).unwrap();
        }

        let removed = policy(0).sweep(temp_dir.path()).unwrap();

        assert_eq!(removed, 0);
        assert!(notes.exists());
        assert!(bad_stamp.exists());
        assert!(other_app.exists());
    }

    #[test]
    fn test_sweep_spares_the_current_log() {
        let temp_dir = TempDir::new().unwrap();
        let current = stamped_log(temp_dir.path(), 30);
        let other = stamped_log(temp_dir.path(), 29);
        let info = LogFileInfo {
            path: current.clone(),
        };

        let removed = policy(7)
            .with_current_log(&info)
            .sweep(temp_dir.path())
            .unwrap();

        assert_eq!(removed, 1);
        assert!(current.exists());
        assert!(!other.exists());
    }

    #[test]
    fn test_zero_window_expires_previous_runs() {
        let temp_dir = TempDir::new().unwrap();
        let yesterday = stamped_log(temp_dir.path(), 1);

        let removed = policy(0).sweep(temp_dir.path()).unwrap();

        assert_eq!(removed, 1);
        assert!(!yesterday.exists());
    }

    #[test]
    fn test_sweep_of_missing_dir_is_a_noop() {
        let removed = policy(7)
            .sweep(Path::new("/nonexistent/podium/logs"))
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_writer_generated_file_survives_the_sweep() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_log_file_path(temp_dir.path());
        File::create(&path).unwrap();

        let removed = policy(7).sweep(temp_dir.path()).unwrap();

        assert_eq!(removed, 0);
        assert!(path.exists());
    }
}

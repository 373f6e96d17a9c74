//! Log file locations
//!
//! Logs live in `$XDG_STATE_HOME/dirview/logs/` (usually
//! `~/.local/state/dirview/logs/`), one `dirview-{PID}.log` per process.
//! Logs left behind by processes that are no longer running are removed on
//! startup once they are a day old.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

const CLEANUP_AGE: Duration = Duration::from_secs(24 * 60 * 60);

const APP_DIR: &str = "dirview";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Directory holding the log files, created on first use
///
/// Falls back to the system temp directory when the state directory cannot
/// be determined or created.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("dirview-logs");
        let dir = state_log_dir().unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            return fallback;
        }
        dir
    })
}

fn state_log_dir() -> Option<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(state_home);
        if path.is_absolute() {
            return Some(path.join(APP_DIR).join("logs"));
        }
    }

    dirs::home_dir().map(|home| home.join(".local").join("state").join(APP_DIR).join("logs"))
}

/// `{log_dir}/dirview-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("{}-{}.log", APP_DIR, std::process::id()))
}

/// Remove log files of processes that are gone
pub fn cleanup_stale_logs() {
    cleanup_stale_logs_in_dir(log_dir(), std::process::id());
}

fn cleanup_stale_logs_in_dir(dir: &Path, current_pid: u32) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(pid) = extract_pid_from_filename(&file_name.to_string_lossy()) else {
            continue;
        };
        if pid == current_pid {
            continue;
        }

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && !is_process_running(pid) && is_file_older_than(&entry.path(), CLEANUP_AGE) {
            match fs::remove_file(entry.path()) {
                Ok(()) => tracing::debug!("Removed stale log {:?}", entry.path()),
                Err(e) => tracing::debug!("Failed to remove stale log {:?}: {}", entry.path(), e),
            }
        }
    }
}

fn is_file_older_than(path: &Path, age: Duration) -> bool {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map(|elapsed| elapsed > age)
        .unwrap_or(false)
}

/// PID of a `name-{PID}.log` file
fn extract_pid_from_filename(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(".log")?;
    let (_, pid) = stem.rsplit_once('-')?;
    pid.parse().ok()
}

fn is_process_running(pid: u32) -> bool {
    #[cfg(unix)]
    {
        // Zero and out-of-range values would address process groups
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            return false;
        };
        if pid <= 0 {
            return false;
        }
        // Signal 0 only checks that the process exists
        unsafe {
            libc::kill(pid, 0) == 0
                || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
        }
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        true
    }
}

/// Print the config and log locations
pub fn print_all_paths() {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let config_path = crate::config::Config::user_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unavailable>".to_string());

    writeln!(handle, "dirview paths:").ok();
    writeln!(handle, "  config: {}", config_path).ok();
    writeln!(handle, "  logs:   {}", log_dir().display()).ok();
    writeln!(handle, "  log:    {}", main_log_path().display()).ok();
}

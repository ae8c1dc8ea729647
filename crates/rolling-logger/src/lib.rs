//! Rolling Logger
//!
//! A size-rotated log file plus a circular buffer of the most recent lines.
//! `init_logger` installs a `tracing-subscriber` fmt subscriber that also
//! receives records emitted through the `log` facade.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// Rotate once the active file grows past this many bytes
pub const DEFAULT_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Number of rotated files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 3;
/// Lines kept in the in-memory buffer
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingFile> = OnceLock::new();

/// Rotation and buffer limits
#[derive(Debug, Clone, Copy)]
pub struct RollingOptions {
    pub max_bytes: u64,
    pub max_files: usize,
    pub buffer_lines: usize,
}

impl Default for RollingOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

struct RollingInner {
    path: PathBuf,
    file: File,
    written: u64,
    options: RollingOptions,
    recent: VecDeque<String>,
    partial: String,
}

/// Cloneable writer handle; every clone appends to the same file
#[derive(Clone)]
pub struct RollingFile {
    inner: Arc<Mutex<RollingInner>>,
}

impl RollingFile {
    /// Open (or create) `<dir>/<app_name>.log` for appending
    pub fn open(dir: &Path, app_name: &str, options: RollingOptions) -> Result<Self, String> {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create log dir: {}", e))?;
        let path = dir.join(format!("{}.log", app_name));
        let file = open_append(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            inner: Arc::new(Mutex::new(RollingInner {
                path,
                file,
                written,
                options,
                recent: VecDeque::with_capacity(options.buffer_lines),
                partial: String::new(),
            })),
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().recent.iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RollingInner> {
        // Poisoned by a panicking writer; keep logging
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RollingInner {
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let max_files = self.options.max_files;
        if max_files == 0 {
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let rotated = |n: usize| PathBuf::from(format!("{}.{}", self.path.display(), n));
        let oldest = rotated(max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..max_files).rev() {
            let from = rotated(n);
            if from.exists() {
                fs::rename(&from, rotated(n + 1))?;
            }
        }
        fs::rename(&self.path, rotated(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        if self.options.buffer_lines == 0 {
            return;
        }
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.recent.len() == self.options.buffer_lines {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end_matches(['\r', '\n']).to_string());
        }
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        if inner.written > 0 && inner.written + buf.len() as u64 > inner.options.max_bytes {
            inner.rotate()?;
        }
        inner.file.write_all(buf)?;
        inner.written += buf.len() as u64;
        inner.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

fn open_append(path: &Path) -> Result<File, String> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))
}

/// Initialise the global logger with default limits
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, RollingOptions::default())
}

/// Initialise the global logger
///
/// Installs a fmt subscriber writing into the rolling file. `log` records are
/// forwarded to the same subscriber. Calling this twice is an error.
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    options: RollingOptions,
) -> Result<(), String> {
    let file = RollingFile::open(log_dir.as_ref(), app_name, options)?;
    let writer = file.clone();

    LOGGER
        .set(file)
        .map_err(|_| "Logger already initialized".to_string())?;

    tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    tracing::info!(app = app_name, "logger started at {}", chrono::Local::now().to_rfc3339());
    Ok(())
}

/// Recent lines from the global logger (empty before `init_logger`)
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingFile::recent_lines).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    if LOGGER.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}

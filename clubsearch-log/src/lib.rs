//! Logging for the clubsearch workspace.
//!
//! Every crate in the workspace logs through the macros exported here, so a
//! single set of environment variables controls what a run prints.
//!
//! ```rust
//! use clubsearch_log::{debug, info, warn};
//!
//! info!("Connected to {}", "http://localhost:9200");
//! debug!(target: "clubsearch::bulk", "Flushing {} items", 3);
//! warn!("Bulk item failed");
//! ```
//!
//! # Environment Variables
//!
//! - `CLUBSEARCH_DEBUG=1` - enable debug output
//! - `CLUBSEARCH_LOG_LEVEL=trace|debug|info|warn|error|off`
//! - `CLUBSEARCH_LOG_FORMAT=pretty|compact|json` (default `pretty`)
//! - `CLUBSEARCH_LOG_TIMESTAMPS=1|0`

use once_cell::sync::OnceCell;
use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Levels and formats
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Request-level detail.
    Trace = 0,
    /// Per-operation detail.
    Debug = 1,
    /// Lifecycle events.
    Info = 2,
    /// Recoverable problems.
    Warn = 3,
    /// Failures.
    Error = 4,
    /// Nothing is printed.
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Upper-case name used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output layout of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `2024-05-01 10:00:00.000 INFO  [target] message`
    Pretty,
    /// `10:00:00 I target: message`
    Compact,
    /// One JSON object per line.
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Debug output regardless of level.
    pub debug: bool,
    /// Minimum level printed.
    pub level: Level,
    /// Line layout.
    pub format: Format,
    /// Prefix lines with a timestamp.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Pretty,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Read the configuration from `CLUBSEARCH_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = env_flag("CLUBSEARCH_DEBUG").unwrap_or(defaults.debug);

        let level = env::var("CLUBSEARCH_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("CLUBSEARCH_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(defaults.format);

        let timestamps = env_flag("CLUBSEARCH_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps);

        Self {
            debug,
            level,
            format,
            timestamps,
        }
    }

    /// Set the minimum level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Initialize logging from the environment.
///
/// Called lazily by the first log line; calling it early only fixes the
/// moment the environment is read.
pub fn init() {
    config();
}

/// Initialize logging with an explicit configuration.
///
/// Returns `false` if logging was already initialized, in which case the
/// existing configuration stays in effect.
pub fn init_with(config: LogConfig) -> bool {
    let level = config.level;
    let debug = config.debug;
    let installed = CONFIG.set(config).is_ok();
    if installed {
        set_level(level);
        DEBUG_ENABLED.store(debug, Ordering::SeqCst);
    }
    installed
}

/// The active configuration.
pub fn config() -> &'static LogConfig {
    CONFIG.get_or_init(|| {
        let config = LogConfig::from_env();
        LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
        DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
        config
    })
}

/// Whether debug output is forced on.
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether records at `level` are printed.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    config();
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Current minimum level.
pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Force debug output on or off at runtime.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

// ============================================================================
// Output
// ============================================================================

/// Write one record. Used by the macros.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    let config = config();
    let line = render(level, target, message, config);
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", line);
}

fn render(level: Level, target: &str, message: &str, config: &LogConfig) -> String {
    match config.format {
        Format::Pretty => {
            let mut line = String::new();
            if config.timestamps {
                line.push_str(&chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f ").to_string());
            }
            line.push_str(&format!("{:5} ", level.as_str()));
            if !target.is_empty() {
                line.push_str(&format!("[{}] ", target));
            }
            line.push_str(message);
            line
        }
        Format::Compact => {
            let mut line = String::new();
            if config.timestamps {
                line.push_str(&chrono::Local::now().format("%H:%M:%S ").to_string());
            }
            let initial = level.as_str().chars().next().unwrap_or('?');
            line.push(initial);
            line.push(' ');
            if !target.is_empty() {
                line.push_str(target);
                line.push_str(": ");
            }
            line.push_str(message);
            line
        }
        Format::Json => render_json(level, target, message),
    }
}

#[cfg(feature = "json")]
fn render_json(level: Level, target: &str, message: &str) -> String {
    #[derive(serde::Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };
    serde_json::to_string(&record).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(level: Level, target: &str, message: &str) -> String {
    format!(
        "{} {} [{}] {}",
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        target,
        message
    )
}

// ============================================================================
// Macros
// ============================================================================

/// Log at trace level.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at debug level.
///
/// Printed when `CLUBSEARCH_DEBUG=1` or the level is `debug` or lower.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at info level.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at error level.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, module_path!(), &format!($($arg)+));
        }
    };
}

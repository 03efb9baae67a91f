//! Log level names and subscriber setup.
//!
//! Operators pass syslog-style level names (`NOTICE`, `ERR`, ...). They are
//! mapped onto `tracing` levels and a `tracing-subscriber` fmt subscriber is
//! installed with that maximum level.

use std::fmt;
use std::str::FromStr;

use tracing::Level;

/// Level names accepted on the command line, for usage text.
pub const LOG_LEVEL_NAMES: &str = "EMERG, ALERT, CRT, ERR, WARNING, NOTICE, INFO, DEBUG";

/// Syslog-style log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    #[default]
    Notice,
    Info,
    Debug,
}

impl LogLevel {
    /// The `tracing` level this maps onto.
    pub fn as_tracing(&self) -> Level {
        match self {
            LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical | LogLevel::Error => {
                Level::ERROR
            }
            LogLevel::Warning => Level::WARN,
            LogLevel::Notice | LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Emergency => "EMERG",
            LogLevel::Alert => "ALERT",
            LogLevel::Critical => "CRT",
            LogLevel::Error => "ERR",
            LogLevel::Warning => "WARNING",
            LogLevel::Notice => "NOTICE",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string is not a known log level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLogLevelError(String);

impl fmt::Display for ParseLogLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: {}", self.0)
    }
}

impl std::error::Error for ParseLogLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EMERG" => Ok(LogLevel::Emergency),
            "ALERT" => Ok(LogLevel::Alert),
            "CRT" | "CRIT" => Ok(LogLevel::Critical),
            "ERR" | "ERROR" => Ok(LogLevel::Error),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "NOTICE" => Ok(LogLevel::Notice),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// Install the global fmt subscriber.
///
/// A second call is a no-op; the first subscriber stays in place.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level.as_tracing())
        .with_target(false)
        .try_init();
}

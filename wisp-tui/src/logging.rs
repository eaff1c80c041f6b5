use log::LevelFilter;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Logging configuration for the WISP terminal client.
///
/// Everything goes to a file; the terminal itself belongs to the TUI.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Master switch to enable/disable all logging
    pub enabled: bool,
    /// Path to the log file
    pub log_file: PathBuf,
    /// Whether to clear the log file on startup
    pub clear_on_startup: bool,
    /// Feature flags for specific logging categories
    pub features: LogFeatures,
    /// Overall log level
    pub level: LevelFilter,
}

/// Feature flags for specific logging categories
#[derive(Debug, Clone)]
pub struct LogFeatures {
    /// Log community navigation transitions
    pub navigation: bool,
    /// Log API calls and stale-result discards
    pub api_calls: bool,
    /// Log optimistic apply/rollback events
    pub optimistic: bool,
    /// Log key events
    pub key_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("wisp_debug.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            navigation: true,
            api_calls: true,
            optimistic: true,
            key_events: false,
        }
    }
}

impl LogConfig {
    /// All features on, trace level
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Debug,
            features: LogFeatures {
                navigation: true,
                api_calls: true,
                optimistic: true,
                key_events: true,
            },
            ..Default::default()
        }
    }

    /// Warnings and errors only
    pub fn minimal() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Warn,
            features: LogFeatures {
                navigation: false,
                api_calls: false,
                optimistic: false,
                key_events: false,
            },
            ..Default::default()
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    if config.clear_on_startup {
        let _ = File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!(
        "Logging initialized: file={}, level={:?}",
        config.log_file.display(),
        config.level
    );

    Ok(())
}

/// Macro for logging community navigation transitions
#[macro_export]
macro_rules! log_navigation {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.navigation {
            log::debug!(target: "navigation", $($arg)*);
        }
    };
}

/// Macro for logging API calls
#[macro_export]
macro_rules! log_api_call {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.api_calls {
            log::debug!(target: "api_calls", $($arg)*);
        }
    };
}

/// Macro for logging optimistic apply/rollback events
#[macro_export]
macro_rules! log_optimistic {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.optimistic {
            log::debug!(target: "optimistic", $($arg)*);
        }
    };
}

/// Macro for logging key events
#[macro_export]
macro_rules! log_key_event {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.key_events {
            log::debug!(target: "key_events", $($arg)*);
        }
    };
}

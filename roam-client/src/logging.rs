//! File logging for the client.
//!
//! Store code logs through the category macros below; each category can be
//! switched off independently of the overall level.

use log::LevelFilter;
use simplelog::*;
use std::fs::OpenOptions;
use std::path::PathBuf;

use crate::settings::LoggingSettings;

/// What a log line is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// Outgoing backend calls
    ApiCalls,
    /// Fetch tickets: issued, applied, dropped as stale
    Fetches,
    /// Optimistic changes, confirmations and rollbacks
    Mutations,
    General,
}

impl LogCategory {
    /// Log target the category is written under
    pub fn target(self) -> &'static str {
        match self {
            LogCategory::ApiCalls => "api_calls",
            LogCategory::Fetches => "fetches",
            LogCategory::Mutations => "mutations",
            LogCategory::General => "general",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Master switch; nothing is written when false
    pub enabled: bool,
    pub log_file: PathBuf,
    /// Truncate the file at startup instead of appending
    pub clear_on_startup: bool,
    pub features: LogFeatures,
    pub level: LevelFilter,
}

/// Per-category switches
#[derive(Debug, Clone)]
pub struct LogFeatures {
    pub api_calls: bool,
    pub fetches: bool,
    pub mutations: bool,
    pub general: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("roam_debug.log"),
            clear_on_startup: true,
            features: LogFeatures::all(),
            level: LevelFilter::Debug,
        }
    }
}

impl LogFeatures {
    pub fn all() -> Self {
        Self {
            api_calls: true,
            fetches: true,
            mutations: true,
            general: true,
        }
    }

    fn mutations_only() -> Self {
        Self {
            api_calls: false,
            fetches: false,
            mutations: true,
            general: false,
        }
    }
}

impl LogConfig {
    /// No logging at all; what stores get unless told otherwise
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Warnings plus the trail of optimistic changes and rollbacks, appended
    /// across runs
    pub fn minimal() -> Self {
        Self {
            enabled: true,
            clear_on_startup: false,
            features: LogFeatures::mutations_only(),
            level: LevelFilter::Info,
            ..Default::default()
        }
    }

    /// Every category down to trace level
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            features: LogFeatures::all(),
            level: LevelFilter::Trace,
            ..Default::default()
        }
    }

    /// Build from the `[logging]` section of the settings
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let base = if !settings.enabled {
            Self::disabled()
        } else if settings.verbose {
            Self::verbose()
        } else {
            Self::default()
        };

        Self {
            log_file: PathBuf::from(&settings.file),
            level: settings.level.parse().unwrap_or(base.level),
            ..base
        }
    }

    /// Whether lines of this category are written at all
    pub fn allows(&self, category: LogCategory) -> bool {
        self.enabled
            && match category {
                LogCategory::ApiCalls => self.features.api_calls,
                LogCategory::Fetches => self.features.fetches,
                LogCategory::Mutations => self.features.mutations,
                LogCategory::General => self.features.general,
            }
    }
}

/// Install the global file logger described by `config`
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(!config.clear_on_startup)
        .truncate(config.clear_on_startup)
        .open(&config.log_file)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!(
        "Roam logging to {} at {:?}",
        config.log_file.display(),
        config.level
    );
    log::debug!("Categories: {:?}", config.features);

    Ok(())
}

#[macro_export]
macro_rules! log_api_call {
    ($config:expr, $($arg:tt)*) => {
        if $config.allows($crate::logging::LogCategory::ApiCalls) {
            log::debug!(target: $crate::logging::LogCategory::ApiCalls.target(), $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_fetch {
    ($config:expr, $($arg:tt)*) => {
        if $config.allows($crate::logging::LogCategory::Fetches) {
            log::debug!(target: $crate::logging::LogCategory::Fetches.target(), $($arg)*);
        }
    };
}

/// Mutations log at info so the minimal preset keeps them
#[macro_export]
macro_rules! log_mutation {
    ($config:expr, $($arg:tt)*) => {
        if $config.allows($crate::logging::LogCategory::Mutations) {
            log::info!(target: $crate::logging::LogCategory::Mutations.target(), $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.allows($crate::logging::LogCategory::General) {
            log::debug!(target: $crate::logging::LogCategory::General.target(), $($arg)*);
        }
    };
}

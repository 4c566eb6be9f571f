use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::api::{BackendClient, FixtureBackend, FixtureOptions, HttpBackend};
use crate::fixtures::FixtureSet;
use crate::stores::MissingEntityPolicy;

const CONFIG_FILE_NAME: &str = "roam.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Fixture,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub server_url: String,
    /// Simulated latency for the fixture backend
    pub fixture_latency_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub missing_policy: MissingEntityPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub enabled: bool,
    pub verbose: bool,
    pub file: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub stores: StoreSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from `roam.toml` (working directory, then the platform
    /// config directory) with environment overrides on top
    pub fn new() -> Result<Self, ConfigError> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("roam").join(CONFIG_FILE_NAME));
        }
        Self::load(&candidates)
    }

    /// Load settings from one explicit file with environment overrides on top
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(&[path.as_ref().to_path_buf()])
    }

    fn load(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("backend.kind", "fixture")?
            .set_default("backend.server_url", "http://127.0.0.1:3000/api")?
            .set_default("backend.fixture_latency_ms", 0)?
            .set_default("stores.missing_policy", "ignore")?
            .set_default("logging.enabled", true)?
            .set_default("logging.verbose", false)?
            .set_default("logging.file", "roam_debug.log")?
            .set_default("logging.level", "debug")?;

        // Later files take priority over earlier ones
        for path in candidates.iter().rev() {
            if path.exists() {
                builder = builder.add_source(File::from(path.clone()).required(false));
            }
        }

        // Environment variables have the highest priority
        if let Ok(kind) = std::env::var("ROAM_BACKEND") {
            builder = builder.set_override("backend.kind", kind)?;
        }
        if let Ok(url) = std::env::var("ROAM_SERVER_URL") {
            builder = builder.set_override("backend.server_url", url)?;
        }
        if let Ok(latency) = std::env::var("ROAM_FIXTURE_LATENCY_MS") {
            builder = builder.set_override("backend.fixture_latency_ms", latency)?;
        }
        if let Ok(policy) = std::env::var("ROAM_MISSING_POLICY") {
            builder = builder.set_override("stores.missing_policy", policy)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Construct the backend these settings select
    pub fn build_backend(&self) -> Arc<dyn BackendClient> {
        match self.backend.kind {
            BackendKind::Fixture => Arc::new(FixtureBackend::new(
                FixtureSet::seed(),
                FixtureOptions::with_latency(Duration::from_millis(
                    self.backend.fixture_latency_ms,
                )),
            )),
            BackendKind::Http => Arc::new(HttpBackend::new(self.backend.server_url.clone())),
        }
    }
}

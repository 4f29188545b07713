//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file: explicit path, else `CADENCE_CONFIG_PATH`, else `cadence.toml` if present
//! 3. Environment: `CADENCE_<SECTION>__<KEY>` (e.g. `CADENCE_HOST__FRAME_RATE=30`)
//!
//! A `.env` file in the working directory is loaded before the environment is read.

use anyhow::{bail, Context, Result};
use config::{Config as Layers, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::SuspendPoint;

const ENV_PREFIX: &str = "CADENCE";
const CONFIG_PATH_VAR: &str = "CADENCE_CONFIG_PATH";
const DEFAULT_CONFIG_NAME: &str = "cadence";

/* ===================== Sections ===================== */

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub host: HostConfig,
    pub logging: LoggingConfig,
}

/// Scheduler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Point passed to the creation-time advance of every new execution
    pub initial_point: SuspendPoint,

    /// Registry capacity reserved up front
    pub initial_capacity: usize,

    /// Passes a looped execution may complete within one tick before yielding
    pub max_looped_passes_per_tick: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_point: SuspendPoint::UPDATE,
            initial_capacity: 64,
            max_looped_passes_per_tick: 1024,
        }
    }
}

/// Reference host loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Phases ticked each frame, in order
    pub phases: Vec<SuspendPoint>,

    /// Frames per second
    pub frame_rate: u32,

    /// Accumulation point used by programs the CLI starts
    pub accumulation_point: SuspendPoint,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            phases: vec![
                SuspendPoint::FIXED_UPDATE,
                SuspendPoint::UPDATE,
                SuspendPoint::LATE_UPDATE,
            ],
            frame_rate: 60,
            accumulation_point: SuspendPoint::UPDATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/* ===================== Loading ===================== */

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load from the default sources
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    pub fn validate(&self) -> Result<()> {
        if self.scheduler.max_looped_passes_per_tick == 0 {
            bail!("scheduler.max_looped_passes_per_tick must be at least 1");
        }
        if self.host.frame_rate == 0 {
            bail!("host.frame_rate must be at least 1");
        }
        if self.host.phases.is_empty() {
            bail!("host.phases must name at least one suspension point");
        }
        if !self.host.phases.contains(&self.host.accumulation_point) {
            bail!(
                "host.accumulation_point '{}' is not one of host.phases {:?}",
                self.host.accumulation_point,
                self.host
                    .phases
                    .iter()
                    .map(SuspendPoint::as_str)
                    .collect::<Vec<_>>()
            );
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration as TOML")
    }
}

/// Builder for loading a Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    skip_environment: bool,
}

impl ConfigBuilder {
    /// Use this file instead of the default search
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Ignore `.env` and `CADENCE_*` variables
    pub fn skip_environment(mut self, skip: bool) -> Self {
        self.skip_environment = skip;
        self
    }

    pub fn build(self) -> Result<Config> {
        if !self.skip_environment {
            // Missing .env is fine
            let _ = dotenvy::dotenv();
        }

        let defaults =
            Layers::try_from(&Config::default()).context("Failed to encode default configuration")?;
        let mut layers = Layers::builder().add_source(defaults);

        let explicit_path = self.config_path.or_else(|| {
            if self.skip_environment {
                None
            } else {
                std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from)
            }
        });

        layers = match &explicit_path {
            Some(path) => layers.add_source(File::from(path.as_path()).required(true)),
            None => layers.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        if !self.skip_environment {
            layers = layers.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("host.phases")
                    .try_parsing(true),
            );
        }

        let config: Config = layers
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.validate()?;
        Ok(config)
    }
}

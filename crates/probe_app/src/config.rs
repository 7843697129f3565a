//! Service configuration.
//!
//! Read from a RON file (`page_probe.ron` in the working directory unless
//! `PAGE_PROBE_CONFIG` points elsewhere). A missing file means defaults; the
//! `PORT` environment variable overrides the configured port.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, LogDestination};
use log::LevelFilter;
use probe_engine::{EngineConfig, LoaderSettings};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILENAME: &str = "page_probe.ron";
const CONFIG_PATH_VAR: &str = "PAGE_PROBE_CONFIG";
const PORT_VAR: &str = "PORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_destination: LogTarget,
    pub log_level: LogLevel,
    pub log_file: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub fail_on_http_error: bool,
    /// No bound on a job's runtime when absent.
    pub job_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let loader = LoaderSettings::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_destination: LogTarget::Terminal,
            log_level: LogLevel::Info,
            log_file: PathBuf::from("./page_probe.log"),
            connect_timeout_secs: loader.connect_timeout.as_secs(),
            request_timeout_secs: loader.request_timeout.as_secs(),
            redirect_limit: loader.redirect_limit,
            max_bytes: loader.max_bytes,
            fail_on_http_error: loader.fail_on_http_error,
            job_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Resolves the config file location and environment overrides.
    pub fn from_environment() -> anyhow::Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
        let mut config = Self::load(&path)?;
        if let Ok(port) = std::env::var(PORT_VAR) {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_VAR}={port:?} is not a valid port"))?;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {path:?}"));
            }
        };
        let config =
            ron::from_str(&content).with_context(|| format!("failed to parse config {path:?}"))?;
        engine_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_destination {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }

    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            fail_on_http_error: self.fail_on_http_error,
            ..LoaderSettings::default()
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            job_timeout: self.job_timeout_secs.map(Duration::from_secs),
            ..EngineConfig::default()
        }
    }
}

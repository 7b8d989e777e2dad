use crate::{github::EventType, listeners};
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error")]
    Io(#[from] io::Error),
    #[error("toml parsing error")]
    De(#[from] toml::de::Error),
    #[error("unknown {event} listener `{name}`")]
    UnknownListener { event: EventType, name: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub listeners: ListenersConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on how long all listeners together may take for one delivery
    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,
}

impl ServerConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            dispatch_timeout_secs: default_dispatch_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_dispatch_timeout_secs() -> u64 {
    30
}

/// Listener names to register per event type, run in the order given.
///
/// Keys are the event type names as GitHub sends them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenersConfig {
    #[serde(default = "default_pull_request_listeners")]
    pub pull_request: Vec<String>,
    #[serde(default = "default_push_listeners")]
    pub push: Vec<String>,
}

impl Default for ListenersConfig {
    fn default() -> Self {
        Self {
            pull_request: default_pull_request_listeners(),
            push: default_push_listeners(),
        }
    }
}

fn default_pull_request_listeners() -> Vec<String> {
    vec![listeners::AutomaticPr::NAME.to_owned()]
}

fn default_push_listeners() -> Vec<String> {
    vec![listeners::DcoCheck::NAME.to_owned()]
}

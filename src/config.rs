//! Runtime configuration
//!
//! Read once from environment variables at startup:
//!
//! | Variable           | Default                 |
//! |--------------------|-------------------------|
//! | `FLOOD_SCORER`     | `formula`               |
//! | `FLOOD_MODEL_PATH` | `data/flood_model.json` |
//! | `BIND_ADDR`        | `0.0.0.0`               |
//! | `PORT`             | `3000`                  |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use crate::error::{FloodError, Result};
use crate::prediction::FloodPredictor;
use crate::scorer::{RiskScorer, ScorerKind};

pub const DEFAULT_MODEL_PATH: &str = "data/flood_model.json";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub scorer: ScorerKind,
    pub model_path: PathBuf,
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerKind::Formula,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("FLOOD_SCORER") {
            config.scorer = value.parse()?;
        }
        if let Some(value) = lookup("FLOOD_MODEL_PATH") {
            config.model_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = value
                .parse()
                .map_err(|_| FloodError::Config { key: "BIND_ADDR", value })?;
        }
        if let Some(value) = lookup("PORT") {
            config.port = value
                .parse()
                .map_err(|_| FloodError::Config { key: "PORT", value })?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// One-time initialization of the shared predictor
    pub fn build_predictor(&self) -> Result<FloodPredictor> {
        let scorer = RiskScorer::build(self.scorer, &self.model_path)?;
        Ok(FloodPredictor::new(scorer))
    }
}

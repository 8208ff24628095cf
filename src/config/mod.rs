// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::Settings;
use crate::policies::IrrigationStrategy;
use crate::streaming::StreamingConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Log level
    pub log_level: String,

    /// Enable demo mode (synthesized sensors)
    pub demo_mode: bool,

    /// Control configuration
    pub control: ControlConfig,

    /// Streaming configuration
    pub streaming: StreamingConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "GreenGuard".to_string(),
            log_level: "info".to_string(),
            demo_mode: true,
            control: ControlConfig::default(),
            streaming: StreamingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("greenguard"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Control loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Startup thresholds
    pub settings: Settings,

    /// Irrigation strategy: timed pulse or continuous threshold
    pub irrigation: IrrigationStrategy,

    /// Pulse duration in milliseconds (pulse strategy only)
    pub pulse_ms: u64,

    /// Sensor/policy tick interval in milliseconds
    pub sensor_interval_ms: u64,

    /// Telemetry/display tick interval in milliseconds
    pub telemetry_interval_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            irrigation: IrrigationStrategy::Pulse,
            pulse_ms: 5000,
            sensor_interval_ms: 2000,
            telemetry_interval_ms: 1000,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Enable the console display task
    pub enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

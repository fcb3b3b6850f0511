// Configuration management module
// Handles loading, saving, and validating configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Now-playing file writer settings
    #[serde(default)]
    pub writer: WriterConfig,

    /// Polling display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Master switch for track writes
    pub enabled: bool,

    /// Where the now-playing JSON snapshot is written
    pub output_path: PathBuf,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: default_output_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Base URL of the server exposing /update, /metadata and /album-art
    pub server_url: String,

    /// Delay between refresh cycles in milliseconds
    pub refresh_interval_ms: u64,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Visible width of the title, in terminal columns
    pub title_width: u16,

    /// How long a freshly written field stays highlighted
    pub highlight_ms: u64,

    /// Delay before measuring the title for the marquee
    pub marquee_delay_ms: u64,

    /// Marquee speed: one character per step
    pub marquee_step_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8081".to_string(),
            refresh_interval_ms: 1000,
            request_timeout_ms: 2000,
            title_width: 40,
            highlight_ms: 500,
            marquee_delay_ms: 600,
            marquee_step_ms: 250,
        }
    }
}

impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn marquee_step(&self) -> Duration {
        Duration::from_millis(self.marquee_step_ms)
    }
}

/// Upper bound for every configured delay: one day
const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Default snapshot location, relative to the user's data directory
fn default_output_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("now-playing")
        .join("now_playing.json")
}

impl Config {
    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?;

        Ok(config_dir.join("now-playing").join("now_playing.conf"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(config_path, content)
            .context("Failed to write config file")?;

        log::info!("Config saved to {:?}", config_path);

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.writer.output_path.as_os_str().is_empty() {
            anyhow::bail!("writer.output_path must not be empty");
        }

        if !self.writer.enabled {
            log::warn!("Track writes are disabled; only stop events will reach the file");
        }

        let display = &self.display;

        if display.server_url.trim().is_empty() {
            anyhow::bail!("display.server_url must not be empty");
        }

        if display.refresh_interval_ms == 0 {
            anyhow::bail!("display.refresh_interval_ms must be greater than 0");
        }

        if display.request_timeout_ms == 0 {
            anyhow::bail!("display.request_timeout_ms must be greater than 0");
        }

        if display.title_width == 0 {
            anyhow::bail!("display.title_width must be greater than 0");
        }

        if display.marquee_step_ms == 0 {
            anyhow::bail!("display.marquee_step_ms must be greater than 0");
        }

        for (name, value) in [
            ("refresh_interval_ms", display.refresh_interval_ms),
            ("request_timeout_ms", display.request_timeout_ms),
            ("highlight_ms", display.highlight_ms),
            ("marquee_delay_ms", display.marquee_delay_ms),
            ("marquee_step_ms", display.marquee_step_ms),
        ] {
            if value > MAX_DELAY_MS {
                anyhow::bail!("display.{} must be at most {} ms", name, MAX_DELAY_MS);
            }
        }

        Ok(())
    }
}

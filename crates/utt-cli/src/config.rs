//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use utt_core::LocalTimezone;

/// Label used for the still-running activity unless configured otherwise.
pub const DEFAULT_CURRENT_ACTIVITY_NAME: &str = "-- Current Activity --";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Label for the still-running activity in reports. Empty disables it.
    pub current_activity_name: String,

    /// Fixed UTC offset such as `+02:00`. Unset uses the system timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("utt.db"),
            current_activity_name: DEFAULT_CURRENT_ACTIVITY_NAME.to_string(),
            timezone: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (UTT_*)
        figment = figment.merge(Env::prefixed("UTT_"));

        figment.extract()
    }

    /// The timezone reports and new entries use.
    pub fn zone(&self) -> anyhow::Result<Zone> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("" | "local") => Ok(Zone::Local),
            Some(offset) => offset
                .parse::<FixedOffset>()
                .map(Zone::Fixed)
                .with_context(|| format!("invalid timezone offset: {offset}")),
        }
    }

    /// The current-activity label, or `None` when disabled.
    pub fn current_activity_label(&self) -> Option<&str> {
        Some(self.current_activity_name.as_str()).filter(|label| !label.is_empty())
    }
}

/// The user's timezone: the system zone or a configured fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    /// Re-expresses an instant in this zone.
    pub fn convert(self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => instant.with_timezone(&Local).fixed_offset(),
            Self::Fixed(offset) => instant.with_timezone(&offset),
        }
    }

    /// Human-readable zone name for report output.
    pub fn name(self) -> String {
        match self {
            Self::Local => iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string()),
            Self::Fixed(offset) => offset.to_string(),
        }
    }
}

impl LocalTimezone for Zone {
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        match self {
            Self::Local => Local.localize(naive),
            Self::Fixed(offset) => offset.localize(naive),
        }
    }
}

/// Returns the platform-specific config directory for utt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("utt"))
}

/// Returns the platform-specific data directory for utt.
///
/// On Linux: `~/.local/share/utt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("utt"))
}

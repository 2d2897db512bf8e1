//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub injection: InjectionConfig,

    #[serde(default)]
    pub handshake: HandshakeConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub picker: PickerConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Content agent injection retries.
///
/// After the n-th failed attempt the coordinator waits `n * base_delay_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_injection_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_injection_delay_ms(),
        }
    }
}

impl InjectionConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Activation retries after a fresh injection.
///
/// Before the n-th attempt the coordinator waits
/// `min(n * step_delay_ms, max_delay_ms)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            step_delay_ms: default_step_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_injection_delay_ms() -> u64 {
    500
}

fn default_step_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    1000
}

/// Style aggregation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_colors")]
    pub max_colors: usize,

    #[serde(default = "default_max_fonts")]
    pub max_fonts: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_colors: default_max_colors(),
            max_fonts: default_max_fonts(),
        }
    }
}

fn default_max_colors() -> usize {
    20
}

fn default_max_fonts() -> usize {
    10
}

/// Element picker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Maximum characters of text content carried in a snapshot.
    #[serde(default = "default_text_preview_chars")]
    pub text_preview_chars: usize,

    #[serde(default = "default_cursor")]
    pub cursor: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            text_preview_chars: default_text_preview_chars(),
            cursor: default_cursor(),
        }
    }
}

fn default_text_preview_chars() -> usize {
    100
}

fn default_cursor() -> String {
    "crosshair".to_string()
}

/// Tailwind export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_file_name() -> String {
    "tailwind.config.js".to_string()
}

fn default_key_prefix() -> String {
    "custom".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// Number of daily log files to keep.
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.stylescope/logs".to_string()
}

fn default_max_log_files() -> usize {
    14
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

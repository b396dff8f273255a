// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_VERSION: &str = "1";
const MAX_BAR_WIDTH: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            display: DisplayConfig::default(),
            lexicon: LexiconConfig::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format '{}': expected text or json", val)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub show_bars: bool,
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            show_bars: true,
            bar_width: default_bar_width(),
        }
    }
}

impl DisplayConfig {
    /// Unknown format strings fall back to text
    pub fn output_format(&self) -> OutputFormat {
        self.format.parse().unwrap_or(OutputFormat::Text)
    }

    pub fn effective_bar_width(&self) -> usize {
        self.bar_width.clamp(1, MAX_BAR_WIDTH)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LexiconConfig {
    /// Custom sentiment lexicon; the bundled one is used when unset
    pub path: Option<String>,
}

fn default_version() -> String { CONFIG_VERSION.to_string() }
fn default_format() -> String { "text".to_string() }
fn default_true() -> bool { true }
fn default_bar_width() -> usize { 20 }

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ai-text-detector"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)?;

        Ok(())
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Timestamped names sort oldest first
        entries.sort_by_key(|e| e.file_name());

        // Remove oldest entries
        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    /// Update a single dotted key, e.g. `display.format`
    pub fn set_value(&self, key: &str, value: &str) -> Result<AppConfig, String> {
        let mut config = self.load()?;
        match key {
            "display.format" => {
                let format: OutputFormat = value.parse()?;
                config.display.format = match format {
                    OutputFormat::Text => "text",
                    OutputFormat::Json => "json",
                }
                .to_string();
            }
            "display.showBars" => {
                config.display.show_bars = parse_bool(value)
                    .ok_or_else(|| format!("Invalid boolean '{}'", value))?;
            }
            "display.barWidth" => {
                let width: usize = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid bar width '{}'", value))?;
                if width == 0 || width > MAX_BAR_WIDTH {
                    return Err(format!("Bar width must be between 1 and {}", MAX_BAR_WIDTH));
                }
                config.display.bar_width = width;
            }
            "lexicon.path" => {
                let trimmed = value.trim();
                config.lexicon.path = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
            }
            _ => return Err(format!("Unknown config key '{}'", key)),
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Restore defaults; the previous file is kept as a backup
    pub fn reset(&self) -> Result<AppConfig, String> {
        let config = AppConfig::default();
        self.save(&config)?;
        Ok(config)
    }
}

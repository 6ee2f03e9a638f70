//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub double_click_to_edit: Option<bool>,
    pub show_symbols: Option<bool>,
    pub max_chat_messages: Option<u32>,
    pub sidebar_min_width: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ResponderConfig {
    pub reply_delay_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

/// 0 means no limit, and no progress bar.
pub const DEFAULT_MAX_CHAT_MESSAGES: u32 = 0;
pub const DEFAULT_SIDEBAR_MIN_WIDTH: u16 = 100;
pub const DEFAULT_REPLY_DELAY_MS: u64 = 60;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub double_click_to_edit: bool,
    pub show_symbols: bool,
    pub max_chat_messages: u32,
    pub sidebar_min_width: u16,
    pub reply_delay_ms: u64,
}

/// CLI flags that take part in resolution (None / false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub max_chat_messages: Option<u32>,
    pub no_symbols: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ParleyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ParleyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Parley Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [ui]
# double_click_to_edit = true     # Double-click a conversation title to rename it
# show_symbols = true             # Show the purpose symbol next to each conversation
# max_chat_messages = 40          # Draws a progress bar under each row; 0 disables
# sidebar_min_width = 100         # Narrower terminals show the sidebar as a drawer

# [responder]
# reply_delay_ms = 60             # Delay between streamed words
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ParleyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &ParleyConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Max messages: CLI → env → config → default
    let max_chat_messages = cli
        .max_chat_messages
        .or_else(|| {
            env("PARLEY_MAX_CHAT_MESSAGES")
                .and_then(|v| parse_env("PARLEY_MAX_CHAT_MESSAGES", &v))
        })
        .or(config.ui.max_chat_messages)
        .unwrap_or(DEFAULT_MAX_CHAT_MESSAGES);

    // Double-click to edit: env → config → default
    let double_click_to_edit = env("PARLEY_DOUBLE_CLICK_TO_EDIT")
        .and_then(|v| parse_env("PARLEY_DOUBLE_CLICK_TO_EDIT", &v))
        .or(config.ui.double_click_to_edit)
        .unwrap_or(true);

    // Symbols: --no-symbols wins over config
    let show_symbols = !cli.no_symbols && config.ui.show_symbols.unwrap_or(true);

    ResolvedConfig {
        double_click_to_edit,
        show_symbols,
        max_chat_messages,
        sidebar_min_width: config
            .ui
            .sidebar_min_width
            .unwrap_or(DEFAULT_SIDEBAR_MIN_WIDTH),
        reply_delay_ms: config
            .responder
            .reply_delay_ms
            .unwrap_or(DEFAULT_REPLY_DELAY_MS),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", key, value);
            None
        }
    }
}

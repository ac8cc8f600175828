//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Theme colors stay plain strings here; the TUI layer parses them into
//! terminal colors and passes the result around explicitly.

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
    pub user: UserConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    pub display_name: Option<String>,
    pub status_msg: Option<String>,
}

/// Raw theme colors as written in the config file (names or `#rrggbb`).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ThemeConfig {
    pub background: Option<String>,
    pub line_color: Option<String>,
    pub font_color: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MediaConfig {
    pub library_dir: Option<String>,
    pub capture_command: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DISPLAY_NAME: &str = "me";

// ============================================================================
// Resolved Config (concrete values, no Options except genuinely optional)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub display_name: String,
    pub status_msg: Option<String>,
    pub theme: ThemeConfig,
    pub library_dir: PathBuf,
    /// External command producing an image; `{out}` is replaced with the
    /// output path. No default — camera access stays undetermined without it.
    pub capture_command: Option<String>,
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
fn generate_default_config(path: &PathBuf) {
    let default_content = r##"# Parley Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [user]
# display_name = "me"
# status_msg = "around"

# [theme]
# background = "reset"      # color name or "#rrggbb"
# line_color = "darkgray"
# font_color = "white"
# status = "darkgray"

# [media]
# library_dir = "~/Pictures"           # where the photos picker looks
# capture_command = "fswebcam {out}"   # camera capture; {out} = output path
"##;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env → CLI.
///
/// `cli_library_dir` and `cli_capture_command` come from CLI flags
/// (None = not specified).
pub fn resolve(
    config: &ParleyConfig,
    cli_library_dir: Option<&Path>,
    cli_capture_command: Option<&str>,
) -> ResolvedConfig {
    // Display name: env → config → default
    let display_name = std::env::var("PARLEY_DISPLAY_NAME")
        .ok()
        .or_else(|| config.user.display_name.clone())
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

    // Library dir: CLI → env → config → platform pictures dir → ~/Pictures → cwd
    let library_dir = cli_library_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("PARLEY_LIBRARY_DIR").ok().map(PathBuf::from))
        .or_else(|| config.media.library_dir.as_ref().map(expand_home))
        .or_else(default_library_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // Capture command: CLI → env → config
    let capture_command = cli_capture_command
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PARLEY_CAPTURE_COMMAND").ok())
        .or_else(|| config.media.capture_command.clone());

    ResolvedConfig {
        display_name,
        status_msg: config.user.status_msg.clone(),
        theme: config.theme.clone(),
        library_dir,
        capture_command,
    }
}

/// The platform pictures directory, falling back to `~/Pictures`.
fn default_library_dir() -> Option<PathBuf> {
    dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
}

/// Expand a leading `~/` against the home directory.
fn expand_home(raw: &String) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    }
}

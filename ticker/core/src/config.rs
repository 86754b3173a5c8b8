//! Ticker Configuration
//!
//! [`TickerConfig`] is what a [`Ticker`](crate::Ticker) is built from. Every
//! field is required; the controller applies no defaults of its own.
//!
//! Surfaces usually assemble a `TickerConfig` from layers instead of by hand.
//! Each layer is a [`TickerToml`] with optional fields, and later layers win:
//!
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables (`TICKER_*`)
//! 3. TOML configuration file (`$XDG_CONFIG_HOME/ticker/ticker.toml`)
//! 4. Defaults supplied by the surface
//!
//! A field that no layer supplies is reported as [`ConfigError::MissingField`].
//!
//! # Example Configuration
//!
//! ```toml
//! [ticker]
//! items = ["Breaking news", "Markets up", "Weather: sunny"]
//! container_selector = "#ticker"
//! transition_duration_ms = 2000
//! start_offset_px = 30
//! interaction_mode = "click"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TickerError;

/// Separator for `TICKER_ITEMS`
pub const ITEMS_ENV_SEPARATOR: char = '|';

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// No layer supplied a required field
    #[error("Missing required configuration field: {0}")]
    MissingField(&'static str),

    /// A value could not be interpreted
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field the value was meant for
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The assembled configuration failed validation
    #[error(transparent)]
    Invalid(#[from] TickerError),
}

// =============================================================================
// Interaction Mode
// =============================================================================

/// How the current item gets dismissed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Items hide on a timer
    Auto,
    /// Items stay until the user clicks the viewport
    Click,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Click => write!(f, "click"),
        }
    }
}

impl FromStr for InteractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "click" => Ok(Self::Click),
            _ => Err(ConfigError::InvalidValue {
                field: "interaction_mode",
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Ticker Configuration
// =============================================================================

/// Validated ticker configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Strings to rotate through, in order
    pub items: Vec<String>,

    /// Selector for the host container (`#id` or `.class`)
    pub container_selector: String,

    /// Pause between phases, and the length of each slide
    pub transition_duration_ms: u64,

    /// Offset at which a fresh element waits before being revealed
    pub start_offset_px: i32,

    /// Timer-driven or click-driven dismissal
    pub interaction_mode: InteractionMode,
}

impl TickerConfig {
    /// Build a configuration, failing fast on values the ticker cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::EmptyItems`] or [`TickerError::EmptySelector`].
    pub fn new(
        items: Vec<String>,
        container_selector: impl Into<String>,
        transition_duration_ms: u64,
        start_offset_px: i32,
        interaction_mode: InteractionMode,
    ) -> Result<Self, TickerError> {
        let config = Self {
            items,
            container_selector: container_selector.into(),
            transition_duration_ms,
            start_offset_px,
            interaction_mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the preconditions the ticker relies on
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::EmptyItems`] or [`TickerError::EmptySelector`].
    pub fn validate(&self) -> Result<(), TickerError> {
        if self.items.is_empty() {
            return Err(TickerError::EmptyItems);
        }
        if self.container_selector.trim().is_empty() {
            return Err(TickerError::EmptySelector);
        }
        Ok(())
    }

    /// Phase pause as a [`Duration`]
    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

// =============================================================================
// Configuration Layers
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Built-in fallback supplied by a surface
    Default,
    /// Value from TOML configuration file
    File,
    /// Value from environment variable
    Env,
    /// Value from command-line argument
    Cli,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::File => write!(f, "config file"),
            Self::Env => write!(f, "environment"),
            Self::Cli => write!(f, "CLI"),
        }
    }
}

/// One partial configuration layer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerToml {
    /// Strings to rotate through
    pub items: Option<Vec<String>>,

    /// Container selector
    pub container_selector: Option<String>,

    /// Phase pause in milliseconds
    pub transition_duration_ms: Option<u64>,

    /// Start offset in pixels
    pub start_offset_px: Option<i32>,

    /// Dismissal mode
    pub interaction_mode: Option<InteractionMode>,
}

impl TickerToml {
    /// Whether this layer sets nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrite fields with any that `other` sets
    pub fn overlay(&mut self, other: &TickerToml) {
        if other.items.is_some() {
            self.items = other.items.clone();
        }
        if other.container_selector.is_some() {
            self.container_selector = other.container_selector.clone();
        }
        if other.transition_duration_ms.is_some() {
            self.transition_duration_ms = other.transition_duration_ms;
        }
        if other.start_offset_px.is_some() {
            self.start_offset_px = other.start_offset_px;
        }
        if other.interaction_mode.is_some() {
            self.interaction_mode = other.interaction_mode;
        }
    }

    /// Turn a fully populated layer into a validated [`TickerConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for the first unset field, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn into_config(self) -> Result<TickerConfig, ConfigError> {
        let config = TickerConfig::new(
            self.items.ok_or(ConfigError::MissingField("items"))?,
            self.container_selector
                .ok_or(ConfigError::MissingField("container_selector"))?,
            self.transition_duration_ms
                .ok_or(ConfigError::MissingField("transition_duration_ms"))?,
            self.start_offset_px
                .ok_or(ConfigError::MissingField("start_offset_px"))?,
            self.interaction_mode
                .ok_or(ConfigError::MissingField("interaction_mode"))?,
        )?;
        Ok(config)
    }
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerFileToml {
    /// `[ticker]` section
    pub ticker: TickerToml,
}

/// Command-line overrides (highest priority)
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    layer: TickerToml,
}

impl ConfigOverrides {
    /// Create empty overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the rotation content
    #[must_use]
    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.layer.items = Some(items);
        self
    }

    /// Override the container selector
    #[must_use]
    pub fn with_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.layer.container_selector = Some(selector.into());
        self
    }

    /// Override the phase pause
    #[must_use]
    pub fn with_transition_duration_ms(mut self, ms: u64) -> Self {
        self.layer.transition_duration_ms = Some(ms);
        self
    }

    /// Override the start offset
    #[must_use]
    pub fn with_start_offset_px(mut self, px: i32) -> Self {
        self.layer.start_offset_px = Some(px);
        self
    }

    /// Override the dismissal mode
    #[must_use]
    pub fn with_interaction_mode(mut self, mode: InteractionMode) -> Self {
        self.layer.interaction_mode = Some(mode);
        self
    }

    /// The overrides as a configuration layer
    #[must_use]
    pub fn layer(&self) -> &TickerToml {
        &self.layer
    }
}

/// A resolved configuration and the highest-priority layer that contributed
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// The validated configuration
    pub config: TickerConfig,
    /// Highest-priority source that set at least one field
    pub source: ConfigSource,
    /// Config file that was read, if any
    pub config_file_path: Option<PathBuf>,
}

// =============================================================================
// Loading Functions
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/ticker/ticker.toml` or
/// `~/.config/ticker/ticker.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ticker").join("ticker.toml"))
}

/// Read the `[ticker]` layer from a TOML file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_config_file(path: &Path) -> Result<TickerToml, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: TickerFileToml = toml::from_str(&content)?;
    Ok(file.ticker)
}

/// Build a layer from `TICKER_*` environment variables
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a variable is set but unparseable.
pub fn env_layer() -> Result<TickerToml, ConfigError> {
    env_layer_from(|key| std::env::var(key).ok())
}

/// Build a layer from `TICKER_*` variables resolved through `lookup`
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a variable is set but unparseable.
pub fn env_layer_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TickerToml, ConfigError> {
    let mut layer = TickerToml::default();

    if let Some(items) = lookup("TICKER_ITEMS") {
        layer.items = Some(
            items
                .split(ITEMS_ENV_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        );
    }
    if let Some(selector) = lookup("TICKER_SELECTOR") {
        layer.container_selector = Some(selector);
    }
    if let Some(ms) = lookup("TICKER_DURATION_MS") {
        layer.transition_duration_ms = Some(ms.trim().parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "transition_duration_ms",
                value: ms.clone(),
            }
        })?);
    }
    if let Some(px) = lookup("TICKER_OFFSET_PX") {
        layer.start_offset_px = Some(px.trim().parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "start_offset_px",
                value: px.clone(),
            }
        })?);
    }
    if let Some(mode) = lookup("TICKER_MODE") {
        layer.interaction_mode = Some(mode.parse()?);
    }

    Ok(layer)
}

/// Merge layers (later wins) into a validated configuration
///
/// # Errors
///
/// Returns an error if a required field is missing or invalid.
pub fn resolve_config(
    layers: &[(ConfigSource, TickerToml)],
) -> Result<(TickerConfig, ConfigSource), ConfigError> {
    let mut merged = TickerToml::default();
    let mut source = ConfigSource::Default;

    for (layer_source, layer) in layers {
        if !layer.is_empty() {
            merged.overlay(layer);
            source = source.max(*layer_source);
        }
    }

    Ok((merged.into_config()?, source))
}

/// Load configuration from a specific path, the environment and `overrides`
///
/// A missing file is not an error; its layer is simply empty.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the merged
/// layers do not form a valid configuration.
pub fn load_config_from_path(
    path: Option<PathBuf>,
    defaults: &TickerToml,
    overrides: &ConfigOverrides,
) -> Result<LoadedConfig, ConfigError> {
    load_layers(path, defaults, env_layer()?, overrides)
}

fn load_layers(
    path: Option<PathBuf>,
    defaults: &TickerToml,
    env: TickerToml,
    overrides: &ConfigOverrides,
) -> Result<LoadedConfig, ConfigError> {
    let mut layers = Vec::with_capacity(4);
    let mut config_file_path = None;

    layers.push((ConfigSource::Default, defaults.clone()));

    if let Some(config_path) = path {
        if config_path.exists() {
            layers.push((ConfigSource::File, read_config_file(&config_path)?));
            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
            config_file_path = Some(config_path);
        } else {
            tracing::debug!(path = %config_path.display(), "Config file not found");
        }
    }

    layers.push((ConfigSource::Env, env));
    layers.push((ConfigSource::Cli, overrides.layer().clone()));

    let (config, source) = resolve_config(&layers)?;
    Ok(LoadedConfig {
        config,
        source,
        config_file_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn full_layer() -> TickerToml {
        TickerToml {
            items: Some(vec!["one".into(), "two".into()]),
            container_selector: Some("#ticker".into()),
            transition_duration_ms: Some(1500),
            start_offset_px: Some(24),
            interaction_mode: Some(InteractionMode::Auto),
        }
    }

    #[test]
    fn test_config_rejects_empty_items() {
        let result = TickerConfig::new(vec![], "#ticker", 100, 10, InteractionMode::Auto);
        assert_eq!(result.unwrap_err(), TickerError::EmptyItems);
    }

    #[test]
    fn test_config_rejects_blank_selector() {
        let result = TickerConfig::new(vec!["a".into()], "  ", 100, 10, InteractionMode::Auto);
        assert_eq!(result.unwrap_err(), TickerError::EmptySelector);
    }

    #[test]
    fn test_transition_duration() {
        let config =
            TickerConfig::new(vec!["a".into()], "#t", 250, 10, InteractionMode::Click).unwrap();
        assert_eq!(config.transition_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_interaction_mode_parse() {
        assert_eq!("auto".parse::<InteractionMode>().unwrap(), InteractionMode::Auto);
        assert_eq!(" Click ".parse::<InteractionMode>().unwrap(), InteractionMode::Click);
        assert!(matches!(
            "hover".parse::<InteractionMode>(),
            Err(ConfigError::InvalidValue { field: "interaction_mode", .. })
        ));
        assert_eq!(InteractionMode::Click.to_string(), "click");
    }

    #[test]
    fn test_overlay_later_layer_wins() {
        let mut base = full_layer();
        let top = TickerToml {
            transition_duration_ms: Some(10),
            interaction_mode: Some(InteractionMode::Click),
            ..TickerToml::default()
        };

        base.overlay(&top);

        assert_eq!(base.transition_duration_ms, Some(10));
        assert_eq!(base.interaction_mode, Some(InteractionMode::Click));
        assert_eq!(base.start_offset_px, Some(24));
        assert_eq!(base.container_selector.as_deref(), Some("#ticker"));
    }

    #[test]
    fn test_into_config_reports_missing_field() {
        let layer = TickerToml {
            start_offset_px: None,
            ..full_layer()
        };
        assert!(matches!(
            layer.into_config(),
            Err(ConfigError::MissingField("start_offset_px"))
        ));
    }

    #[test]
    fn test_into_config_validates() {
        let layer = TickerToml {
            items: Some(vec![]),
            ..full_layer()
        };
        assert!(matches!(
            layer.into_config(),
            Err(ConfigError::Invalid(TickerError::EmptyItems))
        ));
    }

    #[test]
    fn test_resolve_tracks_highest_source() {
        let layers = vec![
            (ConfigSource::Default, full_layer()),
            (ConfigSource::File, TickerToml::default()),
            (
                ConfigSource::Cli,
                ConfigOverrides::new()
                    .with_start_offset_px(-5)
                    .layer()
                    .clone(),
            ),
        ];

        let (config, source) = resolve_config(&layers).unwrap();

        assert_eq!(config.start_offset_px, -5);
        assert_eq!(source, ConfigSource::Cli);
    }

    #[test]
    fn test_parse_file_section() {
        let toml_content = r##"
[ticker]
items = ["Breaking news", "Markets up"]
container_selector = "#ticker"
transition_duration_ms = 2000
start_offset_px = 30
interaction_mode = "click"
"##;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let layer = read_config_file(file.path()).unwrap();
        let config = layer.into_config().unwrap();

        assert_eq!(config.items, vec!["Breaking news", "Markets up"]);
        assert_eq!(config.container_selector, "#ticker");
        assert_eq!(config.transition_duration_ms, 2000);
        assert_eq!(config.start_offset_px, 30);
        assert_eq!(config.interaction_mode, InteractionMode::Click);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[ticker\nitems = ").unwrap();

        assert!(matches!(
            read_config_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_config_file(Path::new("/nonexistent/ticker/ticker.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_env_layer_parses_all_variables() {
        let layer = env_layer_from(env(&[
            ("TICKER_ITEMS", " one | two||three | "),
            ("TICKER_SELECTOR", ".news"),
            ("TICKER_DURATION_MS", " 750 "),
            ("TICKER_OFFSET_PX", "-12"),
            ("TICKER_MODE", "Click"),
        ]))
        .unwrap();

        assert_eq!(
            layer,
            TickerToml {
                items: Some(vec!["one".into(), "two".into(), "three".into()]),
                container_selector: Some(".news".into()),
                transition_duration_ms: Some(750),
                start_offset_px: Some(-12),
                interaction_mode: Some(InteractionMode::Click),
            }
        );
    }

    #[test]
    fn test_env_layer_empty_when_unset() {
        let layer = env_layer_from(env(&[])).unwrap();
        assert!(layer.is_empty());
    }

    #[test]
    fn test_env_layer_rejects_bad_numbers() {
        assert!(matches!(
            env_layer_from(env(&[("TICKER_DURATION_MS", "soon")])),
            Err(ConfigError::InvalidValue { field: "transition_duration_ms", .. })
        ));
        assert!(matches!(
            env_layer_from(env(&[("TICKER_OFFSET_PX", "1.5")])),
            Err(ConfigError::InvalidValue { field: "start_offset_px", .. })
        ));
        assert!(matches!(
            env_layer_from(env(&[("TICKER_MODE", "hover")])),
            Err(ConfigError::InvalidValue { field: "interaction_mode", .. })
        ));
    }

    #[test]
    fn test_load_layers_priority() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[ticker]\ntransition_duration_ms = 900\nstart_offset_px = 40\n")
            .unwrap();
        let from_env = env_layer_from(env(&[("TICKER_OFFSET_PX", "50")])).unwrap();
        let overrides = ConfigOverrides::new().with_interaction_mode(InteractionMode::Click);

        let loaded =
            load_layers(Some(file.path().to_path_buf()), &full_layer(), from_env, &overrides)
                .unwrap();

        assert_eq!(loaded.config.items, vec!["one", "two"]);
        assert_eq!(loaded.config.transition_duration_ms, 900);
        assert_eq!(loaded.config.start_offset_px, 50);
        assert_eq!(loaded.config.interaction_mode, InteractionMode::Click);
        assert_eq!(loaded.source, ConfigSource::Cli);
        assert_eq!(loaded.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_layers_missing_file_uses_defaults() {
        let loaded = load_layers(
            Some(PathBuf::from("/nonexistent/ticker/ticker.toml")),
            &full_layer(),
            TickerToml::default(),
            &ConfigOverrides::new(),
        )
        .unwrap();

        assert_eq!(loaded.source, ConfigSource::Default);
        assert_eq!(loaded.config_file_path, None);
        assert_eq!(loaded.config.start_offset_px, 24);
    }

    #[test]
    fn test_load_layers_without_defaults_reports_missing_field() {
        let result = load_layers(
            None,
            &TickerToml::default(),
            TickerToml::default(),
            &ConfigOverrides::new().with_items(vec!["a".into()]),
        );

        assert!(matches!(
            result,
            Err(ConfigError::MissingField("container_selector"))
        ));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("ticker"));
            assert!(p.to_string_lossy().ends_with("ticker.toml"));
        }
    }
}

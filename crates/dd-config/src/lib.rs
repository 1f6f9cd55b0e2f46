//! Configuration management for deckdown.
//!
//! Parses `deckdown.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Path Expansion
//!
//! `build.template` and `build.output` support `~` and environment variable
//! expansion (`${VAR}`, `${VAR:-default}`) before being resolved against the
//! config file's directory.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the output document path.
    pub output: Option<PathBuf>,
    /// Override the slide template path.
    pub template: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "deckdown.toml";

/// Template filename picked up next to the config when none is configured.
const DEFAULT_TEMPLATE: &str = "reference.toml";

/// Output filename used when none is configured.
const DEFAULT_OUTPUT: &str = "out.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build paths (relative strings from TOML).
    build: BuildConfigRaw,
    /// Layout names for heading-opened slides.
    pub layouts: LayoutsConfig,
    /// Fonts for code and quotes.
    pub fonts: FontsConfig,
    /// Rendering behavior.
    pub render: RenderConfig,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    template: Option<String>,
    output: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Slide template. `None` selects the built-in template.
    pub template: Option<PathBuf>,
    /// Output document.
    pub output: PathBuf,
}

/// Layout names used for slides opened by headings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutsConfig {
    /// Layout for level-1 headings.
    pub section_header: String,
    /// Layout for level-2 headings.
    pub title_and_content: String,
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            section_header: "Section Header".to_owned(),
            title_and_content: "Title and Content".to_owned(),
        }
    }
}

/// Font names.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Font of code spans and code blocks.
    pub code: String,
    /// Font of block quotes.
    pub quote: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            code: "Courier".to_owned(),
            quote: "Comic Sans MS".to_owned(),
        }
    }
}

/// Rendering behavior.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Create slides directly with the layout named by a `slide` directive
    /// instead of replacing them when the directive is reached.
    pub hoist_slide_directives: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.output`").
        field: String,
        /// Error message (e.g., "${`DECKS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `deckdown.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output) = &settings.output {
            self.build_resolved.output.clone_from(output);
        }
        if let Some(template) = &settings.template {
            self.build_resolved.template = Some(template.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            build: BuildConfigRaw::default(),
            layouts: LayoutsConfig::default(),
            fonts: FontsConfig::default(),
            render: RenderConfig::default(),
            build_resolved: BuildConfig {
                template: default_template(base),
                output: base.join(DEFAULT_OUTPUT),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that layout and font names are set.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.layouts.section_header, "layouts.section_header")?;
        require_non_empty(&self.layouts.title_and_content, "layouts.title_and_content")?;
        require_non_empty(&self.fonts.code, "fonts.code")?;
        require_non_empty(&self.fonts.quote, "fonts.quote")?;
        Ok(())
    }

    /// Expand and resolve build paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let template = match &self.build.template {
            Some(template) => Some(config_dir.join(expand::expand_path(template, "build.template")?)),
            None => default_template(config_dir),
        };
        let output = match &self.build.output {
            Some(output) => config_dir.join(expand::expand_path(output, "build.output")?),
            None => config_dir.join(DEFAULT_OUTPUT),
        };

        self.build_resolved = BuildConfig { template, output };
        Ok(())
    }
}

/// `reference.toml` in `dir`, if it exists.
fn default_template(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(DEFAULT_TEMPLATE);
    candidate.exists().then_some(candidate)
}

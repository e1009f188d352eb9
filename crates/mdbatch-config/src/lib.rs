//! Configuration management for mdbatch.
//!
//! Parses `mdbatch.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [extensions]
//! tables = true
//! footnotes = true
//! math = true
//!
//! [highlight]
//! theme = "solarized.dark"
//! style = "classed"
//!
//! [output]
//! dir = "${MDBATCH_OUT:-site}"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `highlight.theme`
//! - `output.dir`

mod expand;

use mdbatch::{ClientSideMath, Extensions, Options};
use mdbatch_themes::{HighlightStyle, SyntectHighlighter, THEMES};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdbatch.toml";

/// Theme used when `[highlight]` is present without a `theme`.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Extensions switched on from the command line. Flags only ever enable.
    pub extensions: Extensions,
    /// Override highlight theme. Enables highlighting when the config has
    /// no `[highlight]` section.
    pub theme: Option<String>,
    /// Override highlight style.
    pub style: Option<CodeStyle>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

macro_rules! extension_config {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        /// `[extensions]` section: one boolean per syntax extension.
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        #[allow(clippy::struct_excessive_bools)]
        pub struct ExtensionsConfig {
            $( $(#[$meta])* pub $name: bool, )*
        }

        impl ExtensionsConfig {
            /// Switch on every extension enabled in `other`.
            pub fn enable(&mut self, other: &Extensions) {
                $( self.$name |= other.$name; )*
            }
        }

        impl From<ExtensionsConfig> for Extensions {
            fn from(config: ExtensionsConfig) -> Self {
                Self {
                    $( $name: config.$name, )*
                }
            }
        }
    };
}

extension_config! {
    tables,
    footnotes,
    strikethrough,
    tasklists,
    smart_punctuation,
    heading_attributes,
    yaml_style_metadata_blocks,
    pluses_delimited_metadata_blocks,
    old_footnotes,
    gfm,
    definition_list,
    superscript,
    subscript,
    wikilinks,
    /// Math spans, rendered as client-side math markup.
    math,
}

/// How highlighted code is styled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStyle {
    /// Inline `style` attributes.
    #[default]
    Inline,
    /// CSS classes; pair with the output of `mdbatch css`.
    Classed,
}

impl From<CodeStyle> for HighlightStyle {
    fn from(style: CodeStyle) -> Self {
        match style {
            CodeStyle::Inline => HighlightStyle::Inline,
            CodeStyle::Classed => HighlightStyle::Classed,
        }
    }
}

/// `[highlight]` section. When absent, code blocks get the default
/// unhighlighted rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Theme name, one of `mdbatch_themes::THEMES`.
    pub theme: String,
    /// Styling mode.
    pub style: CodeStyle,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            style: CodeStyle::default(),
        }
    }
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Syntax extensions.
    pub extensions: ExtensionsConfig,
    /// Syntax highlighting (optional section).
    pub highlight: Option<HighlightConfig>,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,

    /// Resolved output directory (set after loading). `None` writes to stdout.
    #[serde(skip)]
    pub output_dir: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
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
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message.
        message: String,
    },
    /// Building render options failed.
    #[error(transparent)]
    Render(#[from] mdbatch::Error),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdbatch.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_from(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Search for config file in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        self.extensions.enable(&settings.extensions);
        if let Some(theme) = &settings.theme {
            self.highlight
                .get_or_insert_with(HighlightConfig::default)
                .theme
                .clone_from(theme);
        }
        if let Some(style) = settings.style {
            self.highlight
                .get_or_insert_with(HighlightConfig::default)
                .style = style;
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_extensions()?;
        self.validate_highlight()?;
        Ok(())
    }

    fn validate_extensions(&self) -> Result<(), ConfigError> {
        if self.extensions.yaml_style_metadata_blocks
            && self.extensions.pluses_delimited_metadata_blocks
        {
            return Err(ConfigError::Validation(
                "extensions.yaml_style_metadata_blocks and \
                 extensions.pluses_delimited_metadata_blocks cannot both be enabled"
                    .to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_highlight(&self) -> Result<(), ConfigError> {
        let Some(highlight) = &self.highlight else {
            return Ok(());
        };
        if highlight.theme.is_empty() {
            return Err(ConfigError::Validation(
                "highlight.theme cannot be empty".to_owned(),
            ));
        }
        if !THEMES.contains(&highlight.theme.as_str()) {
            return Err(ConfigError::Validation(format!(
                "highlight.theme `{}` is not a known theme (available: {})",
                highlight.theme,
                THEMES.join(", ")
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut highlight) = self.highlight {
            highlight.theme = expand::expand_env(&highlight.theme, "highlight.theme")?;
        }
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_dir = self.output.dir.as_deref().map(|dir| config_dir.join(dir));
    }

    /// Build render options for this configuration.
    ///
    /// `[extensions] math` installs [`ClientSideMath`]; a `[highlight]`
    /// section installs a [`SyntectHighlighter`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Render` if the highlighter cannot be built.
    pub fn to_options(&self) -> Result<Options, ConfigError> {
        let mut builder = Options::builder().extensions(self.extensions.into());
        if self.extensions.math {
            builder = builder.math(ClientSideMath);
        }
        if let Some(highlight) = &self.highlight {
            let highlighter =
                SyntectHighlighter::with_style(&highlight.theme, highlight.style.into())?;
            builder = builder.code(highlighter);
        }
        Ok(builder.build())
    }
}

//! Configuration management for Cosmos HTML.
//!
//! Parses `cosmos.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `site.stylesheet` supports `${VAR}` and `${VAR:-default}`. An unset
//! variable without a default is an error.

mod expand;

use std::path::{Component, Path, PathBuf};

use cosmos_hiera::{
    DEFAULT_DATA_PATH, DEFAULT_FILE_NAMES, DEFAULT_GLOBAL_DIR, DEFAULT_PUPPET_DIR, HieraSettings,
    MergeStrategy,
};
use cosmos_renderer::{DEFAULT_DEPTH_THRESHOLD, HeadingOverflow, MIN_DEPTH_THRESHOLD, TreeRenderer};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the stylesheet copied into the output.
    pub stylesheet: Option<PathBuf>,
    /// Override the Hiera merge strategy.
    pub merge_strategy: Option<MergeStrategy>,
    /// Override parallel page generation.
    pub parallel: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cosmos.toml";

/// Stylesheet used when none is configured.
const DEFAULT_STYLESHEET: &str = "vanilla.css";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project layout.
    pub project: ProjectConfig,
    hiera: HieraConfigRaw,
    /// Rendering options.
    pub render: RenderConfig,
    site: SiteConfigRaw,

    /// Resolved Hiera settings (set after loading).
    #[serde(skip)]
    pub hiera_resolved: HieraSettings,
    /// Resolved site settings (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Project layout, relative to the project root.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory holding site-wide Hiera data.
    pub global_dir: String,
    /// Directory holding the Puppet rules, loaded without a data path.
    pub puppet_dir: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            global_dir: DEFAULT_GLOBAL_DIR.to_owned(),
            puppet_dir: DEFAULT_PUPPET_DIR.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct HieraConfigRaw {
    data_path: Option<String>,
    files: Option<Vec<String>>,
    merge_strategy: Option<MergeStrategy>,
}

/// Rendering options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Mapping depth at which pages switch from one table to sections.
    pub depth_threshold: usize,
    pub heading_overflow: HeadingOverflow,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            depth_threshold: DEFAULT_DEPTH_THRESHOLD,
            heading_overflow: HeadingOverflow::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    stylesheet: Option<String>,
    parallel: Option<bool>,
}

/// Resolved site generation settings.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Stylesheet copied into the output root.
    pub stylesheet: PathBuf,
    /// Whether directory pages are generated in parallel.
    pub parallel: bool,
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
        /// Config field path (e.g., "`site.stylesheet`").
        field: String,
        /// Error message (e.g., "${`THEME_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cosmos.toml` in current directory and parents.
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
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Renderer configured from the `[render]` section.
    #[must_use]
    pub fn tree_renderer(&self) -> TreeRenderer {
        TreeRenderer::new()
            .with_depth_threshold(self.render.depth_threshold)
            .with_heading_overflow(self.render.heading_overflow)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(stylesheet) = &settings.stylesheet {
            self.site_resolved.stylesheet.clone_from(stylesheet);
        }
        if let Some(strategy) = settings.merge_strategy {
            self.hiera_resolved.merge_strategy = strategy;
        }
        if let Some(parallel) = settings.parallel {
            self.site_resolved.parallel = parallel;
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
            project: ProjectConfig::default(),
            hiera: HieraConfigRaw::default(),
            render: RenderConfig::default(),
            site: SiteConfigRaw::default(),
            hiera_resolved: HieraSettings::default(),
            site_resolved: SiteConfig {
                stylesheet: base.join(DEFAULT_STYLESHEET),
                parallel: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_project()?;
        self.validate_hiera()?;
        self.validate_render()?;
        Ok(())
    }

    fn validate_project(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.project.global_dir, "project.global_dir")?;
        require_non_empty(&self.project.puppet_dir, "project.puppet_dir")?;

        // Also used as the name of the global page directory in the site.
        let mut components = Path::new(&self.project.global_dir).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(ConfigError::Validation(format!(
                "project.global_dir must be a single directory name, got '{}'",
                self.project.global_dir
            )));
        }
        Ok(())
    }

    fn validate_hiera(&self) -> Result<(), ConfigError> {
        if self.hiera_resolved.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "hiera.data_path cannot be empty".to_owned(),
            ));
        }
        if self.hiera_resolved.file_names.is_empty() {
            return Err(ConfigError::Validation(
                "hiera.files must list at least one file".to_owned(),
            ));
        }
        for name in &self.hiera_resolved.file_names {
            require_non_empty(name, "hiera.files")?;
        }
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        if self.render.depth_threshold < MIN_DEPTH_THRESHOLD {
            return Err(ConfigError::Validation(format!(
                "render.depth_threshold must be at least {MIN_DEPTH_THRESHOLD}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref stylesheet) = self.site.stylesheet {
            self.site.stylesheet = Some(expand::expand_env(stylesheet, "site.stylesheet")?);
        }
        Ok(())
    }

    /// Resolve raw sections against the config directory.
    ///
    /// Only the stylesheet is relative to the config file; the Hiera data
    /// path is relative to each project directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let stylesheet = self.site.stylesheet.as_deref().unwrap_or(DEFAULT_STYLESHEET);
        require_non_empty(stylesheet, "site.stylesheet")?;

        self.site_resolved = SiteConfig {
            stylesheet: config_dir.join(stylesheet),
            parallel: self.site.parallel.unwrap_or(false),
        };

        self.hiera_resolved = HieraSettings {
            data_path: PathBuf::from(self.hiera.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH)),
            file_names: self.hiera.files.clone().unwrap_or_else(|| {
                DEFAULT_FILE_NAMES.iter().map(|&n| n.to_owned()).collect()
            }),
            merge_strategy: self.hiera.merge_strategy.unwrap_or_default(),
        };

        Ok(())
    }
}

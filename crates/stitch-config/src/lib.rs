//! Configuration management for stitch.
//!
//! Parses `stitch.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. CLI settings can
//! be applied during load via [`CliSettings`].
//!
//! The YAML documents read by the navigation builder live here too:
//! [`DocsetFile`]/[`TocFile`] for one documentation set and
//! [`NavigationFile`] for the cross-repository manifest.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `assembler.site_prefix`
//! - `assembler.environment_prefix`
//! - `codex.site_prefix`

mod docset;
mod expand;
mod navigation;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use docset::{DocsetFile, Hidden, TocFile, TocItem};
pub use navigation::{NavigationFile, PhantomReference, TocReference};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override documentation source directory.
    pub source_dir: Option<PathBuf>,
    /// Override strict mode.
    pub strict: Option<bool>,
    /// Override the assembled site prefix.
    pub site_prefix: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "stitch.toml";

/// Repository whose root level files are injected into the assembled site.
pub const DEFAULT_NARRATIVE_REPOSITORY: &str = "docs-content";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Isolated build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Assembler configuration (paths are relative strings from TOML).
    assembler: AssemblerConfigRaw,
    /// Codex portal configuration.
    pub codex: CodexConfig,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Resolved assembler configuration (set after loading).
    #[serde(skip)]
    pub assembler_resolved: AssemblerConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    strict: Option<bool>,
}

/// Resolved isolated build configuration.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory containing `docset.yml` and markdown sources.
    pub source_dir: PathBuf,
    /// Promote warnings to errors.
    pub strict: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AssemblerConfigRaw {
    navigation_file: Option<String>,
    checkouts_dir: Option<String>,
    links_dir: Option<String>,
    narrative_repository: Option<String>,
    site_prefix: Option<String>,
    environment_prefix: Option<String>,
    repositories: Vec<String>,
}

/// Resolved assembler configuration with absolute paths.
#[derive(Debug, Default)]
pub struct AssemblerConfig {
    /// Cross-repository navigation manifest.
    pub navigation_file: PathBuf,
    /// Directory holding one checkout per repository.
    pub checkouts_dir: PathBuf,
    /// Directory holding `{repo}/links.json` registries.
    pub links_dir: PathBuf,
    /// Repository whose root files are force-injected at the site root.
    pub narrative_repository: String,
    /// Prefix of every assembled URL (e.g. `/docs`).
    pub site_prefix: Option<String>,
    /// Publish environment prefix applied by the URI resolver.
    pub environment_prefix: Option<String>,
    /// Reference repositories to assemble, besides the narrative one.
    pub repositories: Vec<String>,
}

impl AssemblerConfig {
    /// Every repository to assemble, narrative repository first.
    #[must_use]
    pub fn all_repositories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(&self.narrative_repository)
            .chain(&self.repositories)
            .filter(|r| seen.insert(r.as_str()))
            .cloned()
            .collect()
    }

    /// Checkout directory of one repository's documentation sources.
    #[must_use]
    pub fn source_dir_for(&self, repository: &str) -> PathBuf {
        self.checkouts_dir.join(repository).join("docs")
    }

    /// Published link registry of one repository.
    #[must_use]
    pub fn links_file_for(&self, repository: &str) -> PathBuf {
        self.links_dir.join(repository).join("links.json")
    }
}

/// Codex portal configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodexConfig {
    /// Title of the codex landing page.
    pub title: String,
    /// Prefix of every codex URL (e.g. `/docs`).
    pub site_prefix: Option<String>,
    /// Documentation sets shown in the codex.
    pub sets: Vec<CodexSetConfig>,
    /// Group metadata, keyed by id.
    pub groups: Vec<CodexGroupConfig>,
}

impl Default for CodexConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            site_prefix: None,
            sets: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl CodexConfig {
    /// Look up group metadata.
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&CodexGroupConfig> {
        self.groups.iter().find(|g| g.id == id)
    }
}

/// One documentation set in the codex.
#[derive(Debug, Clone, Deserialize)]
pub struct CodexSetConfig {
    /// Repository name; also the URL segment under `/r/`.
    pub name: String,
    /// Optional group id; grouped sets live under `/g/{group}`.
    #[serde(default)]
    pub group: Option<String>,
    /// Overrides the set's navigation title.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Group metadata for the codex.
#[derive(Debug, Clone, Deserialize)]
pub struct CodexGroupConfig {
    /// Group id as referenced by `sets[].group`.
    pub id: String,
    /// Display title.
    pub title: String,
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
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`assembler.site_prefix`").
        field: String,
        /// Error message (e.g., "${`DOCS_PREFIX`} not set").
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

/// Require a list of names to be unique.
fn require_unique<'a>(
    values: impl IntoIterator<Item = &'a str>,
    field: &str,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for value in values {
        require_non_empty(value, field)?;
        if !seen.insert(value) {
            return Err(ConfigError::Validation(format!(
                "{field} contains duplicate entry '{value}'"
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `stitch.toml` in current directory and parents.
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

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.build_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(strict) = settings.strict {
            self.build_resolved.strict = strict;
        }
        if let Some(site_prefix) = &settings.site_prefix {
            self.assembler_resolved.site_prefix = Some(site_prefix.clone());
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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            build: BuildConfigRaw::default(),
            assembler: AssemblerConfigRaw::default(),
            codex: CodexConfig::default(),
            build_resolved: BuildConfig::default(),
            assembler_resolved: AssemblerConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(
            &self.assembler_resolved.narrative_repository,
            "assembler.narrative_repository",
        )?;
        require_unique(
            self.assembler_resolved.repositories.iter().map(String::as_str),
            "assembler.repositories",
        )?;
        self.validate_codex()
    }

    fn validate_codex(&self) -> Result<(), ConfigError> {
        require_unique(
            self.codex.sets.iter().map(|s| s.name.as_str()),
            "codex.sets",
        )?;
        require_unique(
            self.codex.groups.iter().map(|g| g.id.as_str()),
            "codex.groups",
        )?;
        for set in &self.codex.sets {
            if let Some(group) = &set.group {
                require_non_empty(group, "codex.sets.group")?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.assembler.site_prefix =
            expand::expand_env_opt(self.assembler.site_prefix.as_ref(), "assembler.site_prefix")?;
        self.assembler.environment_prefix = expand::expand_env_opt(
            self.assembler.environment_prefix.as_ref(),
            "assembler.environment_prefix",
        )?;
        self.codex.site_prefix =
            expand::expand_env_opt(self.codex.site_prefix.as_ref(), "codex.site_prefix")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            source_dir: resolve(self.build.source_dir.as_deref(), "docs"),
            strict: self.build.strict.unwrap_or(false),
        };

        let assembler = &self.assembler;
        self.assembler_resolved = AssemblerConfig {
            navigation_file: resolve(assembler.navigation_file.as_deref(), "navigation.yml"),
            checkouts_dir: resolve(assembler.checkouts_dir.as_deref(), ".artifacts/checkouts"),
            links_dir: resolve(assembler.links_dir.as_deref(), ".artifacts/links"),
            narrative_repository: assembler
                .narrative_repository
                .clone()
                .unwrap_or_else(|| DEFAULT_NARRATIVE_REPOSITORY.to_owned()),
            site_prefix: assembler.site_prefix.clone(),
            environment_prefix: assembler.environment_prefix.clone(),
            repositories: assembler.repositories.clone(),
        };
    }
}

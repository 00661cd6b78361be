//! Hiera data loading.
//!
//! Each project directory may hold Hiera YAML under a fixed data path. Only
//! files whose names appear in an allow-list are read; everything else in the
//! data directory is ignored.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cosmos_tree::{Mapping, Scalar, Value, parse_yaml};

use crate::error::HieraError;
use crate::merge::merge_into;

/// Default data path below each project directory.
pub const DEFAULT_DATA_PATH: &str = "overlay/etc/hiera/data";

/// Directory holding the Puppet rules, relative to the project root.
pub const DEFAULT_PUPPET_DIR: &str = "global/overlay/etc/puppet";

/// Recognized Hiera filenames, lowest precedence first.
pub const DEFAULT_FILE_NAMES: [&str; 4] =
    ["common.yaml", "group.yaml", "local.yaml", "cosmos-rules.yaml"];

/// How multiple recognized files in one data directory are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergeStrategy {
    /// Files are read in directory enumeration order and each one replaces
    /// the result wholesale. Only the last file read survives, and which one
    /// that is depends on the filesystem.
    #[default]
    Replace,
    /// Files are applied in allow-list order and deep merged key by key, so
    /// later files in the list override earlier ones.
    Layered,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => f.write_str("replace"),
            Self::Layered => f.write_str("layered"),
        }
    }
}

/// Error returned when parsing an unknown merge strategy name.
#[derive(Debug, thiserror::Error)]
#[error("unknown merge strategy '{0}' (expected 'replace' or 'layered')")]
pub struct ParseMergeStrategyError(String);

impl FromStr for MergeStrategy {
    type Err = ParseMergeStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "layered" => Ok(Self::Layered),
            other => Err(ParseMergeStrategyError(other.to_owned())),
        }
    }
}

/// Settings for [`HieraLoader`].
#[derive(Debug, Clone)]
pub struct HieraSettings {
    /// Data path below each project directory.
    pub data_path: PathBuf,
    /// Recognized filenames, lowest precedence first.
    pub file_names: Vec<String>,
    pub merge_strategy: MergeStrategy,
}

impl Default for HieraSettings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            file_names: DEFAULT_FILE_NAMES.iter().map(|&n| n.to_owned()).collect(),
            merge_strategy: MergeStrategy::default(),
        }
    }
}

/// Loads Hiera data for directories of a project.
#[derive(Debug, Clone)]
pub struct HieraLoader {
    project_root: PathBuf,
    settings: HieraSettings,
}

impl HieraLoader {
    /// Create a loader with default settings.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            settings: HieraSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: HieraSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Directory scanned for `directory`.
    ///
    /// With `override_path` the directory itself is scanned (used for the
    /// Puppet rules below `global`), otherwise its Hiera data path.
    pub fn resolve(&self, directory: &str, override_path: bool) -> PathBuf {
        let dir = self.project_root.join(directory);
        if override_path {
            dir
        } else {
            dir.join(&self.settings.data_path)
        }
    }

    /// Load the configuration tree of a project directory.
    ///
    /// Returns an empty mapping if the resolved directory doesn't exist or
    /// holds no recognized files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed, a recognized file
    /// cannot be read or parsed, or its top level is not a mapping.
    pub fn load(&self, directory: &str, override_path: bool) -> Result<Mapping, HieraError> {
        let dir = self.resolve(directory, override_path);
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "No Hiera data directory");
            return Ok(Mapping::new());
        }

        let files = self.recognized_files(&dir)?;
        match self.settings.merge_strategy {
            MergeStrategy::Replace => load_replace(&dir, &files),
            MergeStrategy::Layered => self.load_layered(files),
        }
    }

    /// Recognized files in `dir`, in directory enumeration order.
    fn recognized_files(&self, dir: &Path) -> Result<Vec<PathBuf>, HieraError> {
        let io_error = |source| HieraError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let path = entry.path();
            let recognized = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.settings.file_names.iter().any(|n| n == name));
            if recognized && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Deep merge files in allow-list order.
    fn load_layered(&self, mut files: Vec<PathBuf>) -> Result<Mapping, HieraError> {
        files.sort_by_key(|path| self.precedence(path));

        let mut merged = Mapping::new();
        for path in &files {
            merge_into(&mut merged, read_tree(path)?);
        }
        Ok(merged)
    }

    fn precedence(&self, path: &Path) -> usize {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        self.settings
            .file_names
            .iter()
            .position(|n| n == name)
            .unwrap_or(usize::MAX)
    }
}

/// Every recognized file replaces the previous result; the last one read wins.
fn load_replace(dir: &Path, files: &[PathBuf]) -> Result<Mapping, HieraError> {
    if files.len() > 1 {
        tracing::warn!(
            dir = %dir.display(),
            files = files.len(),
            "Multiple Hiera files found; only the last one read is kept"
        );
    }

    let mut tree = Mapping::new();
    for path in files {
        tree = read_tree(path)?;
    }
    Ok(tree)
}

/// Read one Hiera file. Empty documents yield an empty mapping.
fn read_tree(path: &Path) -> Result<Mapping, HieraError> {
    let content = fs::read_to_string(path).map_err(|source| HieraError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = parse_yaml(&content).map_err(|source| HieraError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded Hiera file");

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Scalar(Scalar::Null) => Ok(Mapping::new()),
        Value::Scalar(_) | Value::Sequence(_) => Err(HieraError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

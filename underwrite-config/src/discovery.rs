//! Configuration file discovery
//!
//! Looks for `underwrite.{toml,yaml,yml,json}` in the global `~/.underwrite/`
//! directory and the project `./.underwrite/` directory. Project files take
//! precedence over global ones.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Name of the configuration directory in both scopes.
pub const CONFIG_DIR_NAME: &str = ".underwrite";

/// Accepted configuration file names, in load order within one directory.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "underwrite.toml",
    "underwrite.yaml",
    "underwrite.yml",
    "underwrite.json",
];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub scope: ConfigScope,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where a configuration file was found. Later scopes override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    /// `~/.underwrite/`
    Global,
    /// `./.underwrite/`
    Project,
}

/// Finds configuration files in the global and project directories
#[derive(Debug, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discovery rooted at the current directory and the home directory,
    /// resolved when `discover_all` runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovery over explicit directories instead of the standard ones.
    pub fn with_directories(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            global_dir,
        }
    }

    /// All configuration files, global first, so figment merges project
    /// files on top.
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let global_dir = self.global_dir.clone().or_else(resolve_global_dir);
        let project_dir = self.project_dir.clone().or_else(resolve_project_dir);

        let mut files = Vec::new();
        if let Some(dir) = &global_dir {
            files.extend(search_directory(dir, ConfigScope::Global));
        }
        if let Some(dir) = &project_dir {
            files.extend(search_directory(dir, ConfigScope::Project));
        }

        debug!(count = files.len(), "discovered configuration files");
        files
    }
}

fn search_directory(dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
    if !dir.exists() {
        trace!(dir = %dir.display(), "configuration directory does not exist");
        return Vec::new();
    }
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "configuration path is not a directory");
        return Vec::new();
    }

    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .filter_map(|path| classify_file(path, scope))
        .inspect(|file| trace!(path = %file.path.display(), format = ?file.format, "found config"))
        .collect()
}

fn classify_file(path: PathBuf, scope: ConfigScope) -> Option<ConfigFile> {
    let format = ConfigFormat::from_extension(path.extension()?.to_str()?)?;
    Some(ConfigFile {
        path,
        format,
        scope,
    })
}

fn resolve_project_dir() -> Option<PathBuf> {
    let dir = std::env::current_dir().ok()?.join(CONFIG_DIR_NAME);
    dir.is_dir().then_some(dir)
}

fn resolve_global_dir() -> Option<PathBuf> {
    let dir = dirs::home_dir()?.join(CONFIG_DIR_NAME);
    dir.is_dir().then_some(dir)
}

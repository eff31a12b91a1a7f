//! Configuration for worktrack
//!
//! Two optional JSON files, both with the same shape:
//!
//! - **Global** (`~/.config/wt/config.json`): personal defaults
//! - **Repository** (`<repo>/.wt.json`): overrides for one repository
//!
//! ```json
//! { "jira": { "status": {
//!     "default": { "working": "In Progress", "review": "In Review" },
//!     "types":   { "bug": { "working": "Fixing" } }
//! } } }
//! ```
//!
//! The repository file is layered over the global one key by key (see
//! [`Merge`]). Neither file is required; a malformed file is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use color_print::cformat;
use serde::{Deserialize, Serialize};

mod status;

pub use status::{Merge, Phase, PhaseMap, StatusConfig, same_status};

use crate::path::format_path_for_display;

/// Global config location relative to the home directory.
pub const GLOBAL_CONFIG_PATH: &str = ".config/wt/config.json";
/// Per-repository config file name, at the repository root.
pub const REPO_CONFIG_FILE: &str = ".wt.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A config file exists but could not be read or parsed.
    Invalid { path: PathBuf, error: String },
    NoStatusMapping { issue_type: String, phase: Phase },
    /// No status mapping is configured anywhere.
    NotConfigured,
    /// `--init` would overwrite an existing file.
    AlreadyExists { path: PathBuf },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { path, error } => {
                let path = format_path_for_display(path);
                write!(f, "invalid config {path}: {error}")
            }
            ConfigError::NoStatusMapping { issue_type, phase } => {
                write!(f, "no status mapping for {phase} (issue type {issue_type})")
            }
            ConfigError::NotConfigured => write!(
                f,
                "{}",
                cformat!(
                    "no status mapping configured; run <bright-black>wt jira config --init</> to create one"
                )
            ),
            ConfigError::AlreadyExists { path } => {
                let path = format_path_for_display(path);
                write!(f, "{}", cformat!("config already exists at <bold>{path}</>"))
            }
        }
    }
}

/// On-disk file shape. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    jira: JiraSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct JiraSection {
    status: StatusConfig,
}

/// Path of the global config for a home directory.
pub fn global_config_path(home: &Path) -> PathBuf {
    home.join(GLOBAL_CONFIG_PATH)
}

/// Path of the repository config for a repository root.
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(REPO_CONFIG_FILE)
}

/// Read one config file. `Ok(None)` when the file does not exist.
pub fn load_file(path: &Path) -> Result<Option<StatusConfig>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                error: e.to_string(),
            });
        }
    };

    let file: ConfigFile = serde_json::from_str(&contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(Some(file.jira.status.normalized()))
}

/// Load and merge the global and repository configs.
///
/// Either location may be unknown (`None`) or absent on disk; the result is
/// then whatever the other layer provides, possibly empty.
pub fn load_layered(
    home: Option<&Path>,
    repo_root: Option<&Path>,
) -> Result<StatusConfig, ConfigError> {
    let global = match home {
        Some(home) => load_file(&global_config_path(home))?,
        None => None,
    };
    let repo = match repo_root {
        Some(root) => load_file(&repo_config_path(root))?,
        None => None,
    };

    Ok(global
        .unwrap_or_default()
        .merge_with(&repo.unwrap_or_default()))
}

/// Write the template configuration to `path`, creating parent directories.
///
/// Refuses to replace an existing file.
pub fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        }
        .into());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = ConfigFile {
        jira: JiraSection {
            status: StatusConfig::template(),
        },
    };
    let mut json = serde_json::to_string_pretty(&file)?;
    json.push('\n');
    fs::write(path, json)?;
    log::info!("wrote config template to {}", path.display());
    Ok(())
}

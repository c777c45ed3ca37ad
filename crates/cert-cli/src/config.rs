//! Settings file discovery and loading.
//!
//! Settings live in the platform config directory:
//! - macOS: ~/Library/Application Support/com.certgen.Certificate-Generator/
//! - Windows: %APPDATA%/certgen/Certificate Generator/config/
//! - Linux: ~/.config/certificategenerator/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use thiserror::Error;
use tracing::{info, warn};

use cert_model::Settings;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "certgen";
const APP_NAME: &str = "Certificate Generator";
const CONFIG_FILENAME: &str = "settings.toml";

/// Folder created under the user's Downloads directory.
pub const DEFAULT_ROOT_DIR: &str = "certs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings file {path}: placeholder `{field}` must not be empty")]
    EmptyPlaceholder { path: PathBuf, field: &'static str },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Effective settings and the file they came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: Option<PathBuf>,
}

/// Location of the platform settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `explicit`, or from the platform settings file.
///
/// Any problem with an explicit file is an error. Problems with the platform
/// file are logged and defaults are used instead.
pub fn load_settings(explicit: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = parse_settings(&content, path)?;
        info!(path = %path.display(), "loaded settings");
        return Ok(LoadedSettings {
            settings,
            source: Some(path.to_path_buf()),
        });
    }

    let Some(path) = settings_path() else {
        warn!("could not determine settings path, using defaults");
        return Ok(LoadedSettings::default());
    };
    Ok(load_platform_settings(&path))
}

fn load_platform_settings(path: &Path) -> LoadedSettings {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no settings file found, using defaults");
            return LoadedSettings::default();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read settings file, using defaults");
            return LoadedSettings::default();
        }
    };
    match parse_settings(&content, path) {
        Ok(settings) => {
            info!(path = %path.display(), "loaded settings");
            LoadedSettings {
                settings,
                source: Some(path.to_path_buf()),
            }
        }
        Err(err) => {
            warn!(error = %err, "ignoring settings file, using defaults");
            LoadedSettings::default()
        }
    }
}

/// Parse and validate a settings document read from `path`.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let tokens = &settings.placeholders;
    for (field, token) in [
        ("first_name", &tokens.first_name),
        ("last_name", &tokens.last_name),
        ("reference", &tokens.reference),
    ] {
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyPlaceholder {
                path: path.to_path_buf(),
                field,
            });
        }
    }
    Ok(settings)
}

pub fn settings_to_toml(settings: &Settings) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(settings)?)
}

/// `<Downloads>/certs`, or `./certs` when there is no Downloads directory.
pub fn default_output_root() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|dir| dir.join(DEFAULT_ROOT_DIR)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR))
}

/// Output root from settings, falling back to [`default_output_root`].
pub fn resolve_output_root(settings: &Settings) -> PathBuf {
    settings
        .output
        .root
        .clone()
        .unwrap_or_else(default_output_root)
}

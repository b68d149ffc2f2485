//! Configuration for libris paths and codec policy.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (LIBRIS_HOME, LIBRIS_DATA)
//! 3. Config file (.libris/config.yaml)
//! 4. Defaults (~/.libris, ~/.libris/libraries.json)
//!
//! Config file discovery:
//! - Searches current directory and parents for .libris/config.yaml
//! - `home` is relative to the .libris/ directory, every other path is
//!   relative to the project root (the parent of .libris/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::codec::DecodePolicy;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Default catalog file name inside the home directory
pub const DEFAULT_DATA_FILE: &str = "libraries.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub codec: Option<CodecConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .libris/)
    pub home: Option<String>,
    /// Catalog file to load
    pub data: Option<String>,
    /// Catalog file to write on exit (defaults to `data`)
    pub save: Option<String>,
    /// Optional log file
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    pub decode_policy: Option<DecodePolicy>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Catalog file read at start
    pub data_file: PathBuf,
    /// Catalog file written at exit
    pub save_file: PathBuf,
    /// Extra log destination, if any
    pub log_file: Option<PathBuf>,
    /// How unreadable labels are handled
    pub decode_policy: DecodePolicy,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub home: Option<PathBuf>,
    pub data: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            home: std::env::var("LIBRIS_HOME").ok().map(PathBuf::from),
            data: std::env::var("LIBRIS_DATA").ok().map(PathBuf::from),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".libris").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Combine an optional config file, env overrides and defaults
fn resolve_config(
    config_file: Option<PathBuf>,
    env: EnvOverrides,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let config = config_file.as_deref().map(load_config_file).transpose()?;
    let paths = config.as_ref().map(|c| c.paths.clone()).unwrap_or_default();

    // .libris/ and the project root above it
    let libris_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));
    let base_dir = libris_dir.parent().unwrap_or(Path::new("."));

    let home = env
        .home
        .or_else(|| paths.home.as_deref().map(|h| resolve_path(libris_dir, h)))
        .unwrap_or(default_home);

    let data_file = env
        .data
        .or_else(|| paths.data.as_deref().map(|d| resolve_path(base_dir, d)))
        .unwrap_or_else(|| home.join(DEFAULT_DATA_FILE));

    let save_file = paths
        .save
        .as_deref()
        .map(|s| resolve_path(base_dir, s))
        .unwrap_or_else(|| data_file.clone());

    let log_file = paths.log_file.as_deref().map(|l| resolve_path(base_dir, l));

    let decode_policy = config
        .as_ref()
        .and_then(|c| c.codec.as_ref())
        .and_then(|c| c.decode_policy)
        .unwrap_or_default();

    Ok(ResolvedConfig {
        home,
        data_file,
        save_file,
        log_file,
        decode_policy,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".libris");

    resolve_config(find_config_file(), EnvOverrides::from_env(), default_home)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let libris_dir = root.join(".libris");
        std::fs::create_dir_all(&libris_dir).unwrap();

        let config_path = libris_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let home = PathBuf::from("/home/reader/.libris");
        let config = resolve_config(None, EnvOverrides::default(), home.clone()).unwrap();

        assert_eq!(config.home, home);
        assert_eq!(config.data_file, home.join("libraries.json"));
        assert_eq!(config.save_file, config.data_file);
        assert_eq!(config.decode_policy, DecodePolicy::Strict);
        assert!(config.log_file.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  data: data/libraries.json
  save: data/saved.json
  log_file: logs/main.log
codec:
  decode_policy: skip
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.data, Some("data/libraries.json".to_string()));
        assert_eq!(config.codec.unwrap().decode_policy, Some(DecodePolicy::Skip));
    }

    #[test]
    fn test_paths_relative_to_project_root() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  home: ./state
  data: data/libraries.json
  log_file: logs/main.log
"#,
        );

        let config = resolve_config(
            Some(config_path),
            EnvOverrides::default(),
            PathBuf::from("/unused"),
        )
        .unwrap();

        assert_eq!(config.home, temp.path().join(".libris").join("./state"));
        assert_eq!(config.data_file, temp.path().join("data/libraries.json"));
        assert_eq!(config.save_file, config.data_file);
        assert_eq!(config.log_file, Some(temp.path().join("logs/main.log")));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  data: data/libraries.json
"#,
        );

        let env = EnvOverrides {
            home: Some(PathBuf::from("/env/home")),
            data: Some(PathBuf::from("/env/books.json")),
        };
        let config = resolve_config(Some(config_path), env, PathBuf::from("/unused")).unwrap();

        assert_eq!(config.home, PathBuf::from("/env/home"));
        assert_eq!(config.data_file, PathBuf::from("/env/books.json"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}

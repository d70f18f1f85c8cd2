//! Configuration file parser for `<project-root>/feedgate.toml`.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
//!
//! The project root is never read from the file: it is supplied by the caller
//! (the `--root` flag) and every relative path resolves against it.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::DEFAULT_CONTEXT_RADIUS;

/// Config file name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "feedgate.toml";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level validator configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the build runs in and relative paths resolve against.
    #[serde(skip)]
    pub project_root: PathBuf,

    /// Location of the generated feed, relative to the project root
    /// unless absolute.
    pub feed_path: PathBuf,

    /// Characters of context shown on each side of a binary-content finding.
    pub context_radius: usize,

    /// Site build invoked before validation.
    pub build: BuildConfig,
}

/// External site-build command.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Whether to run the build before validating. Disable when an earlier
    /// pipeline step already produced the feed.
    pub enabled: bool,

    /// Program followed by its arguments.
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            feed_path: PathBuf::from("_site").join("index.xml"),
            context_radius: DEFAULT_CONTEXT_RADIUS,
            build: BuildConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec!["quarto".to_string(), "render".to_string()],
        }
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Defaults rooted at `project_root`.
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Absolute-or-root-relative path of the feed file.
    pub fn feed_file(&self) -> PathBuf {
        self.project_root.join(&self.feed_path)
    }

    /// Load configuration from a TOML file, rooted at `project_root`.
    ///
    /// - Missing file → `Ok(Config::for_project(project_root))`
    /// - Empty file → `Ok(Config::for_project(project_root))`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path, project_root: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_config_text(path)? else {
            return Ok(Self::for_project(project_root));
        };

        warn_unknown_config_keys(&content);

        let mut config: Config = toml::from_str(&content)?;
        config.project_root = project_root.to_path_buf();
        tracing::info!(
            path = %path.display(),
            feed = %config.feed_path.display(),
            build = config.build.enabled,
            "Loaded configuration"
        );
        Ok(config)
    }
}

/// Reads the config file, or `None` when there is nothing to parse: the file
/// is absent (including removed after the size check) or blank.
fn read_config_text(path: &Path) -> Result<Option<String>, ConfigError> {
    let read = std::fs::metadata(path).and_then(|meta| {
        // SEC-014: refuse oversized files before reading them into memory
        if meta.len() > Config::MAX_FILE_SIZE {
            return Ok(Err(ConfigError::TooLarge(format!(
                "Config file is {} bytes (max {} bytes)",
                meta.len(),
                Config::MAX_FILE_SIZE
            ))));
        }
        std::fs::read_to_string(path).map(Ok)
    });

    match read {
        Ok(Ok(content)) if content.trim().is_empty() => {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            Ok(None)
        }
        Ok(Ok(content)) => Ok(Some(content)),
        Ok(Err(too_large)) => Err(too_large),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            Ok(None)
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Logs keys the config structs do not recognise, most likely typos.
fn warn_unknown_config_keys(content: &str) {
    let Ok(raw) = content.parse::<toml::Table>() else {
        // toml::from_str reports the syntax error
        return;
    };
    warn_unknown_keys(&raw, &["feed_path", "context_radius", "build"], "");
    if let Some(toml::Value::Table(build)) = raw.get("build") {
        warn_unknown_keys(build, &["enabled", "command"], "build.");
    }
}

fn warn_unknown_keys(table: &toml::Table, known_keys: &[&str], prefix: &str) {
    for key in table.keys() {
        if !known_keys.contains(&key.as_str()) {
            tracing::warn!(key = %format!("{}{}", prefix, key), "Unknown key in config file, ignoring");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project_root, PathBuf::from("."));
        assert_eq!(config.feed_path, PathBuf::from("_site/index.xml"));
        assert_eq!(config.context_radius, 20);
        assert!(config.build.enabled);
        assert_eq!(config.build.command, vec!["quarto", "render"]);
    }

    #[test]
    fn test_feed_file_resolves_against_root() {
        let config = Config::for_project("/srv/blog");
        assert_eq!(config.feed_file(), PathBuf::from("/srv/blog/_site/index.xml"));
    }

    #[test]
    fn test_absolute_feed_path_wins() {
        let mut config = Config::for_project("/srv/blog");
        config.feed_path = PathBuf::from("/var/www/feed.xml");
        assert_eq!(config.feed_file(), PathBuf::from("/var/www/feed.xml"));
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedgate_test_nonexistent_config.toml");
        let config = Config::load(path, Path::new("/srv/blog")).unwrap();
        assert_eq!(config.project_root, PathBuf::from("/srv/blog"));
        assert!(config.build.enabled);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let dir = scratch_dir("feedgate_config_test_whitespace");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "   \n  \n  ").unwrap();

        let config = Config::load(&path, &dir).unwrap();
        assert_eq!(config.context_radius, 20);
        assert_eq!(config.project_root, dir);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = scratch_dir("feedgate_config_test_partial");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "feed_path = \"public/rss.xml\"\n").unwrap();

        let config = Config::load(&path, &dir).unwrap();
        assert_eq!(config.feed_path, PathBuf::from("public/rss.xml"));
        assert_eq!(config.context_radius, 20); // default
        assert_eq!(config.build.command, vec!["quarto", "render"]); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = scratch_dir("feedgate_config_test_full");
        let path = dir.join(CONFIG_FILE_NAME);

        let content = r#"
feed_path = "public/index.xml"
context_radius = 8

[build]
enabled = false
command = ["hugo", "--minify"]
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path, &dir).unwrap();
        assert_eq!(config.feed_path, PathBuf::from("public/index.xml"));
        assert_eq!(config.context_radius, 8);
        assert!(!config.build.enabled);
        assert_eq!(config.build.command, vec!["hugo", "--minify"]);
        assert_eq!(config.feed_file(), dir.join("public/index.xml"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_project_root_not_read_from_file() {
        let dir = scratch_dir("feedgate_config_test_root_key");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "project_root = \"/elsewhere\"\n").unwrap();

        let config = Config::load(&path, &dir).unwrap();
        assert_eq!(config.project_root, dir);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = scratch_dir("feedgate_config_test_invalid");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let err = Config::load(&path, &dir).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = scratch_dir("feedgate_config_test_wrongtype");
        let path = dir.join(CONFIG_FILE_NAME);
        // command should be a list, not a string
        std::fs::write(&path, "[build]\ncommand = \"quarto render\"\n").unwrap();

        assert!(Config::load(&path, &dir).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = scratch_dir("feedgate_config_test_unknown");
        let path = dir.join(CONFIG_FILE_NAME);
        let content = r#"
feed_pth = "typo.xml"

[build]
enabled = true
retries = 3
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path, &dir).unwrap();
        assert_eq!(config.feed_path, PathBuf::from("_site/index.xml"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_config_text_missing_or_blank_is_none() {
        let dir = scratch_dir("feedgate_config_test_read_text");
        let path = dir.join(CONFIG_FILE_NAME);

        assert!(read_config_text(&path).unwrap().is_none());

        std::fs::write(&path, "\n\t \n").unwrap();
        assert!(read_config_text(&path).unwrap().is_none());

        std::fs::write(&path, "context_radius = 5\n").unwrap();
        assert_eq!(
            read_config_text(&path).unwrap().as_deref(),
            Some("context_radius = 5\n")
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = scratch_dir("feedgate_config_test_dir_path");
        let err = Config::load(&dir, &dir).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let dir = scratch_dir("feedgate_config_test_too_large");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path, &dir).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_NOTES_FILE: &str = "notes.json";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub notes_file: Option<PathBuf>,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_sha256: Option<String>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            password: None,
            password_sha256: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Config {
    /// Reads a TOML config file. Relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&raw)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.notes_file = config.notes_file.map(|file| base.join(file));
        config.logging.dir = config.logging.dir.map(|dir| base.join(dir));
        Ok(config)
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Notes file to use: an explicit override first, then the config, then the default.
    pub fn notes_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.notes_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTES_FILE))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let access = &self.access;
        if access.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "access.max_attempts must be at least 1".to_string(),
            ));
        }
        if access.password.is_some() && access.password_sha256.is_some() {
            return Err(ConfigError::Invalid(
                "set only one of access.password and access.password_sha256".to_string(),
            ));
        }
        if let Some(hex) = access.password_sha256.as_deref() {
            let hex = hex.trim();
            if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid(
                    "access.password_sha256 must be 64 hex characters".to_string(),
                ));
            }
        }
        if access.password.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Invalid(
                "access.password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Toml(err) => write!(f, "invalid config TOML: {}", err),
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use uuid::Uuid;

    use super::{Config, ConfigError, DEFAULT_NOTES_FILE};

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml("").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.access.max_attempts, 3);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.notes_path(None), PathBuf::from(DEFAULT_NOTES_FILE));
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml(
            r#"
notes_file = "my-notes.json"

[access]
password = "1234"
max_attempts = 5

[logging]
level = "debug"
dir = "/var/log/notebook"
"#,
        )
        .expect("config should parse");
        assert_eq!(config.notes_file, Some(PathBuf::from("my-notes.json")));
        assert_eq!(config.access.password.as_deref(), Some("1234"));
        assert_eq!(config.access.max_attempts, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/notebook")));
    }

    #[test]
    fn override_wins_over_config_file_setting() {
        let config = Config::from_toml("notes_file = \"a.json\"").expect("config should parse");
        assert_eq!(config.notes_path(None), PathBuf::from("a.json"));
        assert_eq!(
            config.notes_path(Some(Path::new("b.json"))),
            PathBuf::from("b.json")
        );
    }

    #[test]
    fn rejects_invalid_access_settings() {
        for raw in [
            "[access]\nmax_attempts = 0",
            "[access]\npassword = \"a\"\npassword_sha256 = \"00\"",
            "[access]\npassword_sha256 = \"xyz\"",
            "[access]\npassword = \"\"",
        ] {
            let err = Config::from_toml(raw).expect_err("config should be rejected");
            assert!(matches!(err, ConfigError::Invalid(_)), "{raw}");
        }
    }

    #[test]
    fn rejects_unknown_keys_and_bad_toml() {
        assert!(matches!(
            Config::from_toml("colour = true"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml("not ="),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_resolves_relative_paths_against_config_dir() {
        let root = std::env::temp_dir().join(format!("notebook-config-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&root).expect("temp dir should be creatable");
        let path = root.join("notebook.toml");
        std::fs::write(&path, "notes_file = \"data/notes.json\"\n[logging]\ndir = \"logs\"\n")
            .expect("config should be writable");

        let config = Config::load(&path).expect("config should load");
        assert_eq!(config.notes_file, Some(root.join("data/notes.json")));
        assert_eq!(config.logging.dir, Some(root.join("logs")));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here/notebook.toml"))
            .expect_err("missing config should fail");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("cannot read config"));
    }
}

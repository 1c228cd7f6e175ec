// Configuration loading and validation (config/matchup.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single config file, looked up under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "matchup.toml";

/// Earliest and latest season accepted in `data.seasons`.
const FIRST_SEASON: u16 = 1871;
const LAST_SEASON: u16 = 2100;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// matchup.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataPaths,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the arsenal tables and roster live, and which seasons to read.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub stats_dir: String,
    pub roster: String,
    pub seasons: Vec<u16>,
}

impl DataPaths {
    /// Path of the batter arsenal CSV for a season.
    pub fn hitter_file(&self, season: u16) -> PathBuf {
        Path::new(&self.stats_dir).join(format!("hitterpitcharsenalstats_{season}.csv"))
    }

    /// Path of the pitcher arsenal CSV for a season.
    pub fn pitcher_file(&self, season: u16) -> PathBuf {
        Path::new(&self.stats_dir).join(format!("pitcherpitcharsenalstats_{season}.csv"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            dir: default_log_dir(),
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".into()
}

fn default_log_file() -> String {
    "dugout.log".into()
}

fn default_log_filter() -> String {
    "dugout=info,warn".into()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/matchup.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` handles that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/matchup.toml` from `defaults/` when it is missing.
///
/// Returns the path written, or `None` when the user's file already exists.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} is missing and there is no {} to seed it from",
                target.display(),
                source.display()
            ),
        });
    }

    let copied = copy_if_missing(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("{} -> {}: {e}", source.display(), target.display()),
    })?;
    Ok(copied.then_some(target))
}

/// Copy `source` to `target` unless `target` exists. `create_new` keeps a
/// file written concurrently by someone else.
fn copy_if_missing(source: &Path, target: &Path) -> std::io::Result<bool> {
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut dest = match std::fs::OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };
    let mut src = std::fs::File::open(source)?;
    std::io::copy(&mut src, &mut dest)?;
    Ok(true)
}

/// Loads config relative to the current working directory, copying
/// defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let required: &[(&str, &str)] = &[
        ("data.stats_dir", config.data.stats_dir.as_str()),
        ("data.roster", config.data.roster.as_str()),
        ("logging.file", config.logging.file.as_str()),
    ];
    for (name, val) in required {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.data.seasons.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.seasons".into(),
            message: "must list at least one season".into(),
        });
    }

    if let Some(bad) = config
        .data
        .seasons
        .iter()
        .find(|s| !(FIRST_SEASON..=LAST_SEASON).contains(*s))
    {
        return Err(ConfigError::ValidationError {
            field: "data.seasons".into(),
            message: format!("season {bad} outside {FIRST_SEASON}..={LAST_SEASON}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where `defaults/` lives.
    fn workspace_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    /// Fresh scratch directory with an empty `config/` inside.
    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    #[test]
    fn load_default_config_file() {
        let tmp = scratch("dugout_config_defaults");
        fs::copy(
            workspace_root().join("defaults").join(CONFIG_FILE),
            tmp.join("config").join(CONFIG_FILE),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("defaults should be valid");
        assert_eq!(config.data.stats_dir, "data/stats");
        assert_eq!(config.data.roster, "data/rosters.json");
        assert_eq!(config.data.seasons, vec![2025, 2024, 2023]);
        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.file, "dugout.log");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn logging_section_is_optional() {
        let tmp = scratch("dugout_config_no_logging");
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            r#"
[data]
stats_dir = "stats"
roster = "rosters.json"
seasons = [2024]
"#,
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.logging.file, "dugout.log");
        assert_eq!(config.logging.filter, "dugout=info,warn");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn season_file_paths() {
        let paths = DataPaths {
            stats_dir: "data/stats".into(),
            roster: "data/rosters.json".into(),
            seasons: vec![2024],
        };
        assert_eq!(
            paths.hitter_file(2024),
            Path::new("data/stats/hitterpitcharsenalstats_2024.csv")
        );
        assert_eq!(
            paths.pitcher_file(2023),
            Path::new("data/stats/pitcherpitcharsenalstats_2023.csv")
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = scratch("dugout_config_missing");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = scratch("dugout_config_malformed");
        fs::write(tmp.join("config").join(CONFIG_FILE), "[data\nstats_dir = 1").unwrap();
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_seasons() {
        let tmp = scratch("dugout_config_empty_seasons");
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            r#"
[data]
stats_dir = "stats"
roster = "rosters.json"
seasons = []
"#,
        )
        .unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "data.seasons"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_out_of_range_season() {
        let tmp = scratch("dugout_config_bad_season");
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            r#"
[data]
stats_dir = "stats"
roster = "rosters.json"
seasons = [2024, 1776]
"#,
        )
        .unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "data.seasons");
                assert!(message.contains("1776"));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_stats_dir() {
        let tmp = scratch("dugout_config_blank_dir");
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            r#"
[data]
stats_dir = "  "
roster = "rosters.json"
seasons = [2024]
"#,
        )
        .unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "data.stats_dir"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_config_seeded_from_defaults() {
        let tmp = std::env::temp_dir().join("dugout_config_seed");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "# default\n").unwrap();

        let written = ensure_config_file(&tmp).unwrap();
        assert_eq!(written, Some(tmp.join("config").join(CONFIG_FILE)));
        assert_eq!(
            fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap(),
            "# default\n"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let tmp = scratch("dugout_config_keep");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "# default\n").unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# edited\n").unwrap();

        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        assert_eq!(
            fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap(),
            "# edited\n"
        );

        // The copy helper itself refuses to clobber.
        let target = tmp.join("config").join(CONFIG_FILE);
        assert!(!copy_if_missing(&tmp.join("defaults").join(CONFIG_FILE), &target).unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "# edited\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_config_needs_no_defaults() {
        let tmp = scratch("dugout_config_no_defaults");
        fs::write(tmp.join("config").join(CONFIG_FILE), "# edited\n").unwrap();
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn no_config_and_no_defaults_fails() {
        let tmp = std::env::temp_dir().join("dugout_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_file(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }
}

use crate::consts;
use crate::sim::LoopSettings;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Name to record high scores under
    pub(crate) player_name: Option<String>,

    /// Game loop timing
    pub(crate) game: LoopSettings,

    /// Settings about data files
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the name to record high scores under: `cli_name` if given,
    /// otherwise the configured name, with blank names replaced by
    /// [`DEFAULT_PLAYER_NAME`][consts::DEFAULT_PLAYER_NAME]
    pub(crate) fn player_name(&self, cli_name: Option<&str>) -> String {
        normalize_player_name(cli_name.or(self.player_name.as_deref()).unwrap_or_default())
    }

    /// Return the path at which high scores should be stored: the file given
    /// in the configuration or, if that is not set, the default high scores
    /// file path.  Return `None` if no path is present in the configuration
    /// and the default path could not be computed.
    pub(crate) fn high_scores_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .high_scores_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| {
                dirs::data_local_dir()
                    .map(|p| Cow::from(p.join("gridsnake").join("high-scores.json")))
            })
    }

    /// Return the path to write log messages to, defaulting to a file in the
    /// local data directory
    pub(crate) fn log_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .log_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| {
                dirs::data_local_dir().map(|p| Cow::from(p.join("gridsnake").join("gridsnake.log")))
            })
    }
}

/// Strip surrounding whitespace from a player name, replacing a blank name
/// with [`DEFAULT_PLAYER_NAME`][consts::DEFAULT_PLAYER_NAME]
pub(crate) fn normalize_player_name(name: &str) -> String {
    match name.trim() {
        "" => String::from(consts::DEFAULT_PLAYER_NAME),
        s => s.to_owned(),
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which high scores should be stored
    pub(crate) high_scores_file: Option<PathBuf>,

    /// Whether to load & save high scores in a file
    pub(crate) save_high_scores: bool,

    /// Path at which to write the log
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_scores_file: None,
            save_high_scores: true,
            log_file: None,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    high_scores_file: Option<String>,
    save_high_scores: bool,
    log_file: Option<String>,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            high_scores_file: None,
            save_high_scores: true,
            log_file: None,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            high_scores_file: value
                .high_scores_file
                .map(expanduser::expanduser)
                .transpose()?,
            save_high_scores: value.save_high_scores,
            log_file: value.log_file.map(expanduser::expanduser).transpose()?,
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

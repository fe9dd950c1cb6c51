/// Player configuration
use crate::error::{PlayerError, Result};
use melody_discovery::{RelevanceWeights, DEFAULT_TOP_N};
use melody_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file read when no path is given, if present
pub const DEFAULT_CONFIG_FILE: &str = "melody.toml";

/// Prefix of environment overrides, e.g. `MELODY_PLAYBACK__VOLUME=0.3`
pub const ENV_PREFIX: &str = "MELODY";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiscoverySettings {
    #[serde(default)]
    pub weights: RelevanceWeights,

    /// How many of the most played tracks may serve as reference
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Library file used when `--library` is not given
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Write play counts back to the library file when a session ends
    #[serde(default)]
    pub save_play_counts: bool,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `melody.toml` in the working
    /// directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// Like [`Self::load`], with environment variables taken from `env`
    /// instead of the process environment
    pub fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings.add_source(config::File::from(path))
            }
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (MELODY_SECTION__KEY)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if !(0.0..=1.0).contains(&playback.volume) {
            return Err(PlayerError::Config(format!(
                "playback.volume must be within [0, 1], got {}",
                playback.volume
            )));
        }

        if !playback.speed.is_finite() || playback.speed <= 0.0 {
            return Err(PlayerError::Config(format!(
                "playback.speed must be positive, got {}",
                playback.speed
            )));
        }

        if !(0.0..=1.0).contains(&playback.attribution_threshold) {
            return Err(PlayerError::Config(format!(
                "playback.attribution_threshold must be within [0, 1], got {}",
                playback.attribution_threshold
            )));
        }

        if playback.history_size == 0 {
            return Err(PlayerError::Config(
                "playback.history_size must be at least 1".to_string(),
            ));
        }

        if self.discovery.top_n == 0 {
            return Err(PlayerError::Config(
                "discovery.top_n must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Library file from the command line, falling back to the config
    pub fn library_path(&self, cli: Option<&Path>) -> Result<PathBuf> {
        cli.map(Path::to_path_buf)
            .or_else(|| self.library.path.clone())
            .ok_or_else(|| {
                PlayerError::Config(
                    "No library file (pass --library or set library.path)".to_string(),
                )
            })
    }
}

// Default values
fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            weights: RelevanceWeights::default(),
            top_n: default_top_n(),
        }
    }
}

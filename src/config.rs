//! Analysis configuration, optionally loaded from a TOML file.

use crate::stats::{DEFAULT_MIN_ANIME_COUNT, DEFAULT_TOP_ANIME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Every field falls back to its default when absent from the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data_path: PathBuf,
    /// Prefix of the timestamped output folder.
    pub base_output_dir: PathBuf,
    pub min_anime_count: usize,
    pub top_n_genres: usize,
    pub top_anime_per_genre: usize,
    pub side_genre_min_count: usize,
    pub open_output_dir: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./dataset/anime.csv"),
            base_output_dir: PathBuf::from("./anime_analysis_output"),
            min_anime_count: DEFAULT_MIN_ANIME_COUNT,
            top_n_genres: 5,
            top_anime_per_genre: DEFAULT_TOP_ANIME,
            side_genre_min_count: 3,
            open_output_dir: true,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

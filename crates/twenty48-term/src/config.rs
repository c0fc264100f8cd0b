use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use twenty48_core::Rules;

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Board size for the first game.
    #[serde(default = "defaults::size")]
    pub size: usize,

    /// Fixed RNG seed for reproducible games. Entropy when omitted.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub rules: Rules,

    #[serde(default)]
    pub storage: Storage,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Storage {
    /// Set to false to play without persisting the best score.
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    /// Directory holding `metadata.db`.
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            seed: None,
            rules: Rules::default(),
            storage: Storage::default(),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self { enabled: defaults::enabled(), data_dir: defaults::data_dir() }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        Ok(cfg)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn size() -> usize { 4 }
    pub fn enabled() -> bool { true }
    pub fn data_dir() -> PathBuf { PathBuf::from(".twenty48") }
}

// Texture generation settings, stored as JSON.
//
// Every field has a default so partial files load. `ConfigManager` writes the
// defaults out only when the file does not exist yet; an existing file that
// fails to parse or validate is reported and left untouched.

use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::noise_gen::{NoiseGenerator, MAX_OCTAVES, PERSISTENCE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub noise: NoiseConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub width: usize,
    pub height: usize,
    pub octave_count: u32,
    pub persistence: f32,
    /// Fixed seed for reproducible output. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub write_png: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            octave_count: 5,
            persistence: PERSISTENCE,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "perlin_noise.png".to_string(),
            write_png: true,
        }
    }
}

impl TextureConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: TextureConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.noise.width == 0 || self.noise.height == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "Texture size must be positive, got {}x{}",
                self.noise.width, self.noise.height
            )));
        }

        if self.noise.octave_count == 0 || self.noise.octave_count > MAX_OCTAVES {
            return Err(ConfigError::InvalidValue(format!(
                "Octave count must be between 1 and {}",
                MAX_OCTAVES
            )));
        }

        NoiseGenerator::with_persistence(self.noise.persistence)
            .and_then(|generator| generator.octave_amplitudes(self.noise.octave_count))
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        if self.output.write_png && self.output.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("Output path must not be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingFile(String),
    IoError(String),
    ParseError(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::MissingFile(msg) => write!(f, "Missing File: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid Value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ConfigError::MissingFile(err.to_string()),
            _ => ConfigError::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

pub struct ConfigManager {
    config: TextureConfig,
    config_path: String,
}

impl ConfigManager {
    /// Loads and validates `config_path`. A missing file is created with the
    /// defaults; any other failure is returned and the file is not rewritten.
    pub fn open(config_path: String) -> Result<Self, ConfigError> {
        let config = match TextureConfig::load_from_file(&config_path) {
            Ok(config) => config,
            Err(ConfigError::MissingFile(msg)) => {
                log::warn!("No config at {} ({}), writing defaults", config_path, msg);
                let config = TextureConfig::default();
                if let Err(e) = config.save_to_file(&config_path) {
                    log::error!("Failed to save default config: {}", e);
                }
                config
            }
            Err(e) => return Err(e),
        };
        config.validate()?;
        Ok(Self { config, config_path })
    }

    pub fn get_config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    /// Re-reads the file, keeping the current settings if it no longer loads.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let config = TextureConfig::load_from_file(&self.config_path)?;
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

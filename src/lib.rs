//! Procedural greyscale textures from octave-blended value noise.
//!
//! White noise is smoothed at several sample periods, the layers are blended
//! with geometrically decaying weights and the result is mapped to 8-bit grey.

pub mod configuration;
pub mod grid;
pub mod logger;
pub mod noise_gen;
pub mod texture;

pub use crate::configuration::{ConfigError, ConfigManager, LogLevel, TextureConfig};
pub use crate::grid::{ByteGrid, Grid, NoiseGrid};
pub use crate::noise_gen::{NoiseError, NoiseGenerator, PERSISTENCE};
pub use crate::texture::{map_to_gray, GreyscaleTexture, TextureError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use perlin_texture::logger::init_logger;
use perlin_texture::{ConfigManager, GreyscaleTexture, NoiseGenerator, TextureConfig};

const DEFAULT_CONFIG: &str = "perlin_texture.json";

fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    // Logger level lives in the config, so peek at it before the manager logs anything.
    let level = TextureConfig::load_from_file(&config_path)
        .map(|c| c.logging.level)
        .unwrap_or_default();
    init_logger(level);
    log::info!("{} v{}", perlin_texture::NAME, perlin_texture::VERSION);

    let manager = match ConfigManager::open(config_path) {
        Ok(manager) => manager,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Using config {}", manager.config_path());

    if let Err(e) = run(manager.get_config()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &TextureConfig) -> Result<(), Box<dyn std::error::Error>> {
    let noise = &config.noise;
    let generator = NoiseGenerator::with_persistence(noise.persistence)?;

    let mut rng = match noise.seed {
        Some(seed) => {
            log::info!("Seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let perlin = generator.generate_perlin_noise_sized(noise.width, noise.height, noise.octave_count, &mut rng)?;
    let texture = GreyscaleTexture::from_noise(&perlin);
    let (min, max) = perlin.value_range();

    log::info!(
        "Generated {}x{} texture, {} octaves in {:.2?} (range {:.3}..{:.3}, mean grey {:.1})",
        texture.width(),
        texture.height(),
        noise.octave_count,
        start.elapsed(),
        min,
        max,
        texture.mean()
    );

    if config.output.write_png {
        let path = Path::new(&config.output.path);
        texture.save_png(path)?;
        log::info!("Saved {}", path.display());
    }

    Ok(())
}

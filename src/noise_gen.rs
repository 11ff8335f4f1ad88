// Octave-blended value noise.
//
// White noise is sampled on a coarser lattice per octave (period 2^k),
// bilinearly interpolated with toroidal wraparound, then the octaves are
// summed with geometrically decaying weights and normalized.

use rand::Rng;

use crate::grid::{check_dimensions, NoiseGrid};

/// Default per-octave amplitude decay.
pub const PERSISTENCE: f32 = 0.6;

/// Most octaves a blend may use: the coarsest period, `2^(MAX_OCTAVES - 1)`,
/// is the largest power of two a `usize` holds.
pub const MAX_OCTAVES: u32 = usize::BITS;

#[derive(Debug, Clone, PartialEq)]
pub enum NoiseError {
    InvalidDimensions { width: usize, height: usize },
    BufferSizeMismatch { expected: usize, actual: usize },
    InvalidOctaveCount(u32),
    OctaveTooLarge(u32),
    InvalidPersistence(f32),
}

impl std::fmt::Display for NoiseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NoiseError::InvalidDimensions { width, height } => {
                write!(f, "Invalid grid dimensions {}x{}: width and height must be positive", width, height)
            }
            NoiseError::BufferSizeMismatch { expected, actual } => {
                write!(f, "Buffer holds {} cells, grid needs {}", actual, expected)
            }
            NoiseError::InvalidOctaveCount(count) => {
                write!(f, "Invalid octave count {}: at least one octave is required", count)
            }
            NoiseError::OctaveTooLarge(octave) => {
                write!(f, "Octave {} has a sample period that does not fit in usize", octave)
            }
            NoiseError::InvalidPersistence(p) => {
                write!(f, "Invalid persistence {}: octave weights must stay finite, normal floats", p)
            }
        }
    }
}

impl std::error::Error for NoiseError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseGenerator {
    persistence: f32,
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self { persistence: PERSISTENCE }
    }
}

impl NoiseGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persistence(persistence: f32) -> Result<Self, NoiseError> {
        if !persistence.is_finite() || persistence <= 0.0 {
            return Err(NoiseError::InvalidPersistence(persistence));
        }
        Ok(Self { persistence })
    }

    pub fn persistence(&self) -> f32 {
        self.persistence
    }

    /// Linear blend: `x0` at `alpha == 0`, `x1` at `alpha == 1`.
    #[inline]
    pub fn interpolate(x0: f32, x1: f32, alpha: f32) -> f32 {
        x0 * (1.0 - alpha) + alpha * x1
    }

    /// Fills a grid with independent uniform values in [0,1) drawn from `rng`.
    pub fn generate_white_noise<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<NoiseGrid, NoiseError> {
        let noise = NoiseGrid::from_fn(width, height, |_, _| rng.gen::<f32>())?;
        log::debug!("Generated {}x{} white noise", width, height);
        Ok(noise)
    }

    /// White noise from a fresh thread-local generator. Not reproducible.
    pub fn generate_white_noise_random(&self, width: usize, height: usize) -> Result<NoiseGrid, NoiseError> {
        self.generate_white_noise(width, height, &mut rand::thread_rng())
    }

    /// Samples `base` every `2^octave` cells and bilinearly interpolates the
    /// cells in between. The lattice wraps at the right and bottom edges.
    pub fn generate_smooth_noise(&self, base: &NoiseGrid, octave: u32) -> Result<NoiseGrid, NoiseError> {
        let width = base.width();
        let height = base.height();
        let sample_period = sample_period(octave)?;
        let sample_frequency = 1.0 / sample_period as f32;

        let mut smooth = NoiseGrid::new(width, height)?;

        for i in 0..width {
            let i0 = (i / sample_period) * sample_period;
            let i1 = (i0 + sample_period) % width;
            let horizontal_blend = (i - i0) as f32 * sample_frequency;

            for j in 0..height {
                let j0 = (j / sample_period) * sample_period;
                let j1 = (j0 + sample_period) % height;
                let vertical_blend = (j - j0) as f32 * sample_frequency;

                let top = Self::interpolate(base[(i0, j0)], base[(i1, j0)], horizontal_blend);
                let bottom = Self::interpolate(base[(i0, j1)], base[(i1, j1)], horizontal_blend);

                smooth[(i, j)] = Self::interpolate(top, bottom, vertical_blend);
            }
        }

        log::trace!("Smoothed octave {} (period {})", octave, sample_period);
        Ok(smooth)
    }

    /// Weight applied to each octave by [`generate_perlin_noise`], indexed by
    /// octave. The coarsest octave gets `persistence`, octave 0 gets
    /// `persistence^octave_count`.
    ///
    /// Fails with [`NoiseError::InvalidPersistence`] when a weight or their sum
    /// overflows or drops below the normal `f32` range, since normalizing by
    /// such a total yields NaN or zero.
    ///
    /// [`generate_perlin_noise`]: NoiseGenerator::generate_perlin_noise
    pub fn octave_amplitudes(&self, octave_count: u32) -> Result<Vec<f32>, NoiseError> {
        check_octave_count(octave_count)?;
        let mut amplitudes = vec![0.0; octave_count as usize];
        let mut amplitude = 1.0f32;
        let mut total = 0.0f32;
        for octave in (0..octave_count as usize).rev() {
            amplitude *= self.persistence;
            total += amplitude;
            if !amplitude.is_normal() || !total.is_normal() {
                return Err(NoiseError::InvalidPersistence(self.persistence));
            }
            amplitudes[octave] = amplitude;
        }
        Ok(amplitudes)
    }

    /// Blends `octave_count` smoothed copies of `base`, highest octave first,
    /// and divides by the summed weights.
    pub fn generate_perlin_noise(&self, base: &NoiseGrid, octave_count: u32) -> Result<NoiseGrid, NoiseError> {
        let amplitudes = self.octave_amplitudes(octave_count)?;
        let mut perlin = NoiseGrid::new(base.width(), base.height())?;
        let mut total_amplitude = 0.0f32;

        for octave in (0..octave_count).rev() {
            let amplitude = amplitudes[octave as usize];
            total_amplitude += amplitude;

            let smooth = self.generate_smooth_noise(base, octave)?;
            for (cell, value) in perlin.as_mut_slice().iter_mut().zip(smooth.iter()) {
                *cell += value * amplitude;
            }
        }

        for cell in perlin.as_mut_slice() {
            *cell /= total_amplitude;
        }

        log::debug!(
            "Blended {} octaves into {}x{} noise (persistence {}, total amplitude {:.4})",
            octave_count,
            base.width(),
            base.height(),
            self.persistence,
            total_amplitude
        );
        Ok(perlin)
    }

    /// White noise from `rng` followed by octave blending.
    pub fn generate_perlin_noise_sized<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        octave_count: u32,
        rng: &mut R,
    ) -> Result<NoiseGrid, NoiseError> {
        check_dimensions(width, height)?;
        check_octave_count(octave_count)?;
        let base = self.generate_white_noise(width, height, rng)?;
        self.generate_perlin_noise(&base, octave_count)
    }

    pub fn generate_perlin_noise_random(
        &self,
        width: usize,
        height: usize,
        octave_count: u32,
    ) -> Result<NoiseGrid, NoiseError> {
        self.generate_perlin_noise_sized(width, height, octave_count, &mut rand::thread_rng())
    }
}

fn sample_period(octave: u32) -> Result<usize, NoiseError> {
    if octave >= usize::BITS {
        return Err(NoiseError::OctaveTooLarge(octave));
    }
    Ok(1usize << octave)
}

fn check_octave_count(octave_count: u32) -> Result<(), NoiseError> {
    if octave_count == 0 {
        return Err(NoiseError::InvalidOctaveCount(octave_count));
    }
    if octave_count > MAX_OCTAVES {
        return Err(NoiseError::OctaveTooLarge(octave_count - 1));
    }
    Ok(())
}

//! Procedural globe surface.
//!
//! A small equirectangular heightmap sampled from fractal noise on the unit
//! sphere (sampling in 3D keeps the date line seamless), plus the terrain
//! color ramp. Generated once at startup; purely decorative backdrop for the
//! event markers.

use noise::{NoiseFn, Perlin, Seedable};

const OCTAVES: u32 = 5;
const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.1;
const BASE_FREQUENCY: f64 = 1.6;
/// Fraction of the height range below sea level.
const SEA_BIAS: f64 = 0.12;

/// Fractal Brownian motion over a 3D point.
fn fbm(noise: &Perlin, x: f64, y: f64, z: f64) -> f64 {
    let mut amplitude = 1.0;
    let mut frequency = BASE_FREQUENCY;
    let mut total = 0.0;
    let mut max_amplitude = 0.0;
    for _ in 0..OCTAVES {
        total += noise.get([x * frequency, y * frequency, z * frequency]) * amplitude;
        max_amplitude += amplitude;
        amplitude *= PERSISTENCE;
        frequency *= LACUNARITY;
    }
    total / max_amplitude
}

/// Equirectangular height grid over the full sphere.
pub struct Surface {
    width: usize,
    height: usize,
    /// Meters above sea level, negative under water.
    heights: Vec<f32>,
}

impl Surface {
    pub fn generate(width: usize, height: usize, seed: u64) -> Self {
        let noise = Perlin::new(1).set_seed(seed as u32);
        let mut heights = Vec::with_capacity(width * height);
        for row in 0..height {
            // Row center latitude, +pi/2 at the top.
            let lat = std::f64::consts::FRAC_PI_2
                - (row as f64 + 0.5) / height as f64 * std::f64::consts::PI;
            for col in 0..width {
                let lon = (col as f64 + 0.5) / width as f64 * std::f64::consts::TAU
                    - std::f64::consts::PI;
                let (x, y, z) = (
                    lat.cos() * lon.sin(),
                    lat.sin(),
                    lat.cos() * lon.cos(),
                );
                let sample = fbm(&noise, x, y, z) - SEA_BIAS;
                heights.push((sample * 900.0) as f32);
            }
        }
        Surface {
            width,
            height,
            heights,
        }
    }

    /// Height at a geographic point, radians. Longitude wraps; latitude is
    /// clamped at the poles.
    pub fn height_at(&self, lon: f64, lat: f64) -> f32 {
        let col = ((lon + std::f64::consts::PI) / std::f64::consts::TAU * self.width as f64)
            .floor() as i64;
        let col = col.rem_euclid(self.width as i64) as usize;
        let row = ((std::f64::consts::FRAC_PI_2 - lat) / std::f64::consts::PI
            * self.height as f64)
            .floor() as i64;
        let row = row.clamp(0, self.height as i64 - 1) as usize;
        self.heights[row * self.width + col]
    }

    pub fn color_at(&self, lon: f64, lat: f64) -> [u8; 3] {
        terrain_color(self.height_at(lon, lat))
    }
}

/// Terrain color ramp by height in meters.
pub fn terrain_color(height: f32) -> [u8; 3] {
    if height < -400.0 {
        [16, 34, 70] // Deep ocean
    } else if height < -80.0 {
        [26, 52, 104] // Ocean
    } else if height < 0.0 {
        [52, 88, 134] // Shallow water
    } else if height < 12.0 {
        [198, 180, 134] // Beach
    } else if height < 90.0 {
        [76, 150, 60] // Lowland
    } else if height < 220.0 {
        [52, 116, 52] // Forest
    } else if height < 380.0 {
        [124, 116, 90] // Highland
    } else if height < 560.0 {
        [110, 100, 94] // Mountain
    } else {
        [236, 238, 242] // Snow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_deterministic_for_seed() {
        let a = Surface::generate(64, 32, 99);
        let b = Surface::generate(64, 32, 99);
        assert_eq!(a.heights, b.heights);
        let c = Surface::generate(64, 32, 100);
        assert_ne!(a.heights, c.heights);
    }

    #[test]
    fn test_longitude_wraps() {
        let surface = Surface::generate(64, 32, 5);
        let left = surface.height_at(-PI + 1e-9, 0.2);
        let wrapped = surface.height_at(PI + 1e-9, 0.2);
        assert_eq!(left, wrapped);
    }

    #[test]
    fn test_poles_clamped() {
        let surface = Surface::generate(64, 32, 5);
        // No panic at or past the poles.
        surface.height_at(0.0, PI / 2.0);
        surface.height_at(0.0, -PI / 2.0 - 0.1);
    }

    #[test]
    fn test_has_land_and_sea() {
        let surface = Surface::generate(128, 64, 11);
        let above = surface.heights.iter().filter(|&&h| h > 0.0).count();
        let below = surface.heights.iter().filter(|&&h| h < 0.0).count();
        assert!(above > 0);
        assert!(below > 0);
    }
}

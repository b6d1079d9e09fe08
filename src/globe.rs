//! Orthographic globe rendering.
//!
//! Projects the surface heightmap onto a lit sphere at a given orientation
//! and overlays event markers and comet streaks. The same math backs both
//! presentation surfaces; the pixel viewer uses the image directly and the
//! terminal explorer downsamples it into colored cells.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::ambient::Comet;
use crate::surface::Surface;

const SPACE_COLOR: [u8; 3] = [5, 5, 15];
const AMBIENT_LIGHT: f64 = 0.3;

/// An event marker to draw on the sphere.
#[derive(Clone, Copy, Debug)]
pub struct Marker {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub color: [u8; 3],
    /// The currently selected event gets a ring and a larger dot.
    pub emphasized: bool,
}

/// Project a geographic point through the current orientation.
///
/// Returns view-space (x, y, depth) on the unit sphere; the point is on the
/// visible hemisphere when depth > 0. `tilt` and `spin` are the animator's
/// current angles.
pub fn project(lon: f64, lat: f64, tilt: f64, spin: f64) -> (f64, f64, f64) {
    let px = lat.cos() * lon.sin();
    let py = lat.sin();
    let pz = lat.cos() * lon.cos();

    // Spin about Y, then tilt about X; inverse order of the per-pixel
    // unprojection below.
    let (sin_r, cos_r) = spin.sin_cos();
    let x1 = px * cos_r + pz * sin_r;
    let z1 = -px * sin_r + pz * cos_r;

    let (sin_t, cos_t) = tilt.sin_cos();
    let y2 = py * cos_t + z1 * sin_t;
    let z2 = -py * sin_t + z1 * cos_t;

    (x1, y2, z2)
}

/// Render the globe into an RGB image of `width` x `height` pixels.
pub fn render_globe(
    surface: &Surface,
    tilt: f64,
    spin: f64,
    markers: &[Marker],
    comets: &[Comet],
    now: f64,
    width: usize,
    height: usize,
) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);
    let size = width.min(height);
    let radius = size as f64 / 2.0 - 2.0;
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let light = normalize(1.0, 1.0, 0.8);
    let (sin_t, cos_t) = tilt.sin_cos();
    let (sin_r, cos_r) = spin.sin_cos();

    for py in 0..height {
        for px in 0..width {
            let x = (px as f64 - center_x) / radius;
            let y = (center_y - py as f64) / radius;
            let r_squared = x * x + y * y;
            if r_squared > 1.0 {
                img.put_pixel(px as u32, py as u32, Rgb(SPACE_COLOR));
                continue;
            }

            // Point on the view sphere, then inverse tilt and inverse spin
            // back to the surface frame.
            let z = (1.0 - r_squared).sqrt();
            let y2 = y * cos_t - z * sin_t;
            let z2 = y * sin_t + z * cos_t;
            let x3 = x * cos_r - z2 * sin_r;
            let z3 = x * sin_r + z2 * cos_r;

            let lat = y2.asin();
            let lon = x3.atan2(z3);

            let base = surface.color_at(lon, lat);

            // Lambert shading on the view-space normal.
            let diffuse = (x * light.0 + y * light.1 + z * light.2).max(0.0);
            let intensity = AMBIENT_LIGHT + (1.0 - AMBIENT_LIGHT) * diffuse;
            let shaded = [
                (base[0] as f64 * intensity) as u8,
                (base[1] as f64 * intensity) as u8,
                (base[2] as f64 * intensity) as u8,
            ];
            img.put_pixel(px as u32, py as u32, Rgb(shaded));
        }
    }

    for comet in comets {
        draw_comet(&mut img, comet, now, tilt, spin, radius, center_x, center_y);
    }
    for marker in markers {
        draw_marker(&mut img, marker, tilt, spin, radius, center_x, center_y);
    }

    img
}

fn draw_marker(
    img: &mut RgbImage,
    marker: &Marker,
    tilt: f64,
    spin: f64,
    radius: f64,
    center_x: f64,
    center_y: f64,
) {
    let (x, y, depth) = project(
        marker.longitude_deg.to_radians(),
        marker.latitude_deg.to_radians(),
        tilt,
        spin,
    );
    if depth <= 0.02 {
        return;
    }
    let sx = center_x + x * radius;
    let sy = center_y - y * radius;
    let dot = if marker.emphasized {
        (radius / 28.0).max(3.0)
    } else {
        (radius / 48.0).max(2.0)
    };
    fill_disc(img, sx, sy, dot, marker.color);
    if marker.emphasized {
        draw_ring(img, sx, sy, dot + 2.0, [255, 255, 255]);
    }
}

fn draw_comet(
    img: &mut RgbImage,
    comet: &Comet,
    now: f64,
    tilt: f64,
    spin: f64,
    radius: f64,
    center_x: f64,
    center_y: f64,
) {
    let (x, y, depth) = project(
        comet.longitude.to_radians(),
        comet.latitude.to_radians(),
        tilt,
        spin,
    );
    if depth <= 0.02 {
        return;
    }
    let sx = center_x + x * radius;
    let sy = center_y - y * radius;
    // Fade in then out over the comet's life.
    let age = comet.age_fraction(now);
    let brightness = (1.0 - (2.0 * age - 1.0).abs()).clamp(0.0, 1.0);
    let level = (140.0 + 115.0 * brightness) as u8;
    let color = [level, level, 255];
    let streak = radius / 18.0;
    let (dx, dy) = (comet.heading.cos(), comet.heading.sin());
    let steps = streak as usize + 1;
    for i in 0..steps {
        let t = i as f64 / steps as f64;
        put_pixel_checked(img, sx - dx * streak * t, sy - dy * streak * t, color);
    }
}

fn fill_disc(img: &mut RgbImage, cx: f64, cy: f64, r: f64, color: [u8; 3]) {
    let reach = r.ceil() as i64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if (dx * dx + dy * dy) as f64 <= r * r {
                put_pixel_checked(img, cx + dx as f64, cy + dy as f64, color);
            }
        }
    }
}

fn draw_ring(img: &mut RgbImage, cx: f64, cy: f64, r: f64, color: [u8; 3]) {
    let steps = (r * 8.0) as usize + 8;
    for i in 0..steps {
        let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
        put_pixel_checked(img, cx + r * angle.cos(), cy + r * angle.sin(), color);
    }
}

fn put_pixel_checked(img: &mut RgbImage, x: f64, y: f64, color: [u8; 3]) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, Rgb(color));
    }
}

fn normalize(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let len = (x * x + y * y + z * z).sqrt();
    (x / len, y / len, z / len)
}

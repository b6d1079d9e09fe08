//! Interactive pixel viewer.
//!
//! A minifb window rendering the globe at full pixel resolution. Arrow keys
//! navigate the timeline, space skips the travel effect; the window title
//! carries the year readout and event caption.

use std::error::Error;
use std::time::Instant;

use minifb::{Key, Window, WindowOptions};

use crate::engine::Engine;
use crate::globe::{render_globe, Marker};
use crate::surface::Surface;

pub fn run_viewer(
    mut engine: Engine,
    surface: Surface,
    window_size: usize,
) -> Result<(), Box<dyn Error>> {
    let mut window = Window::new(
        "chronoglobe",
        window_size,
        window_size,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    let started = Instant::now();
    let mut last_now = 0.0;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = started.elapsed().as_secs_f64();
        let dt = now - last_now;
        last_now = now;

        if window.is_key_pressed(Key::Left, minifb::KeyRepeat::No) {
            engine.select_prev(now);
        }
        if window.is_key_pressed(Key::Right, minifb::KeyRepeat::No) {
            engine.select_next(now);
        }
        if window.is_key_pressed(Key::Space, minifb::KeyRepeat::No) {
            engine.skip_transition(now);
        }
        if window.is_key_pressed(Key::N, minifb::KeyRepeat::No) {
            let enabled = !engine.narration_enabled();
            engine.set_narration_enabled(enabled, now);
        }

        engine.tick(now, dt);

        let (tilt, spin) = engine.orientation();
        let markers: Vec<Marker> = engine
            .timeline()
            .events()
            .iter()
            .map(|event| Marker {
                longitude_deg: event.longitude,
                latitude_deg: event.latitude,
                color: event.accent_color,
                emphasized: event.index == engine.selection().current_index,
            })
            .collect();
        let img = render_globe(
            &surface,
            tilt,
            spin,
            &markers,
            engine.comets(),
            now,
            window_size,
            window_size,
        );
        let buffer: Vec<u32> = img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        window.set_title(&title_line(&engine, now));
        window.update_with_buffer(&buffer, window_size, window_size)?;
    }

    engine.teardown();
    Ok(())
}

fn title_line(engine: &Engine, now: f64) -> String {
    let event = engine.current_event();
    let speech = if engine.is_speaking() { "  ♪" } else { "" };
    if engine.is_transitioning() {
        format!("chronoglobe — {} …", engine.displayed_year(now))
    } else {
        format!(
            "chronoglobe — {} · {} · {}{}",
            event.year, event.title, event.location, speech
        )
    }
}

//! Frame loops for the game and the editor
//!
//! One frame is: drain input, advance one tick, draw. Loops end when the
//! event source asks to quit.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::editor::Editor;
use crate::persistence::MapError;
use crate::platform::{EventSource, FrameThrottle, GameControls};
use crate::renderer::{AssetTable, Color, Surface, render_game, screenshake_offset};
use crate::settings::Settings;
use crate::sim::actor::Actor;
use crate::sim::state::GameState;
use crate::sim::tick::tick;

/// Outcome of a game session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSummary {
    pub ticks: u64,
    pub deaths: u32,
    /// Presentation offset of the last frame, in window pixels
    pub shake: Vec2,
}

/// Play until the event source quits
pub fn run_game<S: Surface>(
    state: &mut GameState,
    display: &mut S,
    assets: &AssetTable<S::Image>,
    events: &mut impl EventSource,
    settings: &Settings,
    mut throttle: Option<&mut FrameThrottle>,
) -> GameSummary {
    let mut controls = GameControls::new();
    // Shake draws from its own stream so presentation never changes the simulation
    let mut shake_rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(1));
    let mut summary = GameSummary {
        ticks: 0,
        deaths: 0,
        shake: Vec2::ZERO,
    };

    loop {
        for event in events.poll() {
            controls.handle(event);
        }
        if controls.quit_requested() {
            break;
        }

        let was_dead = state.is_dead();
        tick(state, &controls.take_input());
        summary.ticks += 1;
        if state.is_dead() && !was_dead {
            summary.deaths += 1;
        }

        display.clear(Color::BLACK);
        render_game(display, assets, state);
        let magnitude = settings.shake_magnitude(state.effects.screenshake);
        summary.shake = screenshake_offset(&mut shake_rng, magnitude);

        if state.time_ticks % settings.tick_rate.max(1) as u64 == 0 {
            log::debug!(
                "t={} player={:?} enemies={} projectiles={}",
                state.time_ticks,
                state.player.body().pos,
                state.enemies.len(),
                state.effects.projectiles.len()
            );
        }
        if let Some(throttle) = throttle.as_deref_mut() {
            throttle.wait();
        }
    }

    log::info!(
        "Finished level {} after {} ticks: player at {:?}, {} enemies left, {} deaths",
        state.level_id,
        summary.ticks,
        state.player.body().pos,
        state.enemies.len(),
        summary.deaths
    );
    summary
}

/// Edit until the event source quits, then save the map. Returns the number
/// of frames drawn.
pub fn run_editor<S: Surface>(
    editor: &mut Editor,
    display: &mut S,
    assets: &AssetTable<S::Image>,
    events: &mut impl EventSource,
    mut throttle: Option<&mut FrameThrottle>,
) -> Result<u64, MapError> {
    let mut frames = 0u64;
    loop {
        for event in events.poll() {
            editor.handle_event(event)?;
        }
        if editor.quit_requested() {
            break;
        }

        editor.update();
        display.clear(Color::BLACK);
        editor.render(display, assets);
        frames += 1;
        if let Some(throttle) = throttle.as_deref_mut() {
            throttle.wait();
        }
    }

    editor.save()?;
    log::info!("Editor session on {} ended after {frames} frames", editor.map_path().display());
    Ok(frames)
}

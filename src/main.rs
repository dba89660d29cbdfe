//! Ninja Platformer entry point
//!
//! Runs the game or the level editor against a software display. Input comes
//! from a JSON event script (or a built-in demo for the game), so sessions
//! are reproducible and need no window.
//!
//! ```text
//! ninja-platformer play [--script events.json] [--realtime] [--screenshot out.png]
//! ninja-platformer edit [map.json] [--script events.json] [--screenshot out.png]
//! ninja-platformer autotile <map.json>
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use glam::{UVec2, Vec2};

use ninja_platformer::platform::{Event, FrameThrottle, Key, ScriptedEvents};
use ninja_platformer::renderer::{AssetTable, Canvas, load_picture};
use ninja_platformer::session::{run_editor, run_game};
use ninja_platformer::sim::{GameState, Tilemap};
use ninja_platformer::{Editor, Settings};

#[derive(Debug, Parser)]
#[command(name = "ninja-platformer", about = "Tile platformer and level editor")]
struct Cli {
    /// Settings file; defaults are used when it does not exist
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play the starting level
    Play {
        /// Input script; the built-in demo runs when omitted
        #[arg(long)]
        script: Option<PathBuf>,
        /// Pace frames at the configured tick rate
        #[arg(long)]
        realtime: bool,
        /// Write the last presented frame to this PNG
        #[arg(long)]
        screenshot: Option<PathBuf>,
    },
    /// Edit a map, saving it when the session ends
    Edit {
        /// Map to edit; defaults to `editor_map` from the settings
        map: Option<PathBuf>,
        #[arg(long)]
        script: Option<PathBuf>,
        #[arg(long)]
        screenshot: Option<PathBuf>,
    },
    /// Autotile a map file in place
    Autotile { map: PathBuf },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)?;

    match cli.command.unwrap_or(Command::Play {
        script: None,
        realtime: false,
        screenshot: None,
    }) {
        Command::Play {
            script,
            realtime,
            screenshot,
        } => {
            let events = match script {
                Some(path) => ScriptedEvents::load(&path)?,
                None => demo_script(),
            };
            play(&settings, events, realtime, screenshot.as_deref())
        }
        Command::Edit { map, script, screenshot } => {
            let events = match script {
                Some(path) => ScriptedEvents::load(&path)?,
                None => ScriptedEvents::new(),
            };
            let map = map.unwrap_or_else(|| settings.editor_map.clone());
            edit(&settings, &map, events, screenshot.as_deref())
        }
        Command::Autotile { map } => autotile(&map),
    }
}

/// Load a map, autotile it and write it back
fn autotile(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut map = Tilemap::load(path)?;
    let changed = map.autotile();
    map.save(path)?;
    log::info!("Autotiled {} ({changed} tiles changed)", path.display());
    Ok(())
}

/// Walk right, jump, dash, then walk back
fn demo_script() -> ScriptedEvents {
    let mut events = ScriptedEvents::new();
    events
        .idle(30)
        .push_frame(vec![Event::KeyDown(Key::D)])
        .idle(60)
        .push_frame(vec![Event::KeyDown(Key::Space)])
        .idle(30)
        .push_frame(vec![Event::KeyDown(Key::X)])
        .idle(60)
        .push_frame(vec![Event::KeyUp(Key::D), Event::KeyDown(Key::A)])
        .idle(90)
        .push_frame(vec![Event::KeyUp(Key::A)])
        .idle(60);
    events
}

fn play(
    settings: &Settings,
    mut events: ScriptedEvents,
    realtime: bool,
    screenshot: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let assets = AssetTable::load_game(&settings.images_dir, load_picture)?;

    let level_path = settings.level_path(&settings.starting_level);
    let map = Tilemap::load_or_empty(&level_path, settings.tile_size)?;

    let config = settings.game_config(assets.clouds.len());
    let mut state = GameState::new(settings.seed, assets.library(), config);
    state.load_level(&settings.starting_level, map);

    let mut display = Canvas::new(settings.display_width, settings.display_height);
    let mut throttle = realtime.then(|| FrameThrottle::new(settings.tick_rate));
    let summary = run_game(&mut state, &mut display, &assets, &mut events, settings, throttle.as_mut());

    if let Some(path) = screenshot {
        let window = UVec2::new(settings.window_width, settings.window_height);
        display.present(summary.shake, window).save(path)?;
        log::info!("Saved screenshot to {}", path.display());
    }
    Ok(())
}

fn edit(
    settings: &Settings,
    map_path: &Path,
    mut events: ScriptedEvents,
    screenshot: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let assets = AssetTable::load_editor(&settings.images_dir, load_picture)?;
    let map = Tilemap::load_or_empty(map_path, settings.tile_size)?;
    let mut editor = Editor::with_assets(map, map_path, &assets, settings.render_scale)?;

    let mut display = Canvas::new(settings.editor_display_width, settings.editor_display_height);
    let mut throttle = FrameThrottle::new(settings.tick_rate);
    run_editor(&mut editor, &mut display, &assets, &mut events, Some(&mut throttle))?;

    if let Some(path) = screenshot {
        let window = UVec2::new(settings.editor_window_width, settings.editor_window_height);
        display.present(Vec2::ZERO, window).save(path)?;
        log::info!("Saved screenshot to {}", path.display());
    }
    Ok(())
}

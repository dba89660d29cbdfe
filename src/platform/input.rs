//! Key bindings for the game
//!
//! | Keys      | Character | Action                               |
//! |-----------|-----------|--------------------------------------|
//! | A / D     | player    | move                                 |
//! | Space / X | player    | jump / dash                          |
//! | ← / →     | Matt      | move                                 |
//! | ↑ / ↓     | Matt      | jump / angry while held              |
//! | J / L     | Potts     | move                                 |
//! | I         | Potts     | jump                                 |
//! | M / K     | Potts     | milk / surprised while held          |

use super::{Event, Key};
use crate::sim::tick::TickInput;

/// Folds input events into the per-tick command set
#[derive(Debug, Clone, Default)]
pub struct GameControls {
    input: TickInput,
    quit: bool,
}

impl GameControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Quit | Event::KeyDown(Key::Escape) => self.quit = true,
            Event::KeyDown(key) => self.key(key, true),
            Event::KeyUp(key) => self.key(key, false),
            _ => {}
        }
    }

    fn key(&mut self, key: Key, down: bool) {
        let input = &mut self.input;
        match key {
            Key::A => input.player.left = down,
            Key::D => input.player.right = down,
            Key::Space if down => input.jump = true,
            Key::X if down => input.dash = true,
            Key::Left => input.matt.left = down,
            Key::Right => input.matt.right = down,
            Key::Up if down => input.matt_jump = true,
            Key::Down => input.matt_angry = down,
            Key::J => input.potts.left = down,
            Key::L => input.potts.right = down,
            Key::I if down => input.potts_jump = true,
            Key::M => input.potts_milk = down,
            Key::K => input.potts_surprised = down,
            _ => {}
        }
    }

    /// Commands for the next tick; one-shot presses are consumed
    pub fn take_input(&mut self) -> TickInput {
        let input = self.input.clone();
        self.input.jump = false;
        self.input.dash = false;
        self.input.matt_jump = false;
        self.input.potts_jump = false;
        input
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_persist_presses_do_not() {
        let mut controls = GameControls::new();
        controls.handle(Event::KeyDown(Key::D));
        controls.handle(Event::KeyDown(Key::Space));
        controls.handle(Event::KeyDown(Key::M));

        let first = controls.take_input();
        assert!(first.player.right);
        assert!(first.jump);
        assert!(first.potts_milk);

        let second = controls.take_input();
        assert!(second.player.right);
        assert!(!second.jump);
        assert!(second.potts_milk);

        controls.handle(Event::KeyUp(Key::D));
        controls.handle(Event::KeyUp(Key::M));
        let third = controls.take_input();
        assert!(!third.player.right);
        assert!(!third.potts_milk);
    }

    #[test]
    fn test_companion_bindings() {
        let mut controls = GameControls::new();
        for key in [Key::Left, Key::Up, Key::Down, Key::L, Key::I, Key::K, Key::X] {
            controls.handle(Event::KeyDown(key));
        }
        let input = controls.take_input();
        assert!(input.matt.left && input.matt_jump && input.matt_angry);
        assert!(input.potts.right && input.potts_jump && input.potts_surprised);
        assert!(input.dash);
        assert_eq!(input.matt.axis(), -1.0);
        assert_eq!(input.potts.axis(), 1.0);
    }

    #[test]
    fn test_quit() {
        let mut controls = GameControls::new();
        assert!(!controls.quit_requested());
        controls.handle(Event::Quit);
        assert!(controls.quit_requested());
    }
}

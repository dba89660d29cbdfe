//! Frame-counted sprite animation
//!
//! An animation only tracks which image to show; the images themselves stay
//! in the asset table and are looked up by key when drawing.

use std::collections::HashMap;

/// Timing of an animation: frame count, ticks per frame, looping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    pub frames: usize,
    pub image_duration: u32,
    pub looping: bool,
}

impl AnimationSpec {
    /// Single image, shown forever
    pub const STILL: AnimationSpec = AnimationSpec {
        frames: 1,
        image_duration: 1,
        looping: true,
    };

    pub fn new(frames: usize, image_duration: u32, looping: bool) -> Self {
        Self {
            frames,
            image_duration,
            looping,
        }
    }

    /// Length in ticks
    pub fn total_ticks(&self) -> u32 {
        (self.frames as u32 * self.image_duration).max(1)
    }
}

/// Animation keys with their per-image duration and loop flag
pub const ANIMATIONS: &[(&str, u32, bool)] = &[
    ("enemy/idle", 6, true),
    ("enemy/run", 4, true),
    ("matt/idle", 6, true),
    ("matt/walk", 6, true),
    ("matt/angry", 6, false),
    ("matt/jump", 5, false),
    ("potts/idle", 5, true),
    ("potts/walk", 5, true),
    ("potts/surprised", 5, false),
    ("potts/jump", 5, false),
    ("potts/milk", 5, false),
    ("player/idle", 6, true),
    ("player/run", 4, true),
    ("player/jump", 5, true),
    ("player/slide", 5, true),
    ("player/wall_slide", 5, true),
    ("particle/leaf", 20, false),
    ("particle/particle", 6, false),
];

/// Playback state of one animation
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    spec: AnimationSpec,
    frame: u32,
    done: bool,
}

impl Animation {
    pub fn new(spec: AnimationSpec) -> Self {
        Self::starting_at(spec, 0)
    }

    /// Start partway through, e.g. to desynchronize particles
    pub fn starting_at(spec: AnimationSpec, frame: u32) -> Self {
        Self {
            spec,
            frame: frame.min(spec.total_ticks() - 1),
            done: false,
        }
    }

    /// Advance one tick
    pub fn update(&mut self) {
        let total = self.spec.total_ticks();
        if self.spec.looping {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    /// Index of the image to draw
    pub fn image_index(&self) -> usize {
        let index = (self.frame / self.spec.image_duration.max(1)) as usize;
        index.min(self.spec.frames.saturating_sub(1))
    }

    /// Ticks elapsed (wrapping for looping animations)
    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// A one-shot animation has reached its last tick
    #[inline]
    pub fn done(&self) -> bool {
        self.done
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }
}

/// Animation timings by key (`"player/run"`, `"particle/leaf"`, ...)
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    specs: HashMap<String, AnimationSpec>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library of every standard animation, with frame counts supplied by
    /// the caller (usually the number of images found on disk)
    pub fn standard(mut frame_count: impl FnMut(&str) -> usize) -> Self {
        let mut library = Self::new();
        for (key, duration, looping) in ANIMATIONS {
            library.insert(key, AnimationSpec::new(frame_count(key), *duration, *looping));
        }
        library
    }

    pub fn insert(&mut self, key: &str, spec: AnimationSpec) {
        self.specs.insert(key.to_string(), spec);
    }

    pub fn get(&self, key: &str) -> Option<AnimationSpec> {
        self.specs.get(key).copied()
    }

    /// Fresh playback of `key`; unknown keys play a still image
    pub fn start(&self, key: &str) -> Animation {
        match self.get(key) {
            Some(spec) => Animation::new(spec),
            None => {
                log::warn!("Unknown animation {key:?}, using a still frame");
                Animation::new(AnimationSpec::STILL)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_wraps() {
        let mut anim = Animation::new(AnimationSpec::new(3, 2, true));
        let mut indices = Vec::new();
        for _ in 0..7 {
            indices.push(anim.image_index());
            anim.update();
        }
        assert_eq!(indices, vec![0, 0, 1, 1, 2, 2, 0]);
        assert!(!anim.done());
    }

    #[test]
    fn test_one_shot_finishes_and_holds() {
        let mut anim = Animation::new(AnimationSpec::new(2, 3, false));
        for _ in 0..4 {
            anim.update();
            assert!(!anim.done());
        }
        anim.update();
        assert!(anim.done());
        assert_eq!(anim.frame(), 5);
        anim.update();
        assert_eq!(anim.frame(), 5);
        assert_eq!(anim.image_index(), 1);
    }

    #[test]
    fn test_starting_frame_is_clamped() {
        let anim = Animation::starting_at(AnimationSpec::new(4, 6, false), 100);
        assert_eq!(anim.frame(), 23);
        assert_eq!(anim.image_index(), 3);
    }

    #[test]
    fn test_library_standard_and_unknown() {
        let library = AnimationLibrary::standard(|key| if key.starts_with("player") { 4 } else { 2 });
        assert_eq!(library.len(), ANIMATIONS.len());
        assert_eq!(library.get("player/run"), Some(AnimationSpec::new(4, 4, true)));
        assert_eq!(library.get("matt/angry"), Some(AnimationSpec::new(2, 6, false)));

        let still = library.start("ghost/idle");
        assert_eq!(still.spec(), AnimationSpec::STILL);
    }
}

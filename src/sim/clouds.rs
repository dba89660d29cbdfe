//! Parallax cloud layer
//!
//! Clouds drift right forever; drawing wraps their position around the
//! display so a handful of clouds fill an unbounded sky.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Spawn range; wrapping makes the exact extent irrelevant
const SPAWN_EXTENT: f32 = 99_999.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    /// Index into the cloud images
    pub image: usize,
    pub speed: f32,
    /// Parallax factor: 0 stays fixed on screen, 1 moves with the world
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Top-left corner on a `surface`-sized display for an `image`-sized sprite
    pub fn render_pos(&self, offset: Vec2, surface: Vec2, image: Vec2) -> Vec2 {
        let pos = self.pos - offset * self.depth;
        Vec2::new(
            pos.x.rem_euclid(surface.x + image.x) - image.x,
            pos.y.rem_euclid(surface.y + image.y) - image.y,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clouds {
    clouds: Vec<Cloud>,
}

impl Clouds {
    /// `count` random clouds choosing among `image_count` images, far ones first
    pub fn new(rng: &mut Pcg32, image_count: usize, count: usize) -> Self {
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(
                    rng.random::<f32>() * SPAWN_EXTENT,
                    rng.random::<f32>() * SPAWN_EXTENT,
                ),
                image: if image_count == 0 {
                    0
                } else {
                    rng.random_range(0..image_count)
                },
                speed: rng.random::<f32>() * 0.05 + 0.05,
                depth: rng.random::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }

    /// Clouds in draw order (farthest first)
    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_clouds_sorted_by_depth_within_ranges() {
        let mut rng = Pcg32::seed_from_u64(3);
        let clouds = Clouds::new(&mut rng, 2, 16);
        assert_eq!(clouds.len(), 16);
        let depths: Vec<f32> = clouds.iter().map(|c| c.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        for cloud in clouds.iter() {
            assert!((0.2..0.8).contains(&cloud.depth));
            assert!((0.05..0.1).contains(&cloud.speed));
            assert!(cloud.image < 2);
        }
    }

    #[test]
    fn test_render_pos_wraps() {
        let cloud = Cloud {
            pos: Vec2::new(-10.0, 500.0),
            image: 0,
            speed: 0.05,
            depth: 0.5,
        };
        let surface = Vec2::new(100.0, 100.0);
        let image = Vec2::new(20.0, 10.0);

        let pos = cloud.render_pos(Vec2::new(20.0, 0.0), surface, image);
        // x: -10 - 10 = -20 wraps to 100 in [0, 120), minus 20
        assert_eq!(pos.x, 80.0);
        // y: 500 mod 110 = 60, minus 10
        assert_eq!(pos.y, 50.0);
    }

    #[test]
    fn test_update_drifts_right() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut clouds = Clouds::new(&mut rng, 1, 4);
        let before: Vec<f32> = clouds.iter().map(|c| c.pos.x).collect();
        clouds.update();
        for (cloud, x) in clouds.iter().zip(before) {
            assert!(cloud.pos.x > x);
        }
    }
}

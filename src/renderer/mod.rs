//! Rendering module
//!
//! The game draws into a small software display that the platform scales up
//! for presentation. Drawing goes through the `Surface` trait so the same
//! compositor serves any backend that can blit images and fill polygons.

pub mod assets;
pub mod canvas;
pub mod compositor;

pub use assets::{AssetError, AssetTable};
pub use canvas::{Canvas, Picture, load_picture};
pub use compositor::{render_actor, render_game, render_tilemap, screenshake_offset, visible_cells};

use glam::Vec2;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// A loaded image
pub trait Sprite {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }
}

/// Something the compositor can draw onto
pub trait Surface {
    type Image: Sprite;

    /// Size in pixels
    fn size(&self) -> Vec2;

    /// Start a new frame
    fn clear(&mut self, color: Color);

    /// Draw `image` with its top-left corner at `dest`, mirrored horizontally
    /// when `flip` is set
    fn blit(&mut self, image: &Self::Image, dest: Vec2, flip: bool);

    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Draw a see-through copy of `image`; backends without blending draw it
    /// opaque
    fn blit_translucent(&mut self, image: &Self::Image, dest: Vec2, _alpha: u8) {
        self.blit(image, dest, false);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct TestImage {
        pub name: String,
        pub w: u32,
        pub h: u32,
    }

    impl TestImage {
        pub fn new(name: &str, w: u32, h: u32) -> Self {
            Self {
                name: name.to_string(),
                w,
                h,
            }
        }
    }

    impl Sprite for TestImage {
        fn width(&self) -> u32 {
            self.w
        }

        fn height(&self) -> u32 {
            self.h
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Blit { name: String, dest: Vec2, flip: bool },
        Translucent { name: String, dest: Vec2, alpha: u8 },
        Polygon { points: Vec<Vec2>, color: Color },
    }

    /// Surface that records every draw call
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub size: Vec2,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(w: f32, h: f32) -> Self {
            Self {
                size: Vec2::new(w, h),
                calls: Vec::new(),
            }
        }

        /// Names of blitted images, in draw order
        pub fn blitted(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Blit { name, .. } => Some(name.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        type Image = TestImage;

        fn size(&self) -> Vec2 {
            self.size
        }

        /// Keeps only the calls of the frame being drawn
        fn clear(&mut self, _color: Color) {
            self.calls.clear();
        }

        fn blit(&mut self, image: &TestImage, dest: Vec2, flip: bool) {
            self.calls.push(DrawCall::Blit {
                name: image.name.clone(),
                dest,
                flip,
            });
        }

        fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
            self.calls.push(DrawCall::Polygon {
                points: points.to_vec(),
                color,
            });
        }

        fn blit_translucent(&mut self, image: &TestImage, dest: Vec2, alpha: u8) {
            self.calls.push(DrawCall::Translucent {
                name: image.name.clone(),
                dest,
                alpha,
            });
        }
    }
}

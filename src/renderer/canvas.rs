//! Software surface backed by an RGBA image buffer
//!
//! The game draws into a small `Canvas`; `present` scales it up to the
//! window size and applies the screenshake offset in window pixels.

use std::path::Path;

use glam::{IVec2, UVec2, Vec2};
use image::imageops::{self, FilterType};
use image::{ImageReader, Rgba, RgbaImage};

use super::{AssetError, Color, Sprite, Surface};

/// Pure black is treated as transparent in sprite art
const COLOR_KEY: [u8; 3] = [0, 0, 0];

/// A decoded image
#[derive(Debug, Clone)]
pub struct Picture {
    pixels: RgbaImage,
}

impl Picture {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Make every color-key pixel fully transparent
    pub fn with_color_key(mut self) -> Self {
        for pixel in self.pixels.pixels_mut() {
            if pixel.0[..3] == COLOR_KEY {
                pixel.0[3] = 0;
            }
        }
        self
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl Sprite for Picture {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Decode an image file for the asset table
pub fn load_picture(path: &Path) -> Result<Picture, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|error| AssetError::Decode {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    Ok(Picture::new(decoded.to_rgba8()).with_color_key())
}

/// Off-screen display surface
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width.max(1), height.max(1), to_rgba(Color::BLACK)),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Scale the display to `window` and shift it by `shake` window pixels
    pub fn present(&self, shake: Vec2, window: UVec2) -> RgbaImage {
        let window = window.max(UVec2::ONE);
        let scaled = imageops::resize(&self.pixels, window.x, window.y, FilterType::Nearest);
        if shake == Vec2::ZERO {
            return scaled;
        }
        let mut screen = RgbaImage::from_pixel(window.x, window.y, to_rgba(Color::BLACK));
        let shift = shake.floor().as_ivec2();
        imageops::overlay(&mut screen, &scaled, shift.x as i64, shift.y as i64);
        screen
    }

    fn draw(&mut self, image: &Picture, dest: Vec2, flip: bool, alpha: u8) {
        let origin = dest.floor().as_ivec2();
        let width = image.width() as i32;
        for (sx, sy, source) in image.pixels.enumerate_pixels() {
            let src_alpha = (source.0[3] as u32 * alpha as u32 / 255) as u8;
            if src_alpha == 0 {
                continue;
            }
            let column = if flip { width - 1 - sx as i32 } else { sx as i32 };
            let target = origin + IVec2::new(column, sy as i32);
            if let Some(pixel) = self.pixel_mut(target) {
                blend(pixel, source, src_alpha);
            }
        }
    }

    fn pixel_mut(&mut self, at: IVec2) -> Option<&mut Rgba<u8>> {
        if at.x < 0 || at.y < 0 || at.x >= self.pixels.width() as i32 || at.y >= self.pixels.height() as i32 {
            return None;
        }
        Some(self.pixels.get_pixel_mut(at.x as u32, at.y as u32))
    }
}

impl Surface for Canvas {
    type Image = Picture;

    fn size(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let fill = to_rgba(color);
        for pixel in self.pixels.pixels_mut() {
            *pixel = fill;
        }
    }

    fn blit(&mut self, image: &Picture, dest: Vec2, flip: bool) {
        self.draw(image, dest, flip, 255);
    }

    fn blit_translucent(&mut self, image: &Picture, dest: Vec2, alpha: u8) {
        self.draw(image, dest, false, alpha);
    }

    /// Even-odd fill, sampled at pixel centers
    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = points
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let fill = to_rgba(color);
        for y in min.y.floor() as i32..=max.y.ceil() as i32 {
            for x in min.x.floor() as i32..=max.x.ceil() as i32 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !inside(points, center) {
                    continue;
                }
                if let Some(pixel) = self.pixel_mut(IVec2::new(x, y)) {
                    blend(pixel, &fill, color.a);
                }
            }
        }
    }
}

fn inside(points: &[Vec2], p: Vec2) -> bool {
    let mut hit = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            hit = !hit;
        }
        j = i;
    }
    hit
}

/// Source-over blend of `source` color at `alpha` onto `target`
fn blend(target: &mut Rgba<u8>, source: &Rgba<u8>, alpha: u8) {
    if alpha == 255 {
        *target = Rgba([source.0[0], source.0[1], source.0[2], 255]);
        return;
    }
    let a = alpha as u32;
    for channel in 0..3 {
        let mixed = (source.0[channel] as u32 * a + target.0[channel] as u32 * (255 - a)) / 255;
        target.0[channel] = mixed as u8;
    }
    target.0[3] = target.0[3].max(alpha);
}

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

//! Pixel masks for sprite collision.
//!
//! A mask records which pixels of a sprite are solid. Two sprites collide
//! when at least one solid pixel of each lands on the same playfield pixel.

use std::sync::Arc;

use glam::{IVec2, Vec2};

use crate::constants::{EXPLOSION_FRAME_COUNT, EXPLOSION_FRAME_SIZE, MASK_ALPHA_THRESHOLD};

/// Row-major grid of solid/transparent pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// A fully solid mask.
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask by evaluating `solid(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, solid: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(solid(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Build a mask from tightly packed RGBA8 pixels.
    /// Pixels missing from a short buffer count as transparent.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        Self::from_fn(width, height, |x, y| {
            let alpha_idx = ((y * width + x) * 4 + 3) as usize;
            rgba.get(alpha_idx)
                .is_some_and(|&alpha| alpha > MASK_ALPHA_THRESHOLD)
        })
    }

    /// Solid ellipse inscribed in the mask bounds.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let radii = Vec2::new(width as f32, height as f32) * 0.5;
        Self::from_fn(width, height, |x, y| {
            let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - radii) / radii;
            d.length_squared() <= 1.0
        })
    }

    /// Solid isosceles triangle with its apex at the top centre.
    pub fn triangle(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |x, y| {
            let half_span = (y as f32 + 0.5) / height as f32 * width as f32 * 0.5;
            ((x as f32 + 0.5) - width as f32 * 0.5).abs() <= half_span
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether the pixel at (x, y) is solid. Out-of-range pixels are not.
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Test for a shared solid pixel with `other` placed at `offset`
    /// relative to this mask's top-left corner.
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32)
                    && other.get((x - offset.x) as u32, (y - offset.y) as u32)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Return this mask rotated counter-clockwise (as seen on screen) by
    /// `degrees`, sized to the rotated bounding box. Sampling always reads
    /// from `self`, so repeated calls with a growing angle do not degrade.
    pub fn rotated(&self, degrees: f32) -> Mask {
        if degrees.rem_euclid(360.0) == 0.0 {
            return self.clone();
        }

        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        // Trim float noise so a quarter turn of a 3x3 mask stays 3x3.
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-4).ceil().max(1.0) as u32;
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-4).ceil().max(1.0) as u32;

        let src_center = Vec2::new(w, h) * 0.5;
        let out_center = Vec2::new(out_w as f32, out_h as f32) * 0.5;

        Mask::from_fn(out_w, out_h, |x, y| {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - out_center;
            let src = Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y) + src_center;
            if src.x < 0.0 || src.y < 0.0 {
                return false;
            }
            self.get(src.x as u32, src.y as u32)
        })
    }
}

/// Collision masks and draw sizes for every sprite the simulation spawns.
///
/// Masks are shared between all entities of a kind.
#[derive(Debug, Clone)]
pub struct SpriteShapes {
    pub ship: Arc<Mask>,
    pub laser: Arc<Mask>,
    pub meteor: Arc<Mask>,
    pub star_size: Vec2,
    pub explosion_frame_size: Vec2,
    pub explosion_frame_count: usize,
}

impl Default for SpriteShapes {
    /// Procedural stand-ins roughly matching the shipped artwork.
    fn default() -> Self {
        Self {
            ship: Arc::new(Mask::triangle(64, 56)),
            laser: Arc::new(Mask::filled(8, 48)),
            meteor: Arc::new(Mask::ellipse(96, 84)),
            star_size: Vec2::splat(16.0),
            explosion_frame_size: Vec2::splat(EXPLOSION_FRAME_SIZE as f32),
            explosion_frame_count: EXPLOSION_FRAME_COUNT,
        }
    }
}

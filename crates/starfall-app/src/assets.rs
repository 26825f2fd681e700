//! Asset loading: sprite images, the explosion sheet, the HUD font, and
//! sound files.
//!
//! Everything is read eagerly at startup. Images are decoded to RGBA here so
//! collision masks can be derived from their alpha channel; fonts and sounds
//! stay as raw bytes for the front-end to decode.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use image::RgbaImage;

use starfall_core::constants::{EXPLOSION_FRAME_COUNT, EXPLOSION_FRAME_SIZE, EXPLOSION_SHEET_GRID};
use starfall_core::mask::{Mask, SpriteShapes};

/// Asset loading errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image bytes could not be decoded
    #[error("Decode error in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Sprite sheet too small for the requested frames
    #[error("Sprite sheet is {width}x{height}, too small for {frames} frames of {frame_width}x{frame_height}")]
    Sheet {
        width: u32,
        height: u32,
        frames: usize,
        frame_width: u32,
        frame_height: u32,
    },

    /// Font data rejected by the text renderer
    #[error("Font error in {name}: {message}")]
    Font { name: String, message: String },

    /// Sound data rejected by the audio backend
    #[error("Audio error in {name}: {message}")]
    Audio { name: String, message: String },
}

/// Decoded sprite images.
#[derive(Debug, Clone)]
pub struct SpriteImages {
    pub ship: RgbaImage,
    pub star: RgbaImage,
    pub meteor: RgbaImage,
    pub laser: RgbaImage,
    /// Explosion frames in playback order.
    pub explosion: Vec<RgbaImage>,
}

/// Encoded sound files.
#[derive(Debug, Clone)]
pub struct SoundBank {
    pub laser: Vec<u8>,
    pub explosion: Vec<u8>,
    pub damage: Vec<u8>,
    pub music: Vec<u8>,
}

/// Everything the game loads from disk.
#[derive(Debug, Clone)]
pub struct GameAssets {
    pub images: SpriteImages,
    /// TrueType HUD font.
    pub font: Vec<u8>,
    pub sounds: SoundBank,
}

impl GameAssets {
    /// Load the full asset set from `root` (the directory holding `images/`
    /// and `audio/`).
    pub fn load(root: &Path) -> Result<Self, AssetError> {
        let images_dir = root.join("images");
        let audio_dir = root.join("audio");

        let sheet = load_image(&images_dir.join("explosion.png"))?;
        let (rows, cols) = EXPLOSION_SHEET_GRID;
        let images = SpriteImages {
            ship: load_image(&images_dir.join("player.png"))?,
            star: load_image(&images_dir.join("star.png"))?,
            meteor: load_image(&images_dir.join("meteor.png"))?,
            laser: load_image(&images_dir.join("laser.png"))?,
            explosion: slice_sheet(
                &sheet,
                EXPLOSION_FRAME_COUNT,
                (rows, cols),
                (EXPLOSION_FRAME_SIZE, EXPLOSION_FRAME_SIZE),
            )?,
        };

        let font = read_bytes(&images_dir.join("Oxanium-Bold.ttf"))?;
        let sounds = SoundBank {
            laser: read_bytes(&audio_dir.join("laser.wav"))?,
            explosion: read_bytes(&audio_dir.join("explosion.wav"))?,
            damage: read_bytes(&audio_dir.join("damage.ogg"))?,
            music: read_bytes(&audio_dir.join("game_music.wav"))?,
        };

        log::info!("loaded assets from {}", root.display());
        Ok(Self {
            images,
            font,
            sounds,
        })
    }

    /// Collision masks and draw sizes derived from the loaded images.
    pub fn shapes(&self) -> SpriteShapes {
        let images = &self.images;
        let explosion_frame_size = images
            .explosion
            .first()
            .map_or(Vec2::splat(EXPLOSION_FRAME_SIZE as f32), image_size);
        SpriteShapes {
            ship: Arc::new(mask_of(&images.ship)),
            laser: Arc::new(mask_of(&images.laser)),
            meteor: Arc::new(mask_of(&images.meteor)),
            star_size: image_size(&images.star),
            explosion_frame_size,
            explosion_frame_count: images.explosion.len(),
        }
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and decode an image file to RGBA8.
pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = read_bytes(path)?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgba8())
}

/// Cut `frames` cells of `frame_size` out of a sheet laid out as a
/// `(rows, cols)` grid, row-major from the top-left.
pub fn slice_sheet(
    sheet: &RgbaImage,
    frames: usize,
    grid: (u32, u32),
    frame_size: (u32, u32),
) -> Result<Vec<RgbaImage>, AssetError> {
    let (rows, cols) = grid;
    let (frame_width, frame_height) = frame_size;
    let fits = cols * frame_width <= sheet.width()
        && rows * frame_height <= sheet.height()
        && frames <= (rows * cols) as usize;
    if !fits {
        return Err(AssetError::Sheet {
            width: sheet.width(),
            height: sheet.height(),
            frames,
            frame_width,
            frame_height,
        });
    }

    let cells = (0..rows).flat_map(|row| (0..cols).map(move |col| (row, col)));
    Ok(cells
        .take(frames)
        .map(|(row, col)| {
            image::imageops::crop_imm(
                sheet,
                col * frame_width,
                row * frame_height,
                frame_width,
                frame_height,
            )
            .to_image()
        })
        .collect())
}

/// Pixel mask from the image's alpha channel.
pub fn mask_of(image: &RgbaImage) -> Mask {
    Mask::from_rgba(image.width(), image.height(), image.as_raw())
}

fn image_size(image: &RgbaImage) -> Vec2 {
    Vec2::new(image.width() as f32, image.height() as f32)
}

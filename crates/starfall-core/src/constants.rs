//! Simulation constants and tuning parameters.

// --- Playfield ---

/// Default playfield width in logical pixels.
pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 1280.0;

/// Default playfield height in logical pixels.
pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 720.0;

/// Frame-rate cap used when settings do not provide one.
pub const DEFAULT_FPS: u32 = 60;

/// Resolution selected by the "small" hotkey.
pub const SMALL_RESOLUTION: (u32, u32) = (720, 480);

/// Resolution selected by the "large" hotkey.
pub const LARGE_RESOLUTION: (u32, u32) = (1280, 720);

/// Background fill colour (RGB).
pub const BACKGROUND_COLOR: [u8; 3] = [58, 46, 63];

// --- Ship ---

/// Ship movement speed (px/s).
pub const SHIP_SPEED: f32 = 300.0;

/// Minimum time between two laser shots (ms).
pub const SHOOT_COOLDOWN_MS: u64 = 400;

// --- Laser ---

/// Laser travel speed, straight up (px/s).
pub const LASER_SPEED: f32 = 500.0;

// --- Meteors ---

/// Wall-clock interval between meteor spawns (ms).
pub const METEOR_SPAWN_INTERVAL_MS: u64 = 500;

/// Meteor speed range, inclusive (px/s).
pub const METEOR_SPEED_MIN: u32 = 50;
pub const METEOR_SPEED_MAX: u32 = 300;

/// Maximum horizontal drift of a meteor's direction before normalization.
pub const METEOR_DRIFT: f32 = 0.5;

/// Meteor spin magnitude range, inclusive (deg/s). Sign is a coin flip.
pub const METEOR_SPIN_MIN: u32 = 50;
pub const METEOR_SPIN_MAX: u32 = 100;

// --- Explosions ---

/// Number of frames in the explosion animation.
pub const EXPLOSION_FRAME_COUNT: usize = 21;

/// Explosion animation speed (frames per second).
pub const EXPLOSION_FRAME_RATE: f32 = 50.0;

/// Edge length of one square explosion frame (px).
pub const EXPLOSION_FRAME_SIZE: u32 = 50;

/// Explosion sheet layout (rows, columns).
pub const EXPLOSION_SHEET_GRID: (u32, u32) = (5, 5);

// --- Stars ---

/// Decorative stars generated per screen.
pub const STAR_COUNT: usize = 20;

// --- Masks ---

/// Alpha values above this count as solid when building a pixel mask.
pub const MASK_ALPHA_THRESHOLD: u8 = 127;

// --- HUD ---

/// Distance of the score label's centre from the bottom edge (px).
pub const HUD_BOTTOM_OFFSET: f32 = 100.0;

/// Score label font size.
pub const HUD_FONT_SIZE: u16 = 80;

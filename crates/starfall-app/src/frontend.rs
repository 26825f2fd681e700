//! macroquad implementations of the platform traits.
//!
//! Drawing happens in playfield coordinates scaled to the current window,
//! so the game looks the same at every resolution.

use macroquad::audio::{load_sound_from_bytes, play_sound, stop_sound, PlaySoundParams, Sound};
use macroquad::prelude::*;

use starfall_core::commands::{ControlState, PlayerCommand};
use starfall_core::constants::{
    BACKGROUND_COLOR, HUD_BOTTOM_OFFSET, HUD_FONT_SIZE, LARGE_RESOLUTION, SMALL_RESOLUTION,
};
use starfall_core::enums::SpriteId;
use starfall_core::events::AudioEvent;
use starfall_core::state::{FrameSnapshot, SpriteView};
use starfall_core::types::Resolution;

use crate::assets::{AssetError, GameAssets, SoundBank};
use crate::config::{KeyBindings, Settings};
use crate::platform::{AudioSink, FrameClock, FrameInput, InputSource, Renderer};

/// Padding between the score text and its border (px).
const HUD_BORDER_PADDING: f32 = 15.0;
/// Border line thickness (px).
const HUD_BORDER_WIDTH: f32 = 5.0;

// ---- Clock ----

/// Frame clock over macroquad's timer.
pub struct MacroquadClock {
    frame_start: f64,
}

impl MacroquadClock {
    pub fn new() -> Self {
        Self {
            frame_start: get_time(),
        }
    }
}

impl Default for MacroquadClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MacroquadClock {
    fn tick(&mut self, fps_cap: u32) -> f32 {
        if fps_cap > 0 {
            let target = 1.0 / f64::from(fps_cap);
            // Sleep in small steps; vsync may already have used most of the frame.
            while get_time() - self.frame_start < target {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
        }
        let now = get_time();
        let dt = now - self.frame_start;
        self.frame_start = now;
        dt as f32
    }

    fn now_ms(&self) -> u64 {
        (get_time() * 1000.0) as u64
    }
}

// ---- Input ----

/// Parse a key name from the settings file (case-insensitive).
pub fn key_code(name: &str) -> Option<KeyCode> {
    let key = match name.trim().to_ascii_lowercase().as_str() {
        "a" => KeyCode::A,
        "b" => KeyCode::B,
        "c" => KeyCode::C,
        "d" => KeyCode::D,
        "e" => KeyCode::E,
        "f" => KeyCode::F,
        "g" => KeyCode::G,
        "h" => KeyCode::H,
        "i" => KeyCode::I,
        "j" => KeyCode::J,
        "k" => KeyCode::K,
        "l" => KeyCode::L,
        "m" => KeyCode::M,
        "n" => KeyCode::N,
        "o" => KeyCode::O,
        "p" => KeyCode::P,
        "q" => KeyCode::Q,
        "r" => KeyCode::R,
        "s" => KeyCode::S,
        "t" => KeyCode::T,
        "u" => KeyCode::U,
        "v" => KeyCode::V,
        "w" => KeyCode::W,
        "x" => KeyCode::X,
        "y" => KeyCode::Y,
        "z" => KeyCode::Z,
        "0" => KeyCode::Key0,
        "1" => KeyCode::Key1,
        "2" => KeyCode::Key2,
        "3" => KeyCode::Key3,
        "4" => KeyCode::Key4,
        "5" => KeyCode::Key5,
        "6" => KeyCode::Key6,
        "7" => KeyCode::Key7,
        "8" => KeyCode::Key8,
        "9" => KeyCode::Key9,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Space,
        "return" | "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "left shift" | "lshift" => KeyCode::LeftShift,
        "right shift" | "rshift" => KeyCode::RightShift,
        "left ctrl" | "lctrl" => KeyCode::LeftControl,
        "right ctrl" | "rctrl" => KeyCode::RightControl,
        "left alt" | "lalt" => KeyCode::LeftAlt,
        "right alt" | "ralt" => KeyCode::RightAlt,
        _ => return None,
    };
    Some(key)
}

#[derive(Debug, Clone, Copy, Default)]
struct ResolvedKeys {
    up: Option<KeyCode>,
    down: Option<KeyCode>,
    left: Option<KeyCode>,
    right: Option<KeyCode>,
    shoot: Option<KeyCode>,
}

impl ResolvedKeys {
    fn resolve(keys: &KeyBindings) -> Self {
        let lookup = |control: &str, name: &str| {
            let code = key_code(name);
            if code.is_none() {
                log::warn!("unknown key {name:?} bound to {control}; control disabled");
            }
            code
        };
        Self {
            up: lookup("up", &keys.up),
            down: lookup("down", &keys.down),
            left: lookup("left", &keys.left),
            right: lookup("right", &keys.right),
            shoot: lookup("shoot", &keys.shoot),
        }
    }
}

/// Keyboard input. Bindings are re-resolved only when they change.
#[derive(Default)]
pub struct MacroquadInput {
    resolved: Option<(KeyBindings, ResolvedKeys)>,
}

impl MacroquadInput {
    fn keys_for(&mut self, keys: &KeyBindings) -> ResolvedKeys {
        if let Some((bound, resolved)) = &self.resolved {
            if bound == keys {
                return *resolved;
            }
        }
        let resolved = ResolvedKeys::resolve(keys);
        self.resolved = Some((keys.clone(), resolved));
        resolved
    }
}

impl InputSource for MacroquadInput {
    fn poll(&mut self, keys: &KeyBindings) -> FrameInput {
        let keys = self.keys_for(keys);
        let down = |key: Option<KeyCode>| key.is_some_and(is_key_down);

        let controls = ControlState {
            up: down(keys.up),
            down: down(keys.down),
            left: down(keys.left),
            right: down(keys.right),
            shoot_pressed: keys.shoot.is_some_and(is_key_pressed),
        };

        let mut commands = Vec::new();
        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            commands.push(PlayerCommand::Quit);
        }
        if is_key_pressed(KeyCode::Key0) {
            let (width, height) = SMALL_RESOLUTION;
            commands.push(PlayerCommand::ChangeResolution {
                resolution: Resolution::new(width, height),
            });
        }
        if is_key_pressed(KeyCode::Key1) {
            let (width, height) = LARGE_RESOLUTION;
            commands.push(PlayerCommand::ChangeResolution {
                resolution: Resolution::new(width, height),
            });
        }

        FrameInput { controls, commands }
    }
}

// ---- Rendering ----

struct SpriteTextures {
    ship: Texture2D,
    star: Texture2D,
    meteor: Texture2D,
    laser: Texture2D,
    explosion: Vec<Texture2D>,
}

impl SpriteTextures {
    fn get(&self, view: &SpriteView) -> Option<&Texture2D> {
        match view.sprite {
            SpriteId::Ship => Some(&self.ship),
            SpriteId::Star => Some(&self.star),
            SpriteId::Meteor => Some(&self.meteor),
            SpriteId::Laser => Some(&self.laser),
            SpriteId::Explosion => self.explosion.get(view.frame),
        }
    }
}

fn upload(image: &image::RgbaImage) -> Texture2D {
    let texture = Texture2D::from_rgba8(image.width() as u16, image.height() as u16, image.as_raw());
    texture.set_filter(FilterMode::Linear);
    texture
}

pub struct MacroquadRenderer {
    textures: SpriteTextures,
    font: Font,
}

impl MacroquadRenderer {
    /// Upload sprite textures and parse the HUD font.
    pub fn new(assets: &GameAssets) -> Result<Self, AssetError> {
        let images = &assets.images;
        let textures = SpriteTextures {
            ship: upload(&images.ship),
            star: upload(&images.star),
            meteor: upload(&images.meteor),
            laser: upload(&images.laser),
            explosion: images.explosion.iter().map(upload).collect(),
        };
        let font = load_ttf_font_from_bytes(&assets.font).map_err(|err| AssetError::Font {
            name: "Oxanium-Bold.ttf".to_string(),
            message: format!("{err:?}"),
        })?;
        Ok(Self { textures, font })
    }

    fn draw_score(&self, snapshot: &FrameSnapshot, scale: Vec2) {
        let text = snapshot.score.to_string();
        let font_scale = scale.y;
        let dims = measure_text(&text, Some(&self.font), HUD_FONT_SIZE, font_scale);

        let center = vec2(
            snapshot.playfield.width * 0.5,
            snapshot.playfield.height - HUD_BOTTOM_OFFSET,
        ) * scale;
        let x = center.x - dims.width * 0.5;
        let top = center.y - dims.height * 0.5;
        draw_text_ex(
            &text,
            x,
            top + dims.offset_y,
            TextParams {
                font: Some(&self.font),
                font_size: HUD_FONT_SIZE,
                font_scale,
                color: WHITE,
                ..Default::default()
            },
        );

        let padding = HUD_BORDER_PADDING * scale.y;
        draw_rectangle_lines(
            x - padding,
            top - padding,
            dims.width + padding * 2.0,
            dims.height + padding * 2.0,
            HUD_BORDER_WIDTH * scale.y,
            WHITE,
        );
    }
}

impl Renderer for MacroquadRenderer {
    fn present(&mut self, snapshot: &FrameSnapshot) {
        let [r, g, b] = BACKGROUND_COLOR;
        clear_background(Color::from_rgba(r, g, b, 255));

        let playfield = snapshot.playfield;
        let scale = vec2(
            screen_width() / playfield.width,
            screen_height() / playfield.height,
        );

        for view in &snapshot.sprites {
            let Some(texture) = self.textures.get(view) else {
                continue;
            };
            let size = texture.size() * scale;
            let center = vec2(view.center.x, view.center.y) * scale;
            draw_texture_ex(
                texture,
                center.x - size.x * 0.5,
                center.y - size.y * 0.5,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(size),
                    // Screen y points down, so counter-clockwise is negative.
                    rotation: -view.rotation_deg.to_radians(),
                    ..Default::default()
                },
            );
        }

        self.draw_score(snapshot, scale);
    }

    fn resize(&mut self, resolution: Resolution) {
        request_new_screen_size(resolution.width as f32, resolution.height as f32);
    }
}

// ---- Audio ----

async fn decode(name: &str, bytes: &[u8]) -> Result<Sound, AssetError> {
    load_sound_from_bytes(bytes)
        .await
        .map_err(|err| AssetError::Audio {
            name: name.to_string(),
            message: format!("{err:?}"),
        })
}

pub struct MacroquadAudio {
    laser: Sound,
    explosion: Sound,
    damage: Sound,
    music: Sound,
    music_volume: f32,
    effects_volume: f32,
}

impl MacroquadAudio {
    pub async fn load(sounds: &SoundBank, settings: &Settings) -> Result<Self, AssetError> {
        Ok(Self {
            laser: decode("laser.wav", &sounds.laser).await?,
            explosion: decode("explosion.wav", &sounds.explosion).await?,
            damage: decode("damage.ogg", &sounds.damage).await?,
            music: decode("game_music.wav", &sounds.music).await?,
            music_volume: settings.music_volume(),
            effects_volume: settings.effects_volume(),
        })
    }

    fn effect(&self, sound: &Sound) {
        play_sound(
            sound,
            PlaySoundParams {
                looped: false,
                volume: self.effects_volume,
            },
        );
    }
}

impl AudioSink for MacroquadAudio {
    fn play(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::LaserFired => self.effect(&self.laser),
            AudioEvent::MeteorExploded => self.effect(&self.explosion),
            AudioEvent::ShipDamaged => self.effect(&self.damage),
            AudioEvent::MusicStarted => {
                stop_sound(&self.music);
                play_sound(
                    &self.music,
                    PlaySoundParams {
                        looped: true,
                        volume: self.music_volume,
                    },
                );
            }
        }
    }
}

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use macroquad::prelude::*;

use starfall_app::assets::GameAssets;
use starfall_app::config::{Settings, SettingsStore};
use starfall_app::frontend::{MacroquadAudio, MacroquadClock, MacroquadInput, MacroquadRenderer};
use starfall_app::game_loop::GameLoop;
use starfall_app::StartupError;
use starfall_sim::engine::SimConfig;

/// Settings and assets live next to the crate manifest.
const BASE_DIR: &str = env!("CARGO_MANIFEST_DIR");

fn settings_path() -> PathBuf {
    Path::new(BASE_DIR).join("config").join("settings.json")
}

fn window_conf() -> Conf {
    // Runs before logging is up; a bad file is reported again by `run`.
    let settings = Settings::read(&settings_path()).unwrap_or_default();
    let resolution = settings.resolution();
    Conf {
        window_title: settings.title().to_string(),
        window_width: resolution.width as i32,
        window_height: resolution.height as i32,
        window_resizable: false,
        platform: macroquad::miniquad::conf::Platform {
            swap_interval: Some(i32::from(settings.video.vsync)),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

async fn run() -> Result<(), StartupError> {
    let settings = SettingsStore::load(settings_path())?;
    let assets = GameAssets::load(&Path::new(BASE_DIR).join("assets"))?;
    let renderer = MacroquadRenderer::new(&assets)?;
    let audio = MacroquadAudio::load(&assets.sounds, settings.settings()).await?;

    let sim = SimConfig {
        seed: time_seed(),
        shapes: assets.shapes(),
        ..Default::default()
    };

    prevent_quit();
    let mut game = GameLoop::new(
        settings,
        sim,
        MacroquadClock::new(),
        MacroquadInput::default(),
        renderer,
        audio,
    );
    while game.frame() {
        next_frame().await;
    }
    log::info!("final score {}", game.engine().score());
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("{err}");
        std::process::exit(1);
    }
}

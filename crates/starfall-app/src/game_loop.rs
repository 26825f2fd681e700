//! The per-frame orchestration: input, simulation, presentation, and
//! deferred resolution changes.
//!
//! `GameLoop` owns the simulation engine and the settings store and drives
//! the four platform collaborators. It is agnostic of the windowing layer,
//! so the binary can await a vsync between frames while tests call
//! `frame()` directly with scripted fakes.

use starfall_core::types::{Playfield, Resolution};
use starfall_sim::engine::{SimConfig, SimulationEngine};

use crate::config::SettingsStore;
use crate::platform::{AudioSink, FrameClock, InputSource, Renderer};

pub struct GameLoop<C, I, R, A> {
    engine: SimulationEngine,
    settings: SettingsStore,
    clock: C,
    input: I,
    renderer: R,
    audio: A,
    running: bool,
    pending_resolution: Option<Resolution>,
}

impl<C, I, R, A> GameLoop<C, I, R, A>
where
    C: FrameClock,
    I: InputSource,
    R: Renderer,
    A: AudioSink,
{
    /// Build the loop. The playfield follows the resolution stored in
    /// `settings`, overriding `sim.playfield`.
    pub fn new(
        settings: SettingsStore,
        sim: SimConfig,
        clock: C,
        input: I,
        renderer: R,
        audio: A,
    ) -> Self {
        let playfield = Playfield::from(settings.settings().resolution());
        log::info!(
            "starting at {}x{} (seed {})",
            playfield.width,
            playfield.height,
            sim.seed
        );
        let engine = SimulationEngine::new(SimConfig { playfield, ..sim });
        Self {
            engine,
            settings,
            clock,
            input,
            renderer,
            audio,
            running: true,
            pending_resolution: None,
        }
    }

    /// Run one frame. Returns false once the loop should stop.
    pub fn frame(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let dt = self.clock.tick(self.settings.settings().video.fps);
        let now_ms = self.clock.now_ms();

        // 1. Input and loop-level requests
        let input = self.input.poll(&self.settings.settings().keys);
        if input.quit_requested() {
            log::info!("quit requested");
            self.running = false;
            return false;
        }
        if let Some(resolution) = input.resize_request() {
            self.pending_resolution = Some(resolution);
        }

        // 2-3. Simulation and collisions
        let snapshot = self.engine.tick(dt, now_ms, &input.controls);

        // 4. Presentation
        self.renderer.present(&snapshot);
        for &event in &snapshot.audio_events {
            self.audio.play(event);
        }

        // 5. Deferred screen rebuild
        if let Some(resolution) = self.pending_resolution.take() {
            self.apply_resolution(resolution, now_ms);
        }

        true
    }

    /// Run frames back to back until quit. Blocks the calling thread.
    pub fn run(&mut self) {
        while self.frame() {}
    }

    fn apply_resolution(&mut self, resolution: Resolution, now_ms: u64) {
        if let Err(err) = self.settings.set_resolution(resolution) {
            log::warn!("could not persist resolution: {err}");
        }
        self.renderer.resize(resolution);
        self.engine.restart(Playfield::from(resolution), now_ms);
        log::info!("resolution changed to {}x{}", resolution.width, resolution.height);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::config::{KeyBindings, Settings};
    use crate::platform::FrameInput;
    use starfall_core::commands::{ControlState, PlayerCommand};
    use starfall_core::enums::SpriteId;
    use starfall_core::events::AudioEvent;
    use starfall_core::state::FrameSnapshot;

    /// 60 fps clock that never sleeps.
    #[derive(Default)]
    struct FakeClock {
        frames: u64,
    }

    impl FrameClock for FakeClock {
        fn tick(&mut self, _fps_cap: u32) -> f32 {
            self.frames += 1;
            1.0 / 60.0
        }

        fn now_ms(&self) -> u64 {
            self.frames * 1000 / 60
        }
    }

    /// Replays a fixed script, then idles.
    #[derive(Default)]
    struct ScriptedInput {
        script: VecDeque<FrameInput>,
        polls: usize,
    }

    impl ScriptedInput {
        fn new(script: Vec<FrameInput>) -> Self {
            Self {
                script: script.into(),
                polls: 0,
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self, _keys: &KeyBindings) -> FrameInput {
            self.polls += 1;
            self.script.pop_front().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<FrameSnapshot>,
        resizes: Vec<Resolution>,
    }

    impl Renderer for RecordingRenderer {
        fn present(&mut self, snapshot: &FrameSnapshot) {
            self.frames.push(snapshot.clone());
        }

        fn resize(&mut self, resolution: Resolution) {
            self.resizes.push(resolution);
        }
    }

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<AudioEvent>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, event: AudioEvent) {
            self.played.push(event);
        }
    }

    type TestLoop = GameLoop<FakeClock, ScriptedInput, RecordingRenderer, RecordingAudio>;

    fn game(settings: SettingsStore, script: Vec<FrameInput>) -> TestLoop {
        GameLoop::new(
            settings,
            SimConfig::default(),
            FakeClock::default(),
            ScriptedInput::new(script),
            RecordingRenderer::default(),
            RecordingAudio::default(),
        )
    }

    fn memory_settings() -> SettingsStore {
        SettingsStore::in_memory("unused/settings.json", Settings::default())
    }

    fn command(command: PlayerCommand) -> FrameInput {
        FrameInput {
            commands: vec![command],
            ..Default::default()
        }
    }

    fn resize_to(width: u32, height: u32) -> FrameInput {
        command(PlayerCommand::ChangeResolution {
            resolution: Resolution::new(width, height),
        })
    }

    #[test]
    fn test_run_stops_on_quit() {
        let script = vec![
            FrameInput::default(),
            FrameInput::default(),
            command(PlayerCommand::Quit),
        ];
        let mut game = game(memory_settings(), script);
        game.run();

        assert!(!game.is_running());
        assert_eq!(game.renderer().frames.len(), 2);
        assert_eq!(game.input.polls, 3);
        assert!(!game.frame(), "a stopped loop stays stopped");
    }

    #[test]
    fn test_first_frame_starts_music() {
        let mut game = game(memory_settings(), Vec::new());
        assert!(game.frame());
        assert_eq!(game.audio().played, vec![AudioEvent::MusicStarted]);

        let first = &game.renderer().frames[0];
        assert_eq!(first.count(SpriteId::Star), 20);
        assert_eq!(first.count(SpriteId::Ship), 1);
        assert_eq!(first.playfield, Playfield::new(1280.0, 720.0));
    }

    #[test]
    fn test_playfield_follows_stored_resolution() {
        let mut settings = Settings::default();
        settings.video.width = 720;
        settings.video.height = 480;
        let mut game = game(SettingsStore::in_memory("unused.json", settings), Vec::new());

        game.frame();
        assert_eq!(game.engine().playfield(), Playfield::new(720.0, 480.0));
    }

    #[test]
    fn test_shoot_edge_plays_laser_cue() {
        let shoot = FrameInput {
            controls: ControlState {
                shoot_pressed: true,
                ..Default::default()
            },
            commands: Vec::new(),
        };
        let mut game = game(memory_settings(), vec![FrameInput::default(), shoot]);
        game.frame();
        game.frame();

        assert_eq!(game.renderer().frames[1].count(SpriteId::Laser), 1);
        assert!(game.audio().played.contains(&AudioEvent::LaserFired));
    }

    #[test]
    fn test_resolution_change_rebuilds_screen_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = SettingsStore::load(&path).unwrap();

        let mut game = game(settings, vec![FrameInput::default(), resize_to(720, 480)]);
        game.frame();
        game.frame();

        // The request frame is still drawn at the old size.
        assert_eq!(game.renderer().frames[1].playfield, Playfield::new(1280.0, 720.0));
        assert_eq!(game.renderer().resizes, vec![Resolution::new(720, 480)]);

        game.frame();
        let rebuilt = &game.renderer().frames[2];
        assert_eq!(rebuilt.playfield, Playfield::new(720.0, 480.0));
        assert_eq!(rebuilt.score, 0);
        assert_eq!(rebuilt.count(SpriteId::Star), 20);
        assert!(rebuilt
            .sprites
            .iter()
            .all(|s| rebuilt.playfield.contains(s.center)));
        assert_eq!(
            rebuilt.audio_events,
            vec![AudioEvent::MusicStarted],
            "music restarts with the new screen"
        );

        let stored = Settings::read(&path).unwrap();
        assert_eq!(stored.resolution(), Resolution::new(720, 480));
    }

    #[test]
    fn test_resize_survives_unwritable_settings() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let settings = SettingsStore::in_memory(blocker.join("settings.json"), Settings::default());

        let mut game = game(settings, vec![resize_to(720, 480)]);
        assert!(game.frame());

        assert_eq!(game.renderer().resizes.len(), 1);
        assert_eq!(game.engine().playfield(), Playfield::new(720.0, 480.0));
        assert_eq!(
            game.settings().settings().resolution(),
            Resolution::new(720, 480)
        );
    }
}

//! Collaborator traits the game loop drives, plus a std-only frame clock.
//!
//! The loop never talks to a window, keyboard, or mixer directly; the
//! binary plugs in implementations of these traits, and tests plug in
//! scripted fakes.

use std::time::{Duration, Instant};

use starfall_core::commands::{ControlState, PlayerCommand};
use starfall_core::events::AudioEvent;
use starfall_core::state::FrameSnapshot;
use starfall_core::types::Resolution;

use crate::config::KeyBindings;

/// Frame pacing and wall-clock time.
pub trait FrameClock {
    /// Wait until the next frame is due under `fps_cap` (0 = uncapped) and
    /// return the seconds elapsed since the previous call.
    fn tick(&mut self, fps_cap: u32) -> f32;

    /// Milliseconds since the clock was created.
    fn now_ms(&self) -> u64;
}

/// Everything read from the input device in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub controls: ControlState,
    /// Loop-level requests, in the order they were made.
    pub commands: Vec<PlayerCommand>,
}

impl FrameInput {
    pub fn quit_requested(&self) -> bool {
        self.commands.contains(&PlayerCommand::Quit)
    }

    /// The last resolution requested this frame, if any.
    pub fn resize_request(&self) -> Option<Resolution> {
        self.commands.iter().rev().find_map(|command| match command {
            PlayerCommand::ChangeResolution { resolution } => Some(*resolution),
            PlayerCommand::Quit => None,
        })
    }
}

pub trait InputSource {
    fn poll(&mut self, keys: &KeyBindings) -> FrameInput;
}

pub trait Renderer {
    /// Draw one frame: background, sprites back to front, then the HUD.
    fn present(&mut self, snapshot: &FrameSnapshot);

    /// Switch the window to a new resolution.
    fn resize(&mut self, resolution: Resolution);
}

pub trait AudioSink {
    fn play(&mut self, event: AudioEvent);
}

/// Sleep-based clock over `std::time::Instant`.
///
/// Frames are scheduled on a fixed grid; when the loop falls more than two
/// frames behind, the schedule resets instead of trying to catch up.
#[derive(Debug)]
pub struct StdClock {
    start: Instant,
    last_frame: Instant,
    next_frame: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            next_frame: now,
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for StdClock {
    fn tick(&mut self, fps_cap: u32) -> f32 {
        if fps_cap > 0 {
            let frame = Duration::from_nanos(1_000_000_000 / u64::from(fps_cap));
            self.next_frame += frame;
            let now = Instant::now();
            if self.next_frame > now {
                std::thread::sleep(self.next_frame - now);
            } else if now - self.next_frame > frame * 2 {
                // Too far behind, drop the backlog
                self.next_frame = now;
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;
        if fps_cap == 0 {
            self.next_frame = now;
        }
        dt.as_secs_f32()
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfall_core::constants::SMALL_RESOLUTION;

    #[test]
    fn test_capped_tick_waits_for_frame() {
        let mut clock = StdClock::new();
        let dt = clock.tick(100);
        // 10ms frame at 100 fps; allow generous scheduler slack.
        assert!(dt >= 0.009, "dt was {dt}");
        assert!(dt < 0.5, "dt was {dt}");
    }

    #[test]
    fn test_uncapped_tick_does_not_sleep() {
        let mut clock = StdClock::new();
        let dt = clock.tick(0);
        assert!(dt < 0.05, "dt was {dt}");
    }

    #[test]
    fn test_schedule_resets_after_stall() {
        let mut clock = StdClock::new();
        std::thread::sleep(Duration::from_millis(60));
        // Far behind a 100 fps grid: no sleep, and the next frame is paced
        // from now rather than from the stale schedule.
        let stalled = clock.tick(100);
        assert!(stalled >= 0.05);
        let next = clock.tick(100);
        assert!(next >= 0.009, "dt was {next}");
    }

    #[test]
    fn test_now_ms_is_monotonic() {
        let clock = StdClock::new();
        let first = clock.now_ms();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.now_ms() >= first + 5);
    }

    #[test]
    fn test_frame_input_requests() {
        let small = Resolution::new(SMALL_RESOLUTION.0, SMALL_RESOLUTION.1);
        let large = Resolution::new(1280, 720);
        let input = FrameInput {
            controls: ControlState::default(),
            commands: vec![
                PlayerCommand::ChangeResolution { resolution: small },
                PlayerCommand::ChangeResolution { resolution: large },
            ],
        };
        assert!(!input.quit_requested());
        assert_eq!(input.resize_request(), Some(large));

        let quit = FrameInput {
            commands: vec![PlayerCommand::Quit],
            ..Default::default()
        };
        assert!(quit.quit_requested());
        assert_eq!(quit.resize_request(), None);
    }
}

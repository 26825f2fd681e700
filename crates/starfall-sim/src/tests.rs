//! Tests for the simulation engine, spawner, collisions, and lifecycle.

use approx::assert_relative_eq;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starfall_core::commands::ControlState;
use starfall_core::components::{Bounds, Meteor, Ship, Star};
use starfall_core::enums::SpriteId;
use starfall_core::events::AudioEvent;
use starfall_core::mask::SpriteShapes;
use starfall_core::types::{Playfield, Position, Rect};

use crate::engine::{SimConfig, SimulationEngine};
use crate::systems::spawner::{self, MeteorRoll, SpawnTimer};
use crate::world_setup::EntityFactory;

const IDLE: ControlState = ControlState {
    up: false,
    down: false,
    left: false,
    right: false,
    shoot_pressed: false,
};

fn shoot() -> ControlState {
    ControlState {
        shoot_pressed: true,
        ..Default::default()
    }
}

fn still_meteor(x: f32) -> MeteorRoll {
    MeteorRoll {
        x,
        direction: Vec2::Y,
        speed: 0.0,
        spin_deg: 0.0,
    }
}

fn count_events(events: &[AudioEvent], wanted: AudioEvent) -> usize {
    events.iter().filter(|e| **e == wanted).count()
}

fn ship_rect(engine: &SimulationEngine) -> Rect {
    let mut q = engine.world().query::<(&Ship, &Position, &Bounds)>();
    let (_, (_, pos, bounds)) = q.iter().next().expect("ship exists");
    Rect::from_center(pos.0, bounds.size)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    for frame in 0..600u64 {
        let controls = ControlState {
            left: frame % 120 < 60,
            right: frame % 120 >= 60,
            shoot_pressed: frame % 10 == 0,
            ..Default::default()
        };
        let now_ms = frame * 1000 / 60;
        let snap_a = engine_a.tick(1.0 / 60.0, now_ms, &controls);
        let snap_b = engine_b.tick(1.0 / 60.0, now_ms, &controls);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    // Star fields are rolled from the seed, so the very first frame differs.
    let snap_a = engine_a.tick(0.0, 0, &IDLE);
    let snap_b = engine_b.tick(0.0, 0, &IDLE);
    assert_ne!(
        serde_json::to_string(&snap_a).unwrap(),
        serde_json::to_string(&snap_b).unwrap()
    );
}

// ---- Screen setup ----

#[test]
fn test_new_screen_population() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick(0.0, 0, &IDLE);

    assert_eq!(snap.count(SpriteId::Star), 20);
    assert_eq!(snap.count(SpriteId::Ship), 1);
    assert_eq!(snap.count(SpriteId::Meteor), 0);
    assert_eq!(snap.score, 0);
    assert_eq!(count_events(&snap.audio_events, AudioEvent::MusicStarted), 1);

    let ship = ship_rect(&engine);
    assert_eq!(ship.center(), Vec2::new(640.0, 360.0));
}

#[test]
fn test_snapshot_draw_order() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.spawn_explosion(Vec2::new(50.0, 50.0));
    engine.spawn_meteor(&still_meteor(100.0), 0);
    let snap = engine.tick(0.0, 0, &shoot());

    let layers: Vec<_> = snap.sprites.iter().map(|s| s.layer).collect();
    let mut sorted = layers.clone();
    sorted.sort();
    assert_eq!(layers, sorted, "sprites must be ordered back to front");

    assert!(snap.sprites[..20].iter().all(|s| s.sprite == SpriteId::Star));
    assert_eq!(snap.sprites.last().map(|s| s.sprite), Some(SpriteId::Explosion));
}

// ---- Motion ----

#[test]
fn test_update_moves_by_normalized_direction() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(
        &MeteorRoll {
            x: 200.0,
            direction: Vec2::new(3.0, 4.0),
            speed: 100.0,
            spin_deg: 0.0,
        },
        0,
    );
    let start = engine.world().get::<&Position>(meteor).unwrap().0;

    engine.tick(0.5, 0, &IDLE);

    let end = engine.world().get::<&Position>(meteor).unwrap().0;
    assert_relative_eq!(end.x, start.x + 30.0, epsilon = 1e-3);
    assert_relative_eq!(end.y, start.y + 40.0, epsilon = 1e-3);
}

#[test]
fn test_update_zero_dt_is_noop() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(
        &MeteorRoll {
            x: 200.0,
            direction: Vec2::new(-0.3, 1.0),
            speed: 250.0,
            spin_deg: 75.0,
        },
        0,
    );
    let before = engine.world().get::<&Position>(meteor).unwrap().0;
    let ship_before = ship_rect(&engine);

    let held = ControlState {
        up: true,
        left: true,
        ..Default::default()
    };
    engine.tick(0.0, 0, &held);

    assert_eq!(engine.world().get::<&Position>(meteor).unwrap().0, before);
    assert_eq!(ship_rect(&engine), ship_before);
}

#[test]
fn test_negative_dt_treated_as_zero() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let ship_before = ship_rect(&engine);
    let held = ControlState {
        right: true,
        ..Default::default()
    };
    engine.tick(-1.0, 0, &held);
    assert_eq!(ship_rect(&engine), ship_before);
}

#[test]
fn test_ship_diagonal_speed_is_normalized() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let before = ship_rect(&engine).center();
    let held = ControlState {
        down: true,
        right: true,
        ..Default::default()
    };
    engine.tick(0.1, 0, &held);
    let moved = ship_rect(&engine).center() - before;
    assert_relative_eq!(moved.length(), 30.0, epsilon = 1e-3);
    assert_relative_eq!(moved.x, moved.y, epsilon = 1e-4);
}

#[test]
fn test_ship_clamped_to_playfield() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let playfield = engine.playfield();

    let up_left = ControlState {
        up: true,
        left: true,
        ..Default::default()
    };
    for _ in 0..100 {
        engine.tick(0.1, 0, &up_left);
        let rect = ship_rect(&engine);
        assert!(rect.left() >= 0.0 && rect.top() >= 0.0);
    }
    let rect = ship_rect(&engine);
    assert_eq!(rect.left(), 0.0);
    assert_eq!(rect.top(), 0.0);

    // One enormous step still lands flush against the far corner.
    let down_right = ControlState {
        down: true,
        right: true,
        ..Default::default()
    };
    engine.tick(1000.0, 0, &down_right);
    let rect = ship_rect(&engine);
    assert_eq!(rect.right(), playfield.width);
    assert_eq!(rect.bottom(), playfield.height);
    assert!(playfield.contains(rect.center()));
}

#[test]
fn test_meteor_spin_rotates_hitbox() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(
        &MeteorRoll {
            spin_deg: 90.0,
            ..still_meteor(300.0)
        },
        0,
    );
    let original = engine.world().get::<&Bounds>(meteor).unwrap().size;

    engine.tick(1.0, 0, &IDLE);

    let rotated = engine.world().get::<&Bounds>(meteor).unwrap().size;
    assert_eq!(rotated, Vec2::new(original.y, original.x));

    let snap = engine.tick(0.0, 0, &IDLE);
    let view = snap
        .sprites
        .iter()
        .find(|s| s.sprite == SpriteId::Meteor)
        .unwrap();
    assert_relative_eq!(view.rotation_deg, 90.0, epsilon = 1e-3);
}

// ---- Lifecycle ----

#[test]
fn test_meteor_despawns_once_below_bottom_edge() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(
        &MeteorRoll {
            speed: 100.0,
            ..still_meteor(300.0)
        },
        0,
    );
    let half_height = engine.world().get::<&Bounds>(meteor).unwrap().size.y * 0.5;

    // Top edge starts at -2 * half_height and must reach 720.
    let ticks_needed = ((720.0 + 2.0 * half_height) / 10.0).ceil() as usize;
    for _ in 0..ticks_needed - 1 {
        let snap = engine.tick(0.1, 0, &IDLE);
        assert!(engine.world().contains(meteor));
        assert_eq!(snap.count(SpriteId::Meteor), 1);
    }

    let snap = engine.tick(0.1, 0, &IDLE);
    assert!(!engine.world().contains(meteor));
    assert_eq!(snap.count(SpriteId::Meteor), 0);
}

#[test]
fn test_laser_despawns_above_top_edge() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let laser = engine.spawn_laser(Vec2::new(100.0, 10.0));
    let snap = engine.tick(0.1, 0, &IDLE);
    assert!(!engine.world().contains(laser));
    assert_eq!(snap.count(SpriteId::Laser), 0);
}

#[test]
fn test_explosion_plays_every_frame_once() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let explosion = engine.spawn_explosion(Vec2::new(100.0, 100.0));

    // 1/64 s is exact in binary, so the frame counter has no drift.
    let dt = 1.0 / 64.0;
    let mut shown = Vec::new();
    let mut elapsed = 0.0;
    while engine.world().contains(explosion) {
        let snap = engine.tick(dt, 0, &IDLE);
        elapsed += dt;
        if let Some(view) = snap.sprites.iter().find(|s| s.sprite == SpriteId::Explosion) {
            shown.push(view.frame);
        }
        assert!(elapsed < 1.0, "explosion never expired");
    }

    shown.dedup();
    assert_eq!(shown, (0..21).collect::<Vec<_>>());
    assert!((elapsed - 0.42f32).abs() <= dt, "expired after {elapsed}s");
}

// ---- Firing ----

#[test]
fn test_fire_respects_cooldown() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let dt = 1.0 / 60.0;

    let snap = engine.tick(dt, 1000, &shoot());
    assert_eq!(snap.count(SpriteId::Laser), 1);
    assert_eq!(count_events(&snap.audio_events, AudioEvent::LaserFired), 1);

    let snap = engine.tick(dt, 1100, &shoot());
    assert_eq!(snap.count(SpriteId::Laser), 1, "second shot inside cooldown");
    assert_eq!(count_events(&snap.audio_events, AudioEvent::LaserFired), 0);

    let snap = engine.tick(dt, 1450, &shoot());
    assert_eq!(snap.count(SpriteId::Laser), 2, "shot after cooldown elapsed");
}

#[test]
fn test_held_shoot_without_edge_does_not_fire() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let held = ControlState {
        up: true,
        ..Default::default()
    };
    let snap = engine.tick(0.0, 1000, &held);
    assert_eq!(snap.count(SpriteId::Laser), 0);
}

#[test]
fn test_laser_spawns_at_ship_top_centre() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let muzzle = ship_rect(&engine).mid_top();
    let snap = engine.tick(0.0, 1000, &shoot());

    let laser = snap
        .sprites
        .iter()
        .find(|s| s.sprite == SpriteId::Laser)
        .unwrap();
    let laser_height = SpriteShapes::default().laser.size().y;
    assert_eq!(laser.center, muzzle - Vec2::new(0.0, laser_height * 0.5));
}

// ---- Collisions ----

fn place(engine: &mut SimulationEngine, entity: hecs::Entity, center: Vec2) {
    engine
        .world_mut()
        .get::<&mut Position>(entity)
        .unwrap()
        .0 = center;
}

#[test]
fn test_laser_meteor_collision() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(&still_meteor(0.0), 0);
    place(&mut engine, meteor, Vec2::new(200.0, 200.0));
    let laser = engine.spawn_laser(Vec2::new(200.0, 260.0));

    let snap = engine.tick(0.0, 0, &IDLE);

    assert!(!engine.world().contains(meteor));
    assert!(!engine.world().contains(laser));
    assert_eq!(snap.count(SpriteId::Meteor), 0);
    assert_eq!(snap.count(SpriteId::Laser), 0);
    assert_eq!(snap.count(SpriteId::Explosion), 1);
    assert_eq!(snap.score, 1);
    assert_eq!(count_events(&snap.audio_events, AudioEvent::MeteorExploded), 1);

    let explosion = snap
        .sprites
        .iter()
        .find(|s| s.sprite == SpriteId::Explosion)
        .unwrap();
    let laser_height = SpriteShapes::default().laser.size().y;
    assert_eq!(explosion.center, Vec2::new(200.0, 260.0 - laser_height));
}

#[test]
fn test_independent_pairs_resolve_in_one_frame() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for x in [150.0, 450.0, 1000.0] {
        let meteor = engine.spawn_meteor(&still_meteor(0.0), 0);
        place(&mut engine, meteor, Vec2::new(x, 200.0));
        engine.spawn_laser(Vec2::new(x, 260.0));
    }

    let snap = engine.tick(0.0, 0, &IDLE);
    assert_eq!(snap.score, 3);
    assert_eq!(snap.count(SpriteId::Explosion), 3);
    assert_eq!(snap.count(SpriteId::Meteor), 0);
    assert_eq!(snap.count(SpriteId::Laser), 0);
}

#[test]
fn test_one_laser_destroys_one_meteor() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    // Two meteors stacked on the same spot; a single laser can only take one.
    for _ in 0..2 {
        let meteor = engine.spawn_meteor(&still_meteor(0.0), 0);
        place(&mut engine, meteor, Vec2::new(200.0, 200.0));
    }
    engine.spawn_laser(Vec2::new(200.0, 260.0));

    let snap = engine.tick(0.0, 0, &IDLE);
    assert_eq!(snap.score, 1);
    assert_eq!(snap.count(SpriteId::Meteor), 1);
    assert_eq!(snap.count(SpriteId::Laser), 0);
    assert_eq!(snap.count(SpriteId::Explosion), 1);
}

#[test]
fn test_bounding_boxes_overlap_but_masks_do_not() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(&still_meteor(0.0), 0);
    place(&mut engine, meteor, Vec2::new(200.0, 200.0));
    // Laser tip tucked into the meteor rect's lower-left corner, outside the ellipse.
    let meteor_size = SpriteShapes::default().meteor.size();
    let corner = Vec2::new(200.0, 200.0) - meteor_size * 0.5 + Vec2::new(6.0, meteor_size.y);
    let laser = engine.spawn_laser(corner + Vec2::new(0.0, 40.0));

    let snap = engine.tick(0.0, 0, &IDLE);
    assert!(engine.world().contains(meteor));
    assert!(engine.world().contains(laser));
    assert_eq!(snap.score, 0);
}

#[test]
fn test_ship_meteor_collision_keeps_ship() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let meteor = engine.spawn_meteor(&still_meteor(0.0), 0);
    let ship_center = ship_rect(&engine).center();
    place(&mut engine, meteor, ship_center);

    let snap = engine.tick(0.0, 0, &IDLE);
    assert!(!engine.world().contains(meteor));
    assert_eq!(snap.count(SpriteId::Ship), 1);
    assert_eq!(snap.score, 0);
    assert_eq!(count_events(&snap.audio_events, AudioEvent::ShipDamaged), 1);
    assert_eq!(snap.count(SpriteId::Explosion), 0);
}

// ---- Spawner ----

#[test]
fn test_spawner_wall_clock_cadence() {
    let mut world = hecs::World::new();
    let mut factory = EntityFactory::new(SpriteShapes::default());
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut timer = SpawnTimer::default();
    let playfield = Playfield::default();

    let mut spawned = 0;
    for now_ms in (0..=2000).step_by(100) {
        if spawner::run(&mut world, &mut rng, &mut factory, &mut timer, &playfield, now_ms)
            .is_some()
        {
            spawned += 1;
        }
    }
    assert_eq!(spawned, 4);
    assert_eq!(world.query::<&Meteor>().iter().count(), 4);
}

#[test]
fn test_spawn_cadence_ignores_delta_time() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    // Huge dt, but the wall clock has not reached the interval.
    let snap = engine.tick(5.0, 499, &IDLE);
    assert_eq!(snap.count(SpriteId::Meteor), 0);
    // Tiny dt, but the interval has elapsed.
    let snap = engine.tick(0.001, 500, &IDLE);
    assert_eq!(snap.count(SpriteId::Meteor), 1);
}

#[test]
fn test_meteor_roll_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let playfield = Playfield::new(720.0, 480.0);
    let mut saw_positive = false;
    let mut saw_negative = false;

    for _ in 0..1000 {
        let roll = spawner::roll_meteor(&mut rng, &playfield);
        assert!((0.0..=720.0).contains(&roll.x));
        assert_eq!(roll.x.fract(), 0.0);
        assert_relative_eq!(roll.direction.length(), 1.0, epsilon = 1e-5);
        assert!(roll.direction.y > 0.0);
        assert!((roll.direction.x / roll.direction.y).abs() <= 0.5 + 1e-5);
        assert!((50.0..=300.0).contains(&roll.speed));
        assert!((50.0..=100.0).contains(&roll.spin_deg.abs()));
        saw_positive |= roll.spin_deg > 0.0;
        saw_negative |= roll.spin_deg < 0.0;
    }
    assert!(saw_positive && saw_negative);
}

#[test]
fn test_spawned_meteor_starts_above_top_edge() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick(0.0, 500, &IDLE);
    let mut q = engine.world().query::<(&Meteor, &Position, &Bounds)>();
    let (_, (meteor, pos, bounds)) = q.iter().next().unwrap();
    assert_eq!(meteor.created_at_ms, 500);
    assert_relative_eq!(Rect::from_center(pos.0, bounds.size).bottom(), 0.0, epsilon = 1e-4);
}

// ---- Restart ----

#[test]
fn test_restart_resets_screen_for_new_playfield() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for frame in 0..120u64 {
        engine.tick(1.0 / 60.0, frame * 50, &shoot());
    }
    for (_entity, ship) in engine.world_mut().query_mut::<&mut Ship>() {
        ship.meteors_destroyed = 7;
    }
    assert_eq!(engine.score(), 7);

    let small = Playfield::new(720.0, 480.0);
    engine.restart(small, 6000);
    let snap = engine.tick(0.0, 6000, &IDLE);

    assert_eq!(snap.score, 0);
    assert_eq!(snap.playfield, small);
    assert_eq!(snap.count(SpriteId::Star), 20);
    assert_eq!(snap.count(SpriteId::Ship), 1);
    assert_eq!(snap.count(SpriteId::Laser), 0);
    assert_eq!(snap.count(SpriteId::Meteor), 0);
    assert_eq!(count_events(&snap.audio_events, AudioEvent::MusicStarted), 1);
    assert_eq!(snap.time.tick, 1);

    for (_entity, (_star, pos)) in engine.world().query::<(&Star, &Position)>().iter() {
        assert!(small.contains(pos.0), "star {:?} outside new playfield", pos.0);
    }
    assert_eq!(ship_rect(&engine).center(), Vec2::new(360.0, 240.0));

    // Spawn timer restarted from the restart time.
    let snap = engine.tick(0.0, 6499, &IDLE);
    assert_eq!(snap.count(SpriteId::Meteor), 0);
    let snap = engine.tick(0.0, 6500, &IDLE);
    assert_eq!(snap.count(SpriteId::Meteor), 1);
}

//! Tests for the simulation engine, combat, economy, tiers, spawning and rampage.

use glam::Vec2;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rampage_core::commands::{CameraView, FrameInput, HostCommand, PlayerInput};
use rampage_core::components::{Adversary, Bystander};
use rampage_core::config::{GameTuning, RampageTuning, ScoringTuning, TierTuning};
use rampage_core::constants::*;
use rampage_core::enums::*;
use rampage_core::events::GameEvent;
use rampage_core::state::GameStats;
use rampage_core::types::{Position, Velocity};

use rampage_ai::profiles::get_profile;

use crate::collaborators::{Building, ColliderGroup, Physics, StaticWorld};
use crate::engine::{SimConfig, SimulationEngine};
use crate::player::Player;
use crate::probe;
use crate::systems::action::{resolve, ActionContext, ActionController};
use crate::systems::combat::{damage_in_radius, DamageQuery, KillRecord};
use crate::systems::rampage::{entry_path, fuel_drain_rate, RampageController};
use crate::systems::scoring::{self, combo_multiplier, points_for, wanted_level};
use crate::systems::spawner::{active_count, SpawnController, SpawnSettings};
use crate::systems::tier::{check_tier_progression, dismount_tied_adversaries, TierProgression};

// ---- Helpers ----

fn make_adversary(class: AdversaryClass) -> Adversary {
    let profile = get_profile(class);
    Adversary {
        class,
        phase: AiPhase::Chasing,
        health: profile.max_health,
        max_health: profile.max_health,
        attack_cooldown: 0.0,
        hit_stun: 0.0,
        stun_pending: false,
        attack_kind: AttackKind::Strike,
        attack_elapsed: 0.0,
        attack_dealt: false,
        death_anim: 0.0,
        knockback: Vec2::ZERO,
        flash: 0.0,
        facing: Vec2::Y,
        body: None,
    }
}

fn make_bystander() -> Bystander {
    Bystander {
        health: BYSTANDER_HEALTH,
        panic: 0.0,
        wander_target: Vec2::ZERO,
        knockback: Vec2::ZERO,
        flash: 0.0,
        dead: false,
        body: None,
    }
}

fn spawn_adversary(world: &mut World, class: AdversaryClass, at: Vec2) -> hecs::Entity {
    world.spawn((Position(at), Velocity::default(), make_adversary(class)))
}

fn adversary_kill(class: AdversaryClass) -> KillRecord {
    KillRecord {
        victim: VictimKind::Adversary(class),
        position: Vec2::ZERO,
        method: KillMethod::Melee,
        panicked: false,
    }
}

fn bystander_kill() -> KillRecord {
    KillRecord {
        victim: VictimKind::Bystander,
        position: Vec2::ZERO,
        method: KillMethod::Melee,
        panicked: false,
    }
}

fn frame(dt: f32) -> FrameInput {
    FrameInput {
        dt,
        ..Default::default()
    }
}

fn press() -> FrameInput {
    FrameInput {
        dt: NOMINAL_DT,
        input: PlayerInput {
            movement: Vec2::ZERO,
            action_held: true,
        },
        camera: None,
    }
}

/// An engine with a run started, no crowd and one tick elapsed.
fn active_engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        crowd_size: 0,
        ..Default::default()
    });
    engine.queue_command(HostCommand::StartRun);
    engine.tick(&frame(NOMINAL_DT));
    engine
}

fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(*e)).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let run = || {
        let mut engine = SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        })
        .with_physics(Box::new(StaticWorld::open()));
        engine.queue_command(HostCommand::StartRun);
        engine.tick(&frame(NOMINAL_DT));
        engine.stats_mut().set_heat(80.0);

        let mut snapshots = Vec::new();
        for i in 0..300 {
            let angle = i as f32 * 0.05;
            let input = FrameInput {
                dt: NOMINAL_DT,
                input: PlayerInput {
                    movement: Vec2::new(angle.cos(), angle.sin()),
                    action_held: i % 20 < 10,
                },
                camera: None,
            };
            engine.tick(&input);
            snapshots.push(serde_json::to_string(&engine.snapshot(None)).unwrap());
        }
        let positions: Vec<Vec2> = engine
            .world()
            .query::<&Position>()
            .iter()
            .map(|(_, p)| p.0)
            .collect();
        (snapshots, positions)
    };

    let (snaps_a, pos_a) = run();
    let (snaps_b, pos_b) = run();
    assert_eq!(snaps_a, snaps_b, "Snapshots diverged with same seed");
    assert_eq!(pos_a, pos_b);
}

#[test]
fn test_determinism_different_seeds() {
    let crowd_positions = |seed: u64| {
        let mut engine = SimulationEngine::new(SimConfig {
            seed,
            ..Default::default()
        });
        engine.queue_command(HostCommand::StartRun);
        engine.tick(&frame(NOMINAL_DT));
        let positions: Vec<Vec2> = engine
            .world()
            .query::<(&Position, &Bystander)>()
            .iter()
            .map(|(_, (p, _))| p.0)
            .collect();
        positions
    };
    let a = crowd_positions(111);
    let b = crowd_positions(222);
    assert_eq!(a.len(), CROWD_SIZE);
    assert_ne!(a, b, "Different seeds should place the crowd differently");
}

// ---- Engine lifecycle ----

#[test]
fn test_ticks_do_nothing_before_start() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let report = engine.tick(&frame(NOMINAL_DT));
    assert_eq!(report.phase, GamePhase::Ready);
    assert_eq!(report.time.tick, 0);
    assert!(report.events.is_empty());
}

#[test]
fn test_pause_resume() {
    let mut engine = active_engine();
    engine.queue_command(HostCommand::Pause);
    let report = engine.tick(&frame(NOMINAL_DT));
    assert_eq!(report.phase, GamePhase::Paused);
    let paused_tick = report.time.tick;

    let report = engine.tick(&frame(NOMINAL_DT));
    assert_eq!(report.time.tick, paused_tick);

    engine.queue_command(HostCommand::Resume);
    let report = engine.tick(&frame(NOMINAL_DT));
    assert_eq!(report.phase, GamePhase::Active);
    assert!(report.time.tick > paused_tick);
}

#[test]
fn test_stats_update_every_third_tick() {
    let mut engine = SimulationEngine::new(SimConfig {
        crowd_size: 0,
        ..Default::default()
    });
    engine.queue_command(HostCommand::StartRun);
    let mut updates = 0;
    for _ in 0..9 {
        let report = engine.tick(&frame(NOMINAL_DT));
        updates += count_events(&report.events, |e| matches!(e, GameEvent::StatsUpdate(_)));
    }
    assert_eq!(updates, 3);
}

#[test]
fn test_game_over_emitted_once() {
    let mut engine = active_engine();
    engine.stats_mut().health = 0.0;

    let report = engine.tick(&frame(NOMINAL_DT));
    assert_eq!(report.phase, GamePhase::GameOver);
    assert_eq!(count_events(&report.events, |e| matches!(e, GameEvent::GameOver(_))), 1);

    for _ in 0..10 {
        let report = engine.tick(&frame(NOMINAL_DT));
        assert!(report.events.is_empty());
    }
}

#[test]
fn test_start_run_resets_everything() {
    let mut engine = active_engine();
    engine.stats_mut().score = 5_000;
    engine.stats_mut().set_heat(90.0);
    engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(5.0, 0.0));

    engine.queue_command(HostCommand::StartRun);
    engine.tick(&frame(NOMINAL_DT));
    assert_eq!(engine.stats().kills, 0);
    assert!(engine.stats().heat() < 1.0);
    assert_eq!(engine.time().tick, 1);
    assert!(engine.tiers().current().is_none());
    assert_eq!(active_count(engine.world(), AdversaryClass::Foot), 0);
}

#[test]
fn test_long_frames_are_clamped() {
    let mut engine = active_engine();
    let before = engine.time().elapsed_secs;
    engine.tick(&frame(5.0));
    let step = engine.time().elapsed_secs - before;
    assert!(step <= MAX_FRAME_DT as f64 + 1e-6, "step was {step}");
}

// ---- Combat ----

#[test]
fn test_cone_boundary() {
    let half = MELEE_HALF_ANGLE_DEG.to_radians();
    let eps = 0.02;
    let query = DamageQuery::melee(Vec2::ZERO, Vec2::X);

    let inside = Vec2::new((half - eps).cos(), (half - eps).sin()) * 1.5;
    let outside = Vec2::new((half + eps).cos(), (half + eps).sin()) * 1.5;
    assert!(query.covers(inside));
    assert!(!query.covers(outside));

    // Radius is exclusive.
    assert!(!query.covers(Vec2::new(MELEE_RADIUS, 0.0)));
    assert!(query.covers(Vec2::new(MELEE_RADIUS - 0.01, 0.0)));
}

#[test]
fn test_melee_kills_at_most_one() {
    let mut world = World::new();
    world.spawn((Position(Vec2::new(0.0, 1.0)), Velocity::default(), make_bystander()));
    world.spawn((Position(Vec2::new(0.3, 1.0)), Velocity::default(), make_bystander()));

    let mut kills = Vec::new();
    let query = DamageQuery::melee(Vec2::ZERO, Vec2::Y);
    let outcome = damage_in_radius(&mut world, &query, &mut kills);
    assert_eq!(outcome.kills, 1);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].victim, VictimKind::Bystander);
    assert_eq!(kills[0].method, KillMethod::Melee);
}

#[test]
fn test_blast_is_unbounded_and_omnidirectional() {
    let mut world = World::new();
    for i in 0..6 {
        let angle = i as f32 * std::f32::consts::TAU / 6.0;
        let at = Vec2::new(angle.cos(), angle.sin()) * 3.0;
        spawn_adversary(&mut world, AdversaryClass::Foot, at);
    }
    spawn_adversary(&mut world, AdversaryClass::Foot, Vec2::new(20.0, 0.0));

    let mut kills = Vec::new();
    let outcome = damage_in_radius(&mut world, &DamageQuery::blast(Vec2::ZERO), &mut kills);
    assert_eq!(outcome.kills, 6);
    assert_eq!(active_count(&world, AdversaryClass::Foot), 1);
}

#[test]
fn test_dead_adversary_counted_once() {
    let mut world = World::new();
    let entity = spawn_adversary(&mut world, AdversaryClass::Foot, Vec2::new(0.0, 1.0));
    world.get::<&mut Adversary>(entity).unwrap().health = 40.0;

    let query = DamageQuery::melee(Vec2::ZERO, Vec2::Y);
    let mut kills = Vec::new();
    assert_eq!(damage_in_radius(&mut world, &query, &mut kills).kills, 1);
    let second = damage_in_radius(&mut world, &query, &mut kills);
    assert_eq!(second.hits, 0);
    assert_eq!(second.kills, 0);
    assert_eq!(kills.len(), 1);

    let adversary = world.get::<&Adversary>(entity).unwrap();
    assert_eq!(adversary.phase, AiPhase::Dead);
    assert!(adversary.death_anim > 0.0);
}

#[test]
fn test_hit_stuns_chasing_adversary() {
    let mut world = World::new();
    let entity = spawn_adversary(&mut world, AdversaryClass::Foot, Vec2::new(0.0, 1.0));
    let mut kills = Vec::new();
    damage_in_radius(&mut world, &DamageQuery::melee(Vec2::ZERO, Vec2::Y), &mut kills);

    let adversary = world.get::<&Adversary>(entity).unwrap();
    assert_eq!(adversary.phase, AiPhase::HitStunned);
    assert_eq!(adversary.health, 50.0);
    assert!(adversary.flash > 0.0);
    assert!(adversary.knockback.y > 0.0, "knocked away from the attacker");
}

#[test]
fn test_hit_during_attack_is_deferred() {
    let mut world = World::new();
    let entity = spawn_adversary(&mut world, AdversaryClass::Foot, Vec2::new(0.0, 1.0));
    world.get::<&mut Adversary>(entity).unwrap().phase = AiPhase::Attacking;

    let mut kills = Vec::new();
    damage_in_radius(&mut world, &DamageQuery::melee(Vec2::ZERO, Vec2::Y), &mut kills);

    let adversary = world.get::<&Adversary>(entity).unwrap();
    assert_eq!(adversary.phase, AiPhase::Attacking);
    assert!(adversary.stun_pending);
}

#[test]
fn test_engine_melee_kill_scores() {
    let mut engine = active_engine();
    let entity = engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(0.0, 1.2));
    engine.world_mut().get::<&mut Adversary>(entity).unwrap().health = 30.0;

    let report = engine.tick(&press());
    let stats = engine.stats();
    assert_eq!(stats.kills, 1);
    assert_eq!(stats.adversary_kills, 1);
    assert_eq!(stats.combo, 1);
    // Not yet in pursuit when the blow landed: 50 x 1.1.
    assert_eq!(stats.score, 55);
    assert!(report.events.iter().any(|e| matches!(
        e,
        GameEvent::KillNotification { points: 55, combo: 1, .. }
    )));

    // Holding the button does not swing again.
    let report = engine.tick(&press());
    let notifications =
        count_events(&report.events, |e| matches!(e, GameEvent::KillNotification { .. }));
    assert_eq!(notifications, 0);
}

// ---- Scoring ----

#[test]
fn test_combo_multiplier_caps() {
    let tuning = ScoringTuning::default();
    assert!((combo_multiplier(0, &tuning) - 1.0).abs() < 1e-6);
    assert!((combo_multiplier(1, &tuning) - 1.1).abs() < 1e-6);
    assert!((combo_multiplier(20, &tuning) - 3.0).abs() < 1e-6);
    assert!((combo_multiplier(40, &tuning) - 3.0).abs() < 1e-6);
}

#[test]
fn test_points_formula() {
    let tuning = ScoringTuning::default();
    assert_eq!(points_for(50, false, false, 1, &tuning), 55);
    assert_eq!(points_for(50, true, false, 1, &tuning), 82);
    assert_eq!(points_for(10, true, true, 20, &tuning), 67);
}

#[test]
fn test_combo_resets_exactly_when_timer_expires() {
    let tuning = ScoringTuning::default();
    let mut stats = GameStats::default();
    stats.combo = 3;
    stats.combo_adversary_kills = 2;
    stats.combo_timer = 0.05;
    let mut events = Vec::new();

    scoring::run(&mut stats, &tuning, &[], 0.02, &mut events);
    scoring::run(&mut stats, &tuning, &[], 0.02, &mut events);
    assert_eq!(stats.combo, 3, "combo must survive while the timer is positive");

    scoring::run(&mut stats, &tuning, &[], 0.02, &mut events);
    assert_eq!(stats.combo, 0);
    assert_eq!(stats.combo_adversary_kills, 0);
    assert_eq!(stats.combo_timer, 0.0);
}

#[test]
fn test_combo_monotonic_while_timer_running() {
    let tuning = ScoringTuning::default();
    let mut stats = GameStats::default();
    let mut events = Vec::new();
    let mut last = 0;
    for _ in 0..10 {
        scoring::run(&mut stats, &tuning, &[bystander_kill()], 0.5, &mut events);
        assert!(stats.combo > last);
        assert_eq!(stats.combo_timer, tuning.combo_duration_secs);
        last = stats.combo;
    }
    assert_eq!(stats.bystander_kills, 10);
    assert_eq!(stats.adversary_kills, 0);
}

#[test]
fn test_score_never_decreases() {
    let tuning = ScoringTuning::default();
    let mut stats = GameStats::default();
    let mut events = Vec::new();
    let mut last = 0;
    for i in 0..200 {
        let kills: Vec<KillRecord> = if i % 7 == 0 {
            vec![adversary_kill(AdversaryClass::Car)]
        } else {
            Vec::new()
        };
        scoring::run(&mut stats, &tuning, &kills, 0.25, &mut events);
        assert!(stats.score >= last);
        last = stats.score;
    }
}

#[test]
fn test_heat_clamps_at_max() {
    let tuning = ScoringTuning::default();
    let mut stats = GameStats::default();
    let mut events = Vec::new();
    let kills = vec![adversary_kill(AdversaryClass::Car); 25];
    scoring::run(&mut stats, &tuning, &kills, NOMINAL_DT, &mut events);
    assert_eq!(stats.heat(), HEAT_MAX);
}

#[test]
fn test_heat_decays_faster_when_idle() {
    let tuning = ScoringTuning::default();
    let mut events = Vec::new();

    let mut busy = GameStats::default();
    busy.set_heat(50.0);
    scoring::run(&mut busy, &tuning, &[], 1.0, &mut events);
    assert!((busy.heat() - 48.5).abs() < 1e-4);

    let mut idle = GameStats::default();
    idle.set_heat(50.0);
    idle.secs_since_kill = 11.0;
    scoring::run(&mut idle, &tuning, &[], 1.0, &mut events);
    assert!((idle.heat() - 45.5).abs() < 1e-4);
}

#[test]
fn test_wanted_stars_rise_and_decay() {
    let tuning = ScoringTuning::default();
    assert_eq!(wanted_level(2, &tuning.wanted_star_thresholds), 0);
    assert_eq!(wanted_level(3, &tuning.wanted_star_thresholds), 1);
    assert_eq!(wanted_level(8, &tuning.wanted_star_thresholds), 2);

    let mut stats = GameStats::default();
    let mut events = Vec::new();
    let kills = vec![adversary_kill(AdversaryClass::Foot); 3];
    scoring::run(&mut stats, &tuning, &kills, NOMINAL_DT, &mut events);
    assert_eq!(stats.wanted_stars, 1);

    // Bystander kills do not reset the wanted decay clock.
    for _ in 0..46 {
        scoring::run(&mut stats, &tuning, &[bystander_kill()], 1.0, &mut events);
    }
    assert_eq!(stats.wanted_stars, 0);
    assert_eq!(stats.wanted_progress_kills, 0);
}

#[test]
fn test_decayed_star_requires_fresh_kills() {
    let tuning = ScoringTuning::default();
    let mut stats = GameStats::default();
    let mut events = Vec::new();
    let kills = vec![adversary_kill(AdversaryClass::Foot); 8];
    scoring::run(&mut stats, &tuning, &kills, NOMINAL_DT, &mut events);
    assert_eq!(stats.wanted_stars, 2);

    scoring::run(&mut stats, &tuning, &[], tuning.wanted_decay_secs, &mut events);
    assert_eq!(stats.wanted_stars, 1);
    assert_eq!(stats.wanted_progress_kills, 3);

    let kill = [adversary_kill(AdversaryClass::Foot)];
    scoring::run(&mut stats, &tuning, &kill, NOMINAL_DT, &mut events);
    assert_eq!(stats.wanted_stars, 1, "one kill must not re-cross the second threshold");
}

#[test]
fn test_panicked_bystander_bonus() {
    let tuning = ScoringTuning::default();
    let mut calm = GameStats::default();
    let mut scared = GameStats::default();
    let mut events = Vec::new();
    scoring::run(&mut calm, &tuning, &[bystander_kill()], NOMINAL_DT, &mut events);
    let panicked = KillRecord {
        panicked: true,
        ..bystander_kill()
    };
    scoring::run(&mut scared, &tuning, &[panicked], NOMINAL_DT, &mut events);
    assert!(scared.score > calm.score);
}

// ---- Tier progression ----

#[test]
fn test_tier_thresholds() {
    let tuning = TierTuning::default();
    assert_eq!(check_tier_progression(299, Tier::Foot, &tuning), None);
    assert_eq!(check_tier_progression(300, Tier::Foot, &tuning), Some(Tier::Bike));
    assert_eq!(check_tier_progression(300, Tier::Bike, &tuning), None);
    assert_eq!(check_tier_progression(9_000, Tier::Sedan, &tuning), Some(Tier::Truck));
    assert_eq!(check_tier_progression(u64::MAX, Tier::Truck, &tuning), None);
}

#[test]
fn test_first_vehicle_spawns_as_current() {
    let tuning = TierTuning::default();
    let mut tiers = TierProgression::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    stats.score = 300;
    tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    let current = tiers.current().expect("bike should spawn");
    assert_eq!(current.tier, Tier::Bike);
    assert!(tiers.awaiting().is_none());
    assert_eq!(stats.tier, Tier::Bike);
    assert!(events.contains(&GameEvent::TierUnlocked {
        tier: Tier::Bike,
        as_awaiting: false
    }));
}

#[test]
fn test_awaiting_vehicle_swap_and_disposal() {
    let tuning = TierTuning::default();
    let mut tiers = TierProgression::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    stats.score = 300;
    tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    player.position = tiers.current().unwrap().position;
    assert!(tiers.enter(&mut player));
    assert!(player.riding);

    stats.score = 1_500;
    events.clear();
    tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    let awaiting = tiers.awaiting().expect("moto should wait beside the player");
    assert_eq!(awaiting.tier, Tier::Moto);
    assert_eq!(tiers.glows().len(), 1);
    assert!(events.iter().any(|e| matches!(e, GameEvent::GlowIntensity { .. })));

    // Only one awaiting vehicle at a time.
    tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(tiers.glows().len(), 1);

    assert_eq!(tiers.swap(&mut player, &tuning, &mut events), Some((Tier::Bike, Tier::Moto)));
    assert_eq!(tiers.current().unwrap().tier, Tier::Moto);
    assert!(tiers.awaiting().is_none());
    assert!(tiers.glows().is_empty());
    assert_eq!(tiers.pending_disposals(), 1);

    for _ in 0..40 {
        tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    }
    assert_eq!(tiers.pending_disposals(), 0);
}

#[test]
fn test_truck_is_terminal() {
    let tuning = TierTuning::default();
    let mut tiers = TierProgression::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    stats.score = 1_000_000;
    // Climb by entering and swapping until TRUCK.
    for _ in 0..10 {
        tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
        if !player.riding {
            player.position = tiers.current().unwrap().position;
            tiers.enter(&mut player);
        } else if tiers.awaiting().is_some() {
            tiers.swap(&mut player, &tuning, &mut events);
        }
    }
    assert_eq!(tiers.effective_tier(), Tier::Truck);

    events.clear();
    for _ in 0..100 {
        tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    }
    assert!(tiers.awaiting().is_none());
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::TierUnlocked { .. })), 0);
    assert_eq!(stats.tier, Tier::Truck);
}

#[test]
fn test_destroyed_vehicle_respects_respawn_cooldown() {
    let tuning = TierTuning::default();
    let mut tiers = TierProgression::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    stats.score = 300;
    tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    player.position = tiers.current().unwrap().position;
    tiers.enter(&mut player);

    tiers.damage_current(1_000.0);
    tiers.run(&mut stats, &tuning, &mut player, None, NOMINAL_DT, &mut events);
    assert!(tiers.current().is_none());
    assert!(!player.riding);
    assert!(events.contains(&GameEvent::VehicleDestroyed { tier: Tier::Bike }));

    // Still cooling down after 7 seconds.
    for _ in 0..70 {
        tiers.run(&mut stats, &tuning, &mut player, None, 0.1, &mut events);
    }
    assert!(tiers.current().is_none());

    for _ in 0..15 {
        tiers.run(&mut stats, &tuning, &mut player, None, 0.1, &mut events);
    }
    assert_eq!(tiers.current().map(|v| v.tier), Some(Tier::Bike));
}

#[test]
fn test_swap_dismounts_tied_adversaries() {
    let mut world = World::new();
    let bike = spawn_adversary(&mut world, AdversaryClass::Bike, Vec2::new(8.0, 0.0));
    let foot = spawn_adversary(&mut world, AdversaryClass::Foot, Vec2::new(-8.0, 0.0));
    let mut events = Vec::new();

    let count = dismount_tied_adversaries(&mut world, Tier::Bike, Tier::Moto, None, &mut events);
    assert_eq!(count, 1);
    let dismounted = world.get::<&Adversary>(bike).unwrap();
    assert_eq!(dismounted.class, AdversaryClass::Foot);
    assert_eq!(world.get::<&Position>(bike).unwrap().0, Vec2::new(8.0, 0.0));
    assert_eq!(world.get::<&Adversary>(foot).unwrap().class, AdversaryClass::Foot);
    assert!(events.contains(&GameEvent::AdversaryDismounted {
        from: AdversaryClass::Bike,
        position: Vec2::new(8.0, 0.0),
    }));
}

#[test]
fn test_swap_keeps_adversaries_active_in_new_tier() {
    let mut world = World::new();
    let car = spawn_adversary(&mut world, AdversaryClass::Car, Vec2::new(20.0, 0.0));
    let mut events = Vec::new();

    let count = dismount_tied_adversaries(&mut world, Tier::Sedan, Tier::Truck, None, &mut events);
    assert_eq!(count, 0);
    assert_eq!(world.get::<&Adversary>(car).unwrap().class, AdversaryClass::Car);
    assert!(events.is_empty());

    let count = dismount_tied_adversaries(&mut world, Tier::Truck, Tier::Foot, None, &mut events);
    assert_eq!(count, 1);
    assert_eq!(world.get::<&Adversary>(car).unwrap().class, AdversaryClass::Foot);
}

// ---- Spawning ----

#[test]
fn test_desired_population_from_heat() {
    let foot = SpawnSettings::for_class(AdversaryClass::Foot);
    assert_eq!(foot.desired_population(0.0), 0);
    assert_eq!(foot.desired_population(30.0), 1);
    assert_eq!(foot.desired_population(50.0), 2);
    assert_eq!(foot.desired_population(80.0), 3);
    assert_eq!(foot.desired_population(100.0), 3);
}

#[test]
fn test_foot_spawns_match_heat() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut despawn = Vec::new();
    let mut stats = GameStats::default();
    let mut controller = SpawnController::new(AdversaryClass::Foot);

    stats.set_heat(30.0);
    let spawned =
        controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, NOMINAL_DT);
    assert_eq!(spawned, 1);

    stats.set_heat(80.0);
    let spawned =
        controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, NOMINAL_DT);
    assert_eq!(spawned, 2);
    assert_eq!(active_count(&world, AdversaryClass::Foot), 3);

    for (_, (pos, _)) in world.query::<(&Position, &Adversary)>().iter() {
        let d = pos.0.length();
        assert!((11.99..=18.01).contains(&d), "spawned at distance {d}");
    }
}

#[test]
fn test_tier_gated_class_waits_for_its_tier() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut despawn = Vec::new();
    let mut stats = GameStats::default();
    let mut controller = SpawnController::new(AdversaryClass::Bike);

    stats.set_heat(80.0);
    assert_eq!(
        controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, NOMINAL_DT),
        0
    );

    stats.tier = Tier::Bike;
    assert_eq!(
        controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, NOMINAL_DT),
        1
    );
    // Cooldown gates the second one.
    assert_eq!(
        controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, 1.0),
        0
    );
    assert_eq!(
        controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, 1.1),
        1
    );
    assert_eq!(active_count(&world, AdversaryClass::Bike), 2);
}

#[test]
fn test_finished_corpses_are_purged() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut despawn = Vec::new();
    let stats = GameStats::default();
    let mut controller = SpawnController::new(AdversaryClass::Foot);

    let dying = spawn_adversary(&mut world, AdversaryClass::Foot, Vec2::ZERO);
    {
        let mut adversary = world.get::<&mut Adversary>(dying).unwrap();
        adversary.phase = AiPhase::Dead;
        adversary.death_anim = 0.5;
    }
    controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, NOMINAL_DT);
    assert!(world.contains(dying), "still animating");

    world.get::<&mut Adversary>(dying).unwrap().death_anim = 0.0;
    controller.run(&mut world, &mut rng, &stats, Vec2::ZERO, None, &mut despawn, NOMINAL_DT);
    assert!(!world.contains(dying));
}

#[test]
fn test_spawn_bodies_released_on_purge() {
    let mut world = World::new();
    let mut physics = StaticWorld::open();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut despawn = Vec::new();
    let mut stats = GameStats::default();
    let mut controller = SpawnController::new(AdversaryClass::Foot);

    stats.set_heat(30.0);
    controller.run(
        &mut world,
        &mut rng,
        &stats,
        Vec2::ZERO,
        Some(&mut physics),
        &mut despawn,
        NOMINAL_DT,
    );
    assert_eq!(physics.body_count(), 1);

    for (_, adversary) in world.query_mut::<&mut Adversary>() {
        adversary.phase = AiPhase::Dead;
    }
    stats.set_heat(0.0);
    controller.run(
        &mut world,
        &mut rng,
        &stats,
        Vec2::ZERO,
        Some(&mut physics),
        &mut despawn,
        NOMINAL_DT,
    );
    assert_eq!(physics.body_count(), 0);
}

// ---- Adversary AI in the engine ----

#[test]
fn test_adversary_strikes_player() {
    let mut engine = active_engine();
    engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(0.0, 1.0));
    for _ in 0..60 {
        engine.tick(&frame(NOMINAL_DT));
    }
    assert!(engine.stats().health < PLAYER_MAX_HEALTH);
    assert!(!engine.player().is_immobilized());
}

#[test]
fn test_taser_immobilises_on_foot_player() {
    let mut engine = active_engine();
    engine.stats_mut().wanted_stars = 1;
    engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(0.0, 5.0));

    let mut tased = false;
    for _ in 0..60 {
        let report = engine.tick(&frame(NOMINAL_DT));
        tased |= report.events.iter().any(|e| matches!(e, GameEvent::PlayerTased { .. }));
    }
    assert!(tased);
    assert!(engine.player().is_immobilized());
    assert_eq!(engine.stats().health, PLAYER_MAX_HEALTH, "tasers do no damage");
}

#[test]
fn test_taser_immunity() {
    let mut player = Player::default();
    assert!(!player.is_taser_immune(false));
    assert!(player.is_taser_immune(true), "immune during rampage");

    player.riding = true;
    assert!(!player.tase(TASER_STUN_SECS, false));
    player.riding = false;

    assert!(player.tase(TASER_STUN_SECS, false));
    let mut presses = 0;
    while player.is_immobilized() {
        player.escape_taser();
        presses += 1;
    }
    assert_eq!(presses, 5);
    assert_eq!(player.taser_immunity, TASER_IMMUNITY_SECS);
    assert!(!player.tase(TASER_STUN_SECS, false));
}

// ---- Actions ----

#[test]
fn test_action_priority() {
    let mut ctx = ActionContext {
        immobilized: true,
        stuck: true,
        riding: true,
        near_awaiting: true,
        near_current: true,
    };
    assert_eq!(resolve(&ctx), Some(PlayerAction::EscapeTaser));
    ctx.immobilized = false;
    assert_eq!(resolve(&ctx), Some(PlayerAction::ExitStuckVehicle));
    ctx.stuck = false;
    assert_eq!(resolve(&ctx), Some(PlayerAction::SwitchVehicle));
    ctx.near_awaiting = false;
    assert_eq!(resolve(&ctx), None, "riding with nothing nearby");
    ctx.riding = false;
    assert_eq!(resolve(&ctx), Some(PlayerAction::EnterVehicle));
    ctx.near_current = false;
    assert_eq!(resolve(&ctx), Some(PlayerAction::Attack));
}

#[test]
fn test_action_is_edge_triggered() {
    let mut controller = ActionController::default();
    let ctx = ActionContext::default();
    let held = PlayerInput {
        movement: Vec2::ZERO,
        action_held: true,
    };
    let released = PlayerInput::default();

    assert_eq!(controller.update(&held, &ctx), Some(PlayerAction::Attack));
    assert_eq!(controller.update(&held, &ctx), None);
    assert_eq!(controller.update(&released, &ctx), None);
    assert_eq!(controller.update(&held, &ctx), Some(PlayerAction::Attack));
}

#[test]
fn test_stuck_vehicle_detection() {
    let mut physics = StaticWorld::with_buildings(vec![Building {
        min: Vec2::new(-10.0, 1.0),
        max: Vec2::new(10.0, 5.0),
        height: 5.0,
    }]);
    let body = physics.create_body(ColliderGroup::Vehicle, Vec2::ZERO, 0.5);
    let mut player = Player {
        riding: true,
        ..Default::default()
    };
    let input = PlayerInput {
        movement: Vec2::Y,
        action_held: false,
    };
    for _ in 0..200 {
        player.integrate(&input, 10.0, Some(body), Some(&mut physics), NOMINAL_DT);
    }
    assert!(player.position.y < 0.5 + 1e-3);
    assert!(player.is_stuck());
}

// ---- Probe ----

#[test]
fn test_probe_open_ground_keeps_center() {
    let physics = StaticWorld::open();
    let center = Vec2::new(3.0, -4.0);
    assert_eq!(probe::find_clear_ground(Some(&physics), center), Some(center));
    assert_eq!(probe::find_clear_ground(None, center), Some(center));
}

#[test]
fn test_probe_escapes_building() {
    let building = Building {
        min: Vec2::new(-3.0, -3.0),
        max: Vec2::new(3.0, 3.0),
        height: 4.0,
    };
    let physics = StaticWorld::with_buildings(vec![building]);
    assert!(!probe::is_clear_ground(Some(&physics), Vec2::ZERO));

    let found = probe::find_clear_ground(Some(&physics), Vec2::ZERO).expect("open ground nearby");
    assert!(!building.contains(found, 0.0));
    assert!(found.length() <= PROBE_MAX_RADIUS + 1e-3);
    assert!(probe::is_clear_ground(Some(&physics), found));
}

#[test]
fn test_probe_falls_back_to_center() {
    let physics = StaticWorld::with_buildings(vec![Building {
        min: Vec2::splat(-100.0),
        max: Vec2::splat(100.0),
        height: 30.0,
    }]);
    let center = Vec2::new(1.0, 1.0);
    assert_eq!(probe::find_clear_ground(Some(&physics), center), None);
    assert_eq!(probe::relocate(Some(&physics), center), center);
}

// ---- Rampage ----

#[test]
fn test_fuel_drain_bands() {
    let tuning = RampageTuning::default();
    assert_eq!(fuel_drain_rate(0.0, &tuning), 4.0);
    assert_eq!(fuel_drain_rate(4.99, &tuning), 4.0);
    assert_eq!(fuel_drain_rate(5.0, &tuning), 6.0);
    assert_eq!(fuel_drain_rate(12.0, &tuning), 9.0);
    assert_eq!(fuel_drain_rate(15.0, &tuning), 14.0);
    assert_eq!(fuel_drain_rate(300.0, &tuning), 14.0);
}

#[test]
fn test_fuel_runs_out_before_twenty_seconds() {
    let tuning = RampageTuning::default();
    let mut controller = RampageController::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    assert!(controller.enter(&mut stats, &tuning, RampagePath::Domination, &mut events));
    let mut elapsed = 0.0;
    while controller.is_active() {
        controller.run(&mut stats, &tuning, &[], 100.0, &mut player, None, NOMINAL_DT, &mut events);
        elapsed += NOMINAL_DT;
        assert!(elapsed < 20.0, "rampage outlived its fuel");
        assert!((0.0..=RAMPAGE_FUEL_MAX).contains(&stats.rampage_fuel()));
    }
    assert!(elapsed > 15.0);
    assert!(!stats.rampage_active);
    assert!(events.contains(&GameEvent::RampageEnded { forced: true }));
    assert!(events.contains(&GameEvent::SceneryVisibility { visible: true }));
}

#[test]
fn test_forced_exit_waits_for_predicate_to_lapse() {
    let tuning = RampageTuning::default();
    let mut controller = RampageController::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();
    stats.combo = 20;
    stats.combo_adversary_kills = 8;
    stats.set_heat(80.0);

    let outcome =
        controller.run(&mut stats, &tuning, &[], 100.0, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(outcome.entered, Some(RampagePath::Domination));

    // Burn the fuel with domination still satisfied the whole way.
    let mut exited = false;
    for _ in 0..(25 * TARGET_FRAME_RATE) {
        let outcome = controller.run(
            &mut stats,
            &tuning,
            &[],
            100.0,
            &mut player,
            None,
            NOMINAL_DT,
            &mut events,
        );
        if outcome.exited {
            exited = true;
            break;
        }
    }
    assert!(exited);
    assert!(entry_path(&stats, 100.0, &tuning).is_some());

    for _ in 0..60 {
        let outcome = controller.run(
            &mut stats,
            &tuning,
            &[],
            100.0,
            &mut player,
            None,
            NOMINAL_DT,
            &mut events,
        );
        assert_eq!(outcome.entered, None);
    }
    assert!(!controller.is_active());
    assert!(controller.awaiting_rearm());
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::RampageStarted { .. })), 1);

    // One tick with the combo broken re-arms entry.
    stats.combo = 0;
    controller.run(&mut stats, &tuning, &[], 100.0, &mut player, None, NOMINAL_DT, &mut events);
    assert!(!controller.awaiting_rearm());

    stats.combo = 12;
    let outcome =
        controller.run(&mut stats, &tuning, &[], 100.0, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(outcome.entered, Some(RampagePath::Domination));
}

#[test]
fn test_adversary_kills_refund_fuel() {
    let tuning = RampageTuning::default();
    let mut controller = RampageController::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    controller.enter(&mut stats, &tuning, RampagePath::Domination, &mut events);
    stats.set_rampage_fuel(50.0);
    let bystander = [bystander_kill()];
    controller.run(&mut stats, &tuning, &bystander, 100.0, &mut player, None, 0.0, &mut events);
    assert_eq!(stats.rampage_fuel(), 50.0);
    let adversary = [adversary_kill(AdversaryClass::Car)];
    controller.run(&mut stats, &tuning, &adversary, 100.0, &mut player, None, 0.0, &mut events);
    assert_eq!(stats.rampage_fuel(), 62.0);
}

#[test]
fn test_dual_entry_starts_one_session() {
    let tuning = RampageTuning::default();
    let mut stats = GameStats::default();
    stats.combo = 12;
    stats.combo_adversary_kills = 3;
    stats.set_heat(60.0);
    stats.desperation_adversary_kills = 2;
    assert_eq!(entry_path(&stats, 10.0, &tuning), Some(RampagePath::Domination));

    let mut controller = RampageController::default();
    let mut player = Player::default();
    let mut events = Vec::new();
    let outcome =
        controller.run(&mut stats, &tuning, &[], 10.0, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(outcome.entered, Some(RampagePath::Domination));
    assert!(!controller.enter(&mut stats, &tuning, RampagePath::Desperation, &mut events));
    assert_eq!(count_events(&events, |e| matches!(e, GameEvent::RampageStarted { .. })), 1);
}

#[test]
fn test_desperation_counter() {
    let tuning = RampageTuning::default();
    let mut controller = RampageController::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();
    let kill = [adversary_kill(AdversaryClass::Foot)];

    // Kills above the line do not count.
    controller.run(&mut stats, &tuning, &kill, 50.0, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(stats.desperation_adversary_kills, 0);

    controller.run(&mut stats, &tuning, &kill, 20.0, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(stats.desperation_adversary_kills, 1);
    assert!(!controller.is_active());

    // Recovering resets the counter.
    controller.run(&mut stats, &tuning, &[], 30.0, &mut player, None, NOMINAL_DT, &mut events);
    assert_eq!(stats.desperation_adversary_kills, 0);

    controller.run(&mut stats, &tuning, &kill, 20.0, &mut player, None, NOMINAL_DT, &mut events);
    let outcome = controller.run(
        &mut stats,
        &tuning,
        &kill,
        20.0,
        &mut player,
        None,
        NOMINAL_DT,
        &mut events,
    );
    assert_eq!(outcome.entered, Some(RampagePath::Desperation));
    assert_eq!(stats.desperation_adversary_kills, 0);
}

#[test]
fn test_rampage_exit_relocates_player() {
    let physics = StaticWorld::with_buildings(vec![Building {
        min: Vec2::new(-3.0, -3.0),
        max: Vec2::new(3.0, 3.0),
        height: 4.0,
    }]);
    let tuning = RampageTuning::default();
    let mut controller = RampageController::default();
    let mut stats = GameStats::default();
    let mut player = Player::default();
    let mut events = Vec::new();

    controller.enter(&mut stats, &tuning, RampagePath::Domination, &mut events);
    assert!(controller.exit(&mut stats, &mut player, Some(&physics), false, &mut events));
    assert!(probe::is_clear_ground(Some(&physics), player.position));
    assert!(!controller.exit(&mut stats, &mut player, Some(&physics), false, &mut events));
}

#[test]
fn test_slowmo_eases_back() {
    let tuning = RampageTuning::default();
    let mut controller = RampageController::default();
    let mut stats = GameStats::default();
    let mut events = Vec::new();
    controller.enter(&mut stats, &tuning, RampagePath::Domination, &mut events);

    assert!((controller.slowmo_scale() - tuning.slowmo_floor).abs() < 1e-6);
    let mut last = controller.slowmo_scale();
    for _ in 0..60 {
        controller.tick_slowmo(NOMINAL_DT);
        assert!(controller.slowmo_scale() >= last);
        last = controller.slowmo_scale();
    }
    assert_eq!(controller.slowmo_scale(), 1.0);
    assert_eq!(controller.adversary_time_scale(), tuning.adversary_time_scale);
}

#[test]
fn test_engine_rampage_entry_freezes_with_hit_stop() {
    let mut engine = active_engine();
    {
        let stats = engine.stats_mut();
        stats.combo = 12;
        stats.combo_timer = COMBO_DURATION_SECS;
        stats.combo_adversary_kills = 3;
        stats.set_heat(60.0);
    }
    let report = engine.tick(&frame(NOMINAL_DT));
    assert!(report.events.contains(&GameEvent::RampageStarted {
        path: RampagePath::Domination
    }));
    assert!(report.events.contains(&GameEvent::SceneryVisibility { visible: false }));
    assert!(engine.stats().rampage_active);
    assert!(engine.hit_stop_remaining() > 0.0);

    let frozen_at = report.time.tick;
    let report = engine.tick(&frame(NOMINAL_DT));
    assert_eq!(report.time.tick, frozen_at, "hit-stop freezes the whole tick");
    assert!(report.events.is_empty());

    for _ in 0..20 {
        engine.tick(&frame(NOMINAL_DT));
    }
    assert!(engine.time().tick > frozen_at);
}

#[test]
fn test_end_rampage_command() {
    let mut engine = active_engine();
    {
        let stats = engine.stats_mut();
        stats.combo = 12;
        stats.combo_timer = COMBO_DURATION_SECS;
        stats.combo_adversary_kills = 3;
        stats.set_heat(60.0);
    }
    engine.tick(&frame(NOMINAL_DT));
    assert!(engine.rampage().is_active());

    engine.queue_command(HostCommand::EndRampage);
    let report = engine.tick(&frame(NOMINAL_DT));
    assert!(!engine.rampage().is_active());
    assert!(report.events.contains(&GameEvent::RampageEnded { forced: false }));
}

#[test]
fn test_rampage_attack_is_a_blast() {
    let mut engine = active_engine();
    {
        let stats = engine.stats_mut();
        stats.combo = 12;
        stats.combo_timer = COMBO_DURATION_SECS;
        stats.combo_adversary_kills = 3;
        stats.set_heat(60.0);
    }
    engine.tick(&frame(NOMINAL_DT));
    while engine.hit_stop_remaining() > 0.0 {
        engine.tick(&frame(NOMINAL_DT));
    }

    // Behind the player: melee would miss, the blast does not.
    engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(0.0, -3.0));
    engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(3.0, 0.0));
    let before = engine.stats().adversary_kills;
    engine.tick(&press());
    assert_eq!(engine.stats().adversary_kills, before + 2);
}

// ---- Snapshot ----

#[test]
fn test_health_bars_for_damaged_on_screen_adversaries() {
    let mut engine = active_engine();
    let hurt = engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(0.0, 10.0));
    engine.world_mut().get::<&mut Adversary>(hurt).unwrap().health = 25.0;
    engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(10.0, 0.0));
    let far = engine.spawn_test_adversary(AdversaryClass::Foot, Vec2::new(500.0, 0.0));
    engine.world_mut().get::<&mut Adversary>(far).unwrap().health = 25.0;

    let camera = CameraView {
        position: glam::Vec3::new(0.0, 30.0, 0.0),
        viewport: Vec2::new(800.0, 600.0),
        pixels_per_unit: 10.0,
    };
    let snapshot = engine.snapshot(Some(&camera));
    assert_eq!(snapshot.active_adversaries, 3);
    assert_eq!(snapshot.health_bars.len(), 1);
    assert!((snapshot.health_bars[0].fraction - 0.25).abs() < 1e-6);
    assert_eq!(snapshot.health_bars[0].screen, Vec2::new(400.0, 200.0));
}

#[test]
fn test_tuning_override_reaches_engine() {
    let tuning = GameTuning::from_json(r#"{"tiers": {"thresholds": [10, 20, 30, 40]}}"#).unwrap();
    let mut engine = SimulationEngine::new(SimConfig {
        tuning,
        crowd_size: 0,
        ..Default::default()
    });
    engine.queue_command(HostCommand::StartRun);
    engine.tick(&frame(NOMINAL_DT));
    engine.stats_mut().score = 10;
    engine.tick(&frame(NOMINAL_DT));
    assert_eq!(engine.tiers().current().map(|v| v.tier), Some(Tier::Bike));
    assert_eq!(engine.stats().tier, Tier::Bike);
}

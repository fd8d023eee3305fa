//! Simulation engine: owns the world and runs one frame at a time.
//!
//! `SimulationEngine` owns the hecs ECS world, the stats blackboard and every
//! controller, processes host commands, and runs all stages once per frame in
//! a fixed order. Physics and steering are optional collaborators; without
//! them the engine still runs on open ground.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rampage_core::commands::{CameraView, FrameInput, HostCommand, PlayerInput};
use rampage_core::config::GameTuning;
use rampage_core::constants::*;
use rampage_core::enums::{AdversaryClass, AttackKind, EffectKind, GamePhase, PlayerAction};
use rampage_core::events::GameEvent;
use rampage_core::state::{GameStats, StatsSnapshot};
use rampage_core::types::SimTime;

use rampage_ai::profiles::get_profile;

use crate::collaborators::{ColliderGroup, Physics, SeekSteering, Steering};
use crate::player::Player;
use crate::systems;
use crate::systems::action::{ActionContext, ActionController};
use crate::systems::adversary_ai::{AiFrame, AttackLanded};
use crate::systems::combat::{DamageQuery, KillRecord};
use crate::systems::crowd::CrowdController;
use crate::systems::rampage::RampageController;
use crate::systems::spawner::SpawnController;
use crate::systems::tier::TierProgression;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub tuning: GameTuning,
    /// Bystanders kept around the player.
    pub crowd_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: GameTuning::default(),
            crowd_size: CROWD_SIZE,
        }
    }
}

/// Everything one tick produced for the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Outbound calls to the scene and UI, in the order they were made.
    pub events: Vec<GameEvent>,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    tuning: GameTuning,
    rng: ChaCha8Rng,
    command_queue: VecDeque<HostCommand>,
    stats: GameStats,
    player: Player,
    actions: ActionController,
    tiers: TierProgression,
    spawners: Vec<SpawnController>,
    crowd: CrowdController,
    rampage: RampageController,
    physics: Option<Box<dyn Physics>>,
    steering: Box<dyn Steering>,
    /// Seconds of global freeze left; a frozen tick runs no stage.
    hit_stop: f32,
    game_over_sent: bool,
    warned_no_physics: bool,
    events: Vec<GameEvent>,
    kill_buffer: Vec<KillRecord>,
    landed_buffer: Vec<AttackLanded>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            stats: GameStats::default(),
            player: Player::default(),
            actions: ActionController::default(),
            tiers: TierProgression::default(),
            spawners: AdversaryClass::ALL.into_iter().map(SpawnController::new).collect(),
            crowd: CrowdController::new(config.crowd_size),
            rampage: RampageController::default(),
            physics: None,
            steering: Box::new(SeekSteering),
            hit_stop: 0.0,
            game_over_sent: false,
            warned_no_physics: false,
            events: Vec::new(),
            kill_buffer: Vec::new(),
            landed_buffer: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Attach the physics collaborator.
    pub fn with_physics(mut self, physics: Box<dyn Physics>) -> Self {
        self.set_physics(physics);
        self
    }

    pub fn set_physics(&mut self, mut physics: Box<dyn Physics>) {
        if let Some(mut old) = self.physics.take() {
            if let Some(body) = self.player.body.take() {
                old.remove_body(body);
            }
        }
        self.player.body = Some(physics.create_body(
            ColliderGroup::Player,
            self.player.position,
            PLAYER_COLLIDER_RADIUS,
        ));
        self.physics = Some(physics);
    }

    pub fn set_steering(&mut self, steering: Box<dyn Steering>) {
        self.steering = steering;
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: HostCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self, frame: &FrameInput) -> TickReport {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = frame.dt.clamp(0.0, MAX_FRAME_DT);
            if self.hit_stop > 0.0 {
                self.hit_stop = (self.hit_stop - dt).max(0.0);
            } else {
                self.run_systems(frame, dt);
            }
        }

        TickReport {
            time: self.time,
            phase: self.phase,
            events: std::mem::take(&mut self.events),
        }
    }

    /// Project the current state for the UI.
    pub fn snapshot(&self, camera: Option<&CameraView>) -> StatsSnapshot {
        let ridden = if self.player.riding { self.tiers.current() } else { None };
        systems::snapshot::build_snapshot(
            &self.world,
            &self.stats,
            &self.time,
            self.phase,
            ridden,
            camera,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn tiers(&self) -> &TierProgression {
        &self.tiers
    }

    pub fn rampage(&self) -> &RampageController {
        &self.rampage
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    pub fn hit_stop_remaining(&self) -> f32 {
        self.hit_stop
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn stats_mut(&mut self) -> &mut GameStats {
        &mut self.stats
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a fresh adversary at `position` (for tests needing a fixed layout).
    #[cfg(test)]
    pub fn spawn_test_adversary(&mut self, class: AdversaryClass, position: glam::Vec2) -> Entity {
        use glam::Vec2;
        use rampage_core::components::Adversary;
        use rampage_core::enums::AiPhase;
        use rampage_core::types::{Position, Velocity};

        let profile = get_profile(class);
        self.world.spawn((
            Position(position),
            Velocity::default(),
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
            },
        ))
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::StartRun => self.start_run(),
            HostCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            HostCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            HostCommand::EndRampage => {
                if self.rampage.exit(
                    &mut self.stats,
                    &mut self.player,
                    self.physics.as_deref(),
                    false,
                    &mut self.events,
                ) {
                    self.tiers.follow_player(&self.player);
                }
            }
        }
    }

    /// Reset stats and pools and begin a run.
    fn start_run(&mut self) {
        systems::cleanup::clear_all(&mut self.world, self.physics.as_deref_mut());
        self.tiers.reset(self.physics.as_deref_mut());

        let mut player = Player::default();
        if let Some(physics) = self.physics.as_deref_mut() {
            if let Some(body) = self.player.body.take() {
                physics.remove_body(body);
            }
            player.body = Some(physics.create_body(
                ColliderGroup::Player,
                player.position,
                PLAYER_COLLIDER_RADIUS,
            ));
        }
        self.player = player;

        self.stats = GameStats::default();
        for spawner in &mut self.spawners {
            spawner.reset();
        }
        self.rampage.reset();
        self.actions.reset();
        self.hit_stop = 0.0;
        self.game_over_sent = false;
        self.time = SimTime::default();
        self.phase = GamePhase::Active;
        log::info!("Run started");
    }

    /// Run all stages in order.
    fn run_systems(&mut self, frame: &FrameInput, dt: f32) {
        if self.physics.is_none() && !self.warned_no_physics {
            log::warn!("No physics collaborator attached; movement runs uncorrected");
            self.warned_no_physics = true;
        }

        self.rampage.tick_slowmo(dt);
        let world_dt = dt * self.rampage.slowmo_scale();
        let adversary_dt = world_dt * self.rampage.adversary_time_scale();
        self.kill_buffer.clear();
        self.landed_buffer.clear();

        // 1. Player timers, movement and action resolution
        let action = self.run_player(&frame.input, world_dt);
        // 2. Combat
        self.run_combat(action);
        // 3. Scoring
        systems::scoring::run(
            &mut self.stats,
            &self.tuning.scoring,
            &self.kill_buffer,
            world_dt,
            &mut self.events,
        );
        // 4. Tier progression
        self.tiers.run(
            &mut self.stats,
            &self.tuning.tiers,
            &mut self.player,
            self.physics.as_deref_mut(),
            world_dt,
            &mut self.events,
        );
        // 5. Spawn controllers, adversary AI, crowd
        for spawner in &mut self.spawners {
            spawner.run(
                &mut self.world,
                &mut self.rng,
                &self.stats,
                self.player.position,
                self.physics.as_deref_mut(),
                &mut self.despawn_buffer,
                world_dt,
            );
        }
        let ai_frame = AiFrame {
            target: self.player.position,
            wanted_stars: self.stats.wanted_stars,
            target_immune: self.player.is_taser_immune(self.stats.rampage_active),
            dt: adversary_dt,
        };
        systems::adversary_ai::run(
            &mut self.world,
            &ai_frame,
            self.steering.as_mut(),
            self.physics.as_deref_mut(),
            &mut self.landed_buffer,
        );
        self.apply_landed_attacks();
        self.crowd.run(
            &mut self.world,
            &mut self.rng,
            self.player.position,
            &self.kill_buffer,
            self.physics.as_deref_mut(),
            &mut self.despawn_buffer,
            world_dt,
        );
        // 6. Rampage
        let health_percent = self.active_health_percent();
        let outcome = self.rampage.run(
            &mut self.stats,
            &self.tuning.rampage,
            &self.kill_buffer,
            health_percent,
            &mut self.player,
            self.physics.as_deref(),
            world_dt,
            &mut self.events,
        );
        if outcome.exited {
            self.tiers.follow_player(&self.player);
        }
        if outcome.entered.is_some() {
            self.hit_stop = self.hit_stop.max(self.rampage.take_hit_stop());
        }
        // 7. Projection
        self.stats.in_pursuit = systems::snapshot::count_living(&self.world) > 0;
        self.time.advance(world_dt);
        if self.time.tick % STATS_UPDATE_INTERVAL_TICKS == 0 {
            let snapshot = self.snapshot(frame.camera.as_ref());
            self.events.push(GameEvent::StatsUpdate(snapshot));
        }
        if self.stats.is_player_dead() && !self.game_over_sent {
            self.game_over_sent = true;
            self.phase = GamePhase::GameOver;
            log::info!(
                "Game over: score {}, {} kills ({} adversaries)",
                self.stats.score,
                self.stats.kills,
                self.stats.adversary_kills
            );
            let snapshot = self.snapshot(frame.camera.as_ref());
            self.events.push(GameEvent::GameOver(snapshot));
        }
    }

    /// Timers, movement and the action button for this tick.
    fn run_player(&mut self, input: &PlayerInput, dt: f32) -> Option<PlayerAction> {
        self.player.tick_timers(dt);
        let body = self.tiers.ridden_body(&self.player);
        let speed = self.tiers.player_speed(&self.player);
        self.player.integrate(input, speed, body, self.physics.as_deref_mut(), dt);
        self.tiers.follow_player(&self.player);

        let ctx = ActionContext {
            immobilized: self.player.is_immobilized(),
            stuck: self.player.is_stuck(),
            riding: self.player.riding,
            near_awaiting: self.tiers.near_awaiting(self.player.position),
            near_current: self.tiers.near_current(self.player.position),
        };
        let action = self.actions.update(input, &ctx)?;
        match action {
            PlayerAction::EscapeTaser => {
                if self.player.escape_taser() {
                    log::debug!("Player broke free of the taser");
                }
            }
            PlayerAction::ExitStuckVehicle => {
                self.tiers.exit_stuck(&mut self.player, self.physics.as_deref_mut());
            }
            PlayerAction::SwitchVehicle => {
                let swapped =
                    self.tiers.swap(&mut self.player, &self.tuning.tiers, &mut self.events);
                if let Some((from, to)) = swapped {
                    systems::tier::dismount_tied_adversaries(
                        &mut self.world,
                        from,
                        to,
                        self.physics.as_deref_mut(),
                        &mut self.events,
                    );
                }
            }
            PlayerAction::EnterVehicle => {
                self.tiers.enter(&mut self.player);
            }
            PlayerAction::Attack => {}
        }
        Some(action)
    }

    /// Resolve the player's attack and any vehicle ram.
    fn run_combat(&mut self, action: Option<PlayerAction>) {
        let origin = self.player.position;

        if action == Some(PlayerAction::Attack) && !self.player.riding {
            let query = if self.stats.rampage_active {
                self.events.push(GameEvent::SpawnEffect {
                    kind: EffectKind::Shockwave,
                    position: origin,
                });
                DamageQuery::blast(origin)
            } else {
                DamageQuery::melee(origin, self.player.facing)
            };
            let outcome =
                systems::combat::damage_in_radius(&mut self.world, &query, &mut self.kill_buffer);
            if outcome.hits > 0 {
                self.events.push(GameEvent::SpawnEffect {
                    kind: EffectKind::HitFlash,
                    position: origin,
                });
            }
        }

        if self.player.riding && self.player.velocity.length() > RAM_MIN_SPEED {
            let query = DamageQuery::ram(origin, self.player.velocity, self.tiers.effective_tier());
            systems::combat::damage_in_radius(&mut self.world, &query, &mut self.kill_buffer);
        }
    }

    /// Apply adversary attacks that connected this tick to the active body.
    fn apply_landed_attacks(&mut self) {
        for hit in &self.landed_buffer {
            let profile = get_profile(hit.class);
            match hit.kind {
                AttackKind::Taser => {
                    if self.player.tase(TASER_STUN_SECS, self.stats.rampage_active) {
                        self.events.push(GameEvent::PlayerTased { secs: TASER_STUN_SECS });
                        self.events.push(GameEvent::SpawnEffect {
                            kind: EffectKind::Taser,
                            position: self.player.position,
                        });
                    }
                }
                AttackKind::Strike | AttackKind::Projectile => {
                    if hit.kind == AttackKind::Projectile {
                        self.events.push(GameEvent::SpawnEffect {
                            kind: EffectKind::MuzzleFlash,
                            position: hit.from,
                        });
                    }
                    let damage = profile.damage_for(hit.kind);
                    if self.player.riding && self.tiers.current().is_some() {
                        self.tiers.damage_current(damage);
                    } else {
                        self.stats.health = (self.stats.health - damage).max(0.0);
                    }
                }
            }
        }
    }

    /// Health percentage of whatever the adversaries are hitting.
    fn active_health_percent(&self) -> f32 {
        match (self.player.riding, self.tiers.current()) {
            (true, Some(vehicle)) => vehicle.health_percent(),
            _ => self.stats.player_health_percent(),
        }
    }
}

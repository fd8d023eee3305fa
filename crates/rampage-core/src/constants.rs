//! Simulation constants and default tuning parameters.
//!
//! Values that designers adjust per build are mirrored in `config::GameTuning`;
//! the constants here are its defaults.

/// Nominal host frame rate (Hz).
pub const TARGET_FRAME_RATE: u32 = 60;

/// Seconds per nominal frame.
pub const NOMINAL_DT: f32 = 1.0 / TARGET_FRAME_RATE as f32;

/// Largest frame step the simulation accepts. Longer frames are clamped.
pub const MAX_FRAME_DT: f32 = 0.1;

// --- Player ---

pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_FOOT_SPEED: f32 = 6.0;
pub const PLAYER_COLLIDER_RADIUS: f32 = 0.4;

/// Seconds of immobilisation removed per escape press.
pub const TASER_ESCAPE_PER_PRESS_SECS: f32 = 0.6;
/// Immunity window after breaking free of a taser.
pub const TASER_IMMUNITY_SECS: f32 = 3.0;
/// Immobilisation applied by a taser hit.
pub const TASER_STUN_SECS: f32 = 2.5;

/// Riding with movement corrected below this fraction of intent counts as stuck.
pub const STUCK_PROGRESS_RATIO: f32 = 0.1;
/// Seconds of being stuck before the exit action is offered.
pub const STUCK_EXIT_SECS: f32 = 1.5;

// --- Combat ---

pub const MELEE_RADIUS: f32 = 2.0;
pub const MELEE_DAMAGE: f32 = 50.0;
pub const MELEE_HALF_ANGLE_DEG: f32 = 60.0;
pub const MELEE_KNOCKBACK: f32 = 6.0;

pub const BLAST_RADIUS: f32 = 6.0;
pub const BLAST_DAMAGE: f32 = 1000.0;
pub const BLAST_KNOCKBACK: f32 = 12.0;

pub const RAM_DAMAGE: f32 = 1000.0;
pub const RAM_HALF_ANGLE_DEG: f32 = 70.0;
pub const RAM_MIN_SPEED: f32 = 4.0;
pub const RAM_KNOCKBACK: f32 = 10.0;

/// Duration of the white flash on a struck entity.
pub const HIT_FLASH_SECS: f32 = 0.1;
/// Knockback velocity decay per second (fraction removed).
pub const KNOCKBACK_DAMPING: f32 = 8.0;

// --- Scoring ---

pub const COMBO_DURATION_SECS: f32 = 4.0;
pub const COMBO_SCALE: u32 = 20;
pub const COMBO_MAX_MULTIPLIER: f32 = 2.0;
pub const PURSUIT_MULTIPLIER: f32 = 1.5;
pub const PANIC_MULTIPLIER: f32 = 1.5;

pub const HEAT_MAX: f32 = 100.0;
pub const HEAT_DECAY_PER_SEC: f32 = 1.5;
/// Idle seconds after which heat decays at the accelerated rate.
pub const HEAT_IDLE_SECS: f32 = 10.0;
pub const HEAT_IDLE_DECAY_FACTOR: f32 = 3.0;

/// Adversary kills needed for one and two wanted stars.
pub const WANTED_STAR_THRESHOLDS: [u32; 2] = [3, 8];
pub const WANTED_MAX_STARS: u8 = 2;
/// Seconds without an adversary kill before one star decays.
pub const WANTED_DECAY_SECS: f32 = 45.0;

/// Stats updates are pushed to the UI every N ticks.
pub const STATS_UPDATE_INTERVAL_TICKS: u64 = 3;

// --- Tier progression ---

/// Score required for Bike, Moto, Sedan, Truck.
pub const TIER_THRESHOLDS: [u64; 4] = [300, 1_500, 4_000, 9_000];
pub const VEHICLE_RESPAWN_COOLDOWN_SECS: f32 = 8.0;
pub const VEHICLE_DISPOSAL_DELAY_SECS: f32 = 0.5;
/// Distance from the player at which new vehicles are placed.
pub const VEHICLE_SPAWN_OFFSET: f32 = 4.0;
pub const ENTER_VEHICLE_RANGE: f32 = 3.0;
pub const SWITCH_VEHICLE_RANGE: f32 = 3.5;
pub const GLOW_BASE_INTENSITY: f32 = 1.2;
/// Pulses per second of the awaiting-vehicle glow.
pub const GLOW_PULSE_HZ: f32 = 1.5;

// --- Rampage ---

pub const RAMPAGE_FUEL_MAX: f32 = 100.0;
pub const DOMINATION_COMBO: u32 = 12;
pub const DOMINATION_ADVERSARY_KILLS: u32 = 3;
pub const DOMINATION_HEAT: f32 = 50.0;
pub const DESPERATION_HEALTH_PERCENT: f32 = 25.0;
pub const DESPERATION_ADVERSARY_KILLS: u32 = 2;
pub const RAMPAGE_ADVERSARY_TIME_SCALE: f32 = 0.5;
pub const RAMPAGE_HIT_STOP_SECS: f32 = 0.12;
pub const RAMPAGE_SLOWMO_SECS: f32 = 0.8;
pub const RAMPAGE_SLOWMO_FLOOR: f32 = 0.3;
/// Upper bound (exclusive) in seconds of each drain band but the last.
pub const FUEL_DRAIN_BAND_ENDS: [f32; 3] = [5.0, 10.0, 15.0];
/// Fuel drained per second in each of the four bands.
pub const FUEL_DRAIN_RATES: [f32; 4] = [4.0, 6.0, 9.0, 14.0];

// --- Relocation probe ---

pub const PROBE_RADIUS_STEP: f32 = 2.0;
pub const PROBE_MAX_RADIUS: f32 = 20.0;
pub const PROBE_ANGLES: usize = 8;
pub const PROBE_HEIGHT: f32 = 10.0;
pub const PROBE_CLEARANCE: f32 = 1.0;
/// Height of the cardinal clearance rays.
pub const PROBE_CHEST_HEIGHT: f32 = 1.0;

// --- Crowd ---

pub const CROWD_SIZE: usize = 10;
pub const CROWD_RADIUS: f32 = 18.0;
pub const CROWD_DESPAWN_RADIUS: f32 = 40.0;
pub const BYSTANDER_HEALTH: f32 = 20.0;
pub const BYSTANDER_WALK_SPEED: f32 = 1.4;
pub const BYSTANDER_FLEE_SPEED: f32 = 4.5;
pub const PANIC_RADIUS: f32 = 10.0;
pub const PANIC_SECS: f32 = 4.0;
pub const BYSTANDER_BASE_POINTS: u32 = 10;
pub const BYSTANDER_HEAT_GAIN: f32 = 2.0;

//! Adversary behavior finite state machine.
//!
//! Pure functions that compute phase transitions and timer updates for one
//! adversary from its class, current phase and situation.
//! No ECS dependency; operates on plain data. Movement integration belongs
//! to the caller; the FSM only says whether the agent may move this tick.

use rampage_core::enums::{AdversaryClass, AiPhase, AttackKind};

use crate::profiles::{get_profile, AdversaryProfile};

/// How far beyond its nominal range an attack still connects when it lands.
pub const RANGE_TOLERANCE: f32 = 1.25;

/// Input to the FSM for a single adversary.
#[derive(Debug, Clone, Copy)]
pub struct AdversaryContext {
    pub class: AdversaryClass,
    pub phase: AiPhase,
    pub health: f32,
    pub distance_to_target: f32,
    pub wanted_stars: u8,
    /// The target cannot currently be tased.
    pub target_immune: bool,
    pub attack_cooldown: f32,
    pub hit_stun: f32,
    pub stun_pending: bool,
    pub attack_kind: AttackKind,
    pub attack_elapsed: f32,
    pub attack_dealt: bool,
    /// Adversary-scaled seconds for this tick.
    pub dt: f32,
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdversaryUpdate {
    pub new_phase: AiPhase,
    pub phase_changed: bool,
    pub attack_cooldown: f32,
    pub hit_stun: f32,
    pub stun_pending: bool,
    pub attack_kind: AttackKind,
    pub attack_elapsed: f32,
    pub attack_dealt: bool,
    /// Attack that connected this tick, if any.
    pub landed: Option<AttackKind>,
    /// Whether the agent should chase this tick.
    pub moves: bool,
}

/// What a successful hit against the adversary does to its phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReaction {
    /// Enter (or refresh) hit stun now.
    Stun,
    /// Mid-attack: stun once the animation finishes.
    Defer,
    /// Already dead.
    Ignore,
}

/// Pick the attack the current wanted level calls for.
pub fn select_attack(wanted_stars: u8, target_immune: bool) -> AttackKind {
    match wanted_stars {
        0 => AttackKind::Strike,
        1 if target_immune => AttackKind::Strike,
        1 => AttackKind::Taser,
        _ => AttackKind::Projectile,
    }
}

/// Classify a hit against an adversary in `phase`.
pub fn hit_reaction(phase: AiPhase) -> HitReaction {
    match phase {
        AiPhase::Dead => HitReaction::Ignore,
        AiPhase::Attacking => HitReaction::Defer,
        AiPhase::Chasing | AiPhase::HitStunned => HitReaction::Stun,
    }
}

/// Evaluate the FSM for one adversary.
pub fn evaluate(ctx: &AdversaryContext) -> AdversaryUpdate {
    let mut update = AdversaryUpdate {
        new_phase: ctx.phase,
        phase_changed: false,
        attack_cooldown: ctx.attack_cooldown,
        hit_stun: ctx.hit_stun,
        stun_pending: ctx.stun_pending,
        attack_kind: ctx.attack_kind,
        attack_elapsed: ctx.attack_elapsed,
        attack_dealt: ctx.attack_dealt,
        landed: None,
        moves: false,
    };

    // Terminal state, no transitions
    if ctx.phase == AiPhase::Dead {
        return update;
    }
    // Death interrupts everything, including attacks and stun.
    if ctx.health <= 0.0 {
        update.new_phase = AiPhase::Dead;
        update.phase_changed = true;
        update.stun_pending = false;
        return update;
    }

    let profile = get_profile(ctx.class);
    update.attack_cooldown = (ctx.attack_cooldown - ctx.dt).max(0.0);

    match ctx.phase {
        AiPhase::Chasing => evaluate_chasing(ctx, &profile, update),
        AiPhase::Attacking => evaluate_attacking(ctx, &profile, update),
        AiPhase::HitStunned => evaluate_stunned(ctx, update),
        AiPhase::Dead => update,
    }
}

fn evaluate_chasing(
    ctx: &AdversaryContext,
    profile: &AdversaryProfile,
    mut update: AdversaryUpdate,
) -> AdversaryUpdate {
    let kind = select_attack(ctx.wanted_stars, ctx.target_immune);
    if update.attack_cooldown <= 0.0 && ctx.distance_to_target <= profile.range_for(kind) {
        update.new_phase = AiPhase::Attacking;
        update.phase_changed = true;
        update.attack_kind = kind;
        update.attack_elapsed = 0.0;
        update.attack_dealt = false;
        return update;
    }
    update.moves = true;
    update
}

fn evaluate_attacking(
    ctx: &AdversaryContext,
    profile: &AdversaryProfile,
    mut update: AdversaryUpdate,
) -> AdversaryUpdate {
    update.attack_elapsed = ctx.attack_elapsed + ctx.dt;

    // Damage resolves exactly once, at the hit point of the animation.
    let hit_at = profile.attack_duration_secs * profile.attack_hit_point;
    if !ctx.attack_dealt && update.attack_elapsed >= hit_at {
        update.attack_dealt = true;
        let reach = profile.range_for(ctx.attack_kind) * RANGE_TOLERANCE;
        if ctx.distance_to_target <= reach {
            update.landed = Some(ctx.attack_kind);
        }
    }

    if update.attack_elapsed >= profile.attack_duration_secs {
        update.attack_cooldown = profile.attack_cooldown_secs;
        update.attack_elapsed = 0.0;
        update.phase_changed = true;
        if ctx.stun_pending {
            update.new_phase = AiPhase::HitStunned;
            update.hit_stun = profile.hit_stun_secs;
            update.stun_pending = false;
        } else {
            update.new_phase = AiPhase::Chasing;
        }
    }
    update
}

fn evaluate_stunned(ctx: &AdversaryContext, mut update: AdversaryUpdate) -> AdversaryUpdate {
    update.hit_stun = (ctx.hit_stun - ctx.dt).max(0.0);
    if update.hit_stun <= 0.0 {
        update.new_phase = AiPhase::Chasing;
        update.phase_changed = true;
    }
    update
}

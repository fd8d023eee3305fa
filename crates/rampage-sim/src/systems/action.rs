//! Action arbitration: at most one discrete action per tick, triggered on
//! the press edge of the action button.

use rampage_core::commands::PlayerInput;
use rampage_core::enums::PlayerAction;

/// What the resolver needs to know about the player's surroundings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionContext {
    pub immobilized: bool,
    /// Riding and making no progress for long enough to offer an exit.
    pub stuck: bool,
    pub riding: bool,
    /// Within switch range of the awaiting vehicle.
    pub near_awaiting: bool,
    /// Within enter range of the current vehicle.
    pub near_current: bool,
}

/// Highest-priority action available in `ctx`.
pub fn resolve(ctx: &ActionContext) -> Option<PlayerAction> {
    if ctx.immobilized {
        Some(PlayerAction::EscapeTaser)
    } else if ctx.stuck {
        Some(PlayerAction::ExitStuckVehicle)
    } else if ctx.near_awaiting {
        Some(PlayerAction::SwitchVehicle)
    } else if ctx.near_current && !ctx.riding {
        Some(PlayerAction::EnterVehicle)
    } else if !ctx.riding {
        Some(PlayerAction::Attack)
    } else {
        None
    }
}

/// Edge detector over the action button.
#[derive(Debug, Default, Clone)]
pub struct ActionController {
    was_held: bool,
}

impl ActionController {
    /// Returns the action for this tick, if the button was just pressed.
    pub fn update(&mut self, input: &PlayerInput, ctx: &ActionContext) -> Option<PlayerAction> {
        let pressed = input.action_held && !self.was_held;
        self.was_held = input.action_held;
        if pressed {
            resolve(ctx)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.was_held = false;
    }
}

//! ECS components for combatants.
//!
//! The `Gun` component lives in [`crate::gun`]; `Side` and `Facing` live in [`crate::types`].

use bevy::prelude::*;

use crate::types::{Facing, Side};

/// Remaining health of a combatant. Zero or below means defeated.
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq, Eq)]
#[reflect(Component)]
pub struct Health(pub i32);

impl Health {
    pub fn is_defeated(&self) -> bool {
        self.0 <= 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self(100)
    }
}

/// World-space bounding box of a combatant.
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Component)]
pub struct Hitbox(pub Rect);

/// Trigger state written by the game's input handling.
///
/// `held` is the level; `just_pressed` and `just_released` are edges consumed once per
/// fixed step by `apply_trigger_input`.
///
/// # Example
/// ```
/// use bevy_gunplay::components::TriggerInput;
///
/// let mut trigger = TriggerInput::default();
/// trigger.press();
/// assert!(trigger.held && trigger.just_pressed);
/// trigger.clear_edges();
/// trigger.release();
/// assert!(!trigger.held && trigger.just_released);
/// ```
#[derive(Component, Reflect, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct TriggerInput {
    pub held: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

impl TriggerInput {
    /// Presses the trigger. Ignored if it is already held.
    pub fn press(&mut self) {
        if !self.held {
            self.held = true;
            self.just_pressed = true;
        }
    }

    /// Releases the trigger. Ignored if it is not held.
    pub fn release(&mut self) {
        if self.held {
            self.held = false;
            self.just_released = true;
        }
    }

    /// Sets the level, producing an edge when it changes.
    pub fn set(&mut self, held: bool) {
        if held {
            self.press();
        } else {
            self.release();
        }
    }

    pub fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Everything a combatant entity needs to be shot at and to shoot.
///
/// The `Gun` is inserted separately since it is built from the `Armory` resource.
#[derive(Bundle, Clone, Debug)]
pub struct CombatantBundle {
    pub side: Side,
    pub facing: Facing,
    pub hitbox: Hitbox,
    pub health: Health,
    pub trigger: TriggerInput,
}

impl CombatantBundle {
    pub fn new(side: Side, bounds: Rect, health: i32) -> Self {
        Self {
            side,
            facing: Facing::default(),
            hitbox: Hitbox(bounds),
            health: Health(health),
            trigger: TriggerInput::default(),
        }
    }

    /// Builder pattern: set facing
    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_edges_only_on_change() {
        let mut trigger = TriggerInput::default();
        trigger.release();
        assert_eq!(trigger, TriggerInput::default());

        trigger.set(true);
        trigger.clear_edges();
        trigger.set(true);
        assert!(trigger.held);
        assert!(!trigger.just_pressed);

        trigger.set(false);
        assert!(trigger.just_released);
    }

    #[test]
    fn test_health_defeated_at_zero() {
        assert!(!Health(1).is_defeated());
        assert!(Health(0).is_defeated());
        assert!(Health(-20).is_defeated());
    }
}

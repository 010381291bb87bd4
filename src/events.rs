//! Messages for the gunplay system.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::combat::RemovalCause;
use crate::types::WeaponTier;

/// Sent when a bullet strikes the opposing combatant.
///
/// # Fields
/// * `shooter` - Entity owning the gun that fired
/// * `target` - Entity that was hit
/// * `damage` - Health removed
/// * `point` - Bullet position at impact
/// * `lethal` - Whether the hit took the target to zero health or below
#[derive(Message, Clone, Debug, PartialEq)]
pub struct HitEvent {
    pub shooter: Entity,
    pub target: Entity,
    pub damage: i32,
    pub point: Vec2,
    pub lethal: bool,
}

/// Why a gun changed tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum TierChangeReason {
    /// The gun's bullet landed a lethal hit
    Kill,
    /// Requested by the game through [`TierChangeRequest`]
    Manual,
}

/// Sent whenever a gun moves to another tier.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct TierChangedEvent {
    pub gun: Entity,
    pub from: WeaponTier,
    pub to: WeaponTier,
    pub reason: TierChangeReason,
}

/// Sent when a bullet leaves play without hitting anyone.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct BulletExpiredEvent {
    pub shooter: Entity,
    pub point: Vec2,
    pub cause: RemovalCause,
}

/// Direction of a requested tier change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum TierStep {
    Up,
    Down,
}

/// Written by the game to move a gun one tier up or down.
///
/// Requests at the ends of the progression are dropped silently.
///
/// # Example
/// ```
/// use bevy::ecs::message::MessageWriter;
/// use bevy::prelude::*;
/// use bevy_gunplay::events::{TierChangeRequest, TierStep};
///
/// fn punish(mut requests: MessageWriter<TierChangeRequest>, gun: Entity) {
///     requests.write(TierChangeRequest::new(gun, TierStep::Down));
/// }
/// ```
#[derive(Message, Clone, Debug, PartialEq)]
pub struct TierChangeRequest {
    pub gun: Entity,
    pub step: TierStep,
}

impl TierChangeRequest {
    pub fn new(gun: Entity, step: TierStep) -> Self {
        Self { gun, step }
    }
}

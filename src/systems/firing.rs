//! Firing systems: trigger input, gun placement, the per-tick gun update and tier requests.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::components::{Health, Hitbox, TriggerInput};
use crate::events::{
    BulletExpiredEvent, HitEvent, TierChangeReason, TierChangeRequest, TierChangedEvent, TierStep,
};
use crate::gun::Gun;
use crate::resources::{ArenaGeometry, GunplayConfig};
use crate::types::{Combatant, Facing, Side};

/// A combatant entity seen through the [`Combatant`] trait for the duration of one update.
struct CombatantView<'a> {
    side: Side,
    facing: Facing,
    bounds: Rect,
    health: Mut<'a, Health>,
    trigger_held: bool,
}

impl Combatant for CombatantView<'_> {
    fn bounding_box(&self) -> Rect {
        self.bounds
    }

    fn facing(&self) -> Facing {
        self.facing
    }

    fn health(&self) -> i32 {
        self.health.0
    }

    fn apply_damage(&mut self, amount: i32) {
        self.health.0 -= amount;
    }

    fn side(&self) -> Side {
        self.side
    }

    fn is_trigger_held(&self) -> bool {
        self.trigger_held
    }
}

/// Turns trigger edges into `fire` / `stop_firing` calls.
///
/// A press and a release within the same step fire once and then release.
///
/// # Arguments
/// * `time` - Fixed-step clock
/// * `guns` - Guns with the trigger input of their owner
pub fn apply_trigger_input(
    time: Res<Time<Fixed>>,
    mut guns: Query<(&mut Gun, &mut TriggerInput)>,
) {
    for (mut gun, mut trigger) in guns.iter_mut() {
        if trigger.just_pressed {
            gun.fire(&*time, trigger.held);
        }
        if trigger.just_released {
            gun.stop_firing(&*time);
        }
        trigger.clear_edges();
    }
}

/// Keeps each gun anchored to its owner's hitbox and facing.
pub fn sync_guns_to_owners(
    mut guns: Query<(&mut Gun, &Hitbox, &Facing), Or<(Changed<Hitbox>, Changed<Facing>)>>,
) {
    for (mut gun, hitbox, facing) in guns.iter_mut() {
        gun.follow_owner(hitbox.0, *facing);
    }
}

/// Runs one gun update per gun against the first combatant of the opposing side.
///
/// Bullet outcomes are published as [`HitEvent`], [`BulletExpiredEvent`] and, for lethal
/// hits that upgraded the gun, [`TierChangedEvent`].
///
/// # Arguments
/// * `time` - Fixed-step clock; its delta is converted into bullet ticks
/// * `config` - Tick rate
/// * `arena` - Level collision queries
/// * `guns` - Shooters
/// * `targets` - Every combatant that can be shot
pub fn update_guns(
    time: Res<Time<Fixed>>,
    config: Res<GunplayConfig>,
    arena: Res<ArenaGeometry>,
    mut guns: Query<(Entity, &mut Gun, Option<&TriggerInput>)>,
    mut targets: Query<(Entity, &Side, &Facing, &Hitbox, &mut Health, Option<&TriggerInput>)>,
    mut hit_events: MessageWriter<HitEvent>,
    mut tier_events: MessageWriter<TierChangedEvent>,
    mut expired_events: MessageWriter<BulletExpiredEvent>,
) {
    let delta_ticks = config.ticks_for(time.delta_secs());

    for (shooter, mut gun, trigger) in guns.iter_mut() {
        let opponent = gun.side().opponent();
        let target = targets
            .iter_mut()
            .find(|(_, side, ..)| **side == opponent);

        let target_entity = target.as_ref().map(|(entity, ..)| *entity);
        let mut view = target.map(|(_, side, facing, hitbox, health, trigger)| CombatantView {
            side: *side,
            facing: *facing,
            bounds: hitbox.0,
            health,
            trigger_held: trigger.is_some_and(|t| t.held),
        });

        let report = gun.update(
            delta_ticks,
            &*time,
            &*arena,
            view.as_mut().map(|v| v as &mut dyn Combatant),
            trigger.is_some_and(|t| t.held),
        );

        if let Some(target) = target_entity {
            for hit in &report.hits {
                hit_events.write(HitEvent {
                    shooter,
                    target,
                    damage: hit.damage,
                    point: hit.position,
                    lethal: hit.lethal,
                });
                if let Some((from, to)) = hit.upgrade {
                    tier_events.write(TierChangedEvent {
                        gun: shooter,
                        from,
                        to,
                        reason: TierChangeReason::Kill,
                    });
                }
            }
        }

        for expired in &report.expired {
            expired_events.write(BulletExpiredEvent {
                shooter,
                point: expired.position,
                cause: expired.cause,
            });
        }
    }
}

/// Applies [`TierChangeRequest`]s written by the game.
pub fn apply_tier_requests(
    mut requests: MessageReader<TierChangeRequest>,
    mut guns: Query<&mut Gun>,
    mut tier_events: MessageWriter<TierChangedEvent>,
) {
    for request in requests.read() {
        let Ok(mut gun) = guns.get_mut(request.gun) else {
            warn!("tier change requested for {:?}, which has no gun", request.gun);
            continue;
        };

        let from = gun.tier();
        let changed = match request.step {
            TierStep::Up => gun.upgrade(),
            TierStep::Down => gun.downgrade(),
        };
        if changed {
            tier_events.write(TierChangedEvent {
                gun: request.gun,
                from,
                to: gun.tier(),
                reason: TierChangeReason::Manual,
            });
        }
    }
}

//! Combat resolution: why bullets leave play, and what a hit does.

use bevy::prelude::*;

use crate::bullet::Bullet;
use crate::gun::Gun;
use crate::types::{CollisionOracle, Combatant, Facing, Side, WeaponTier};

/// Why a bullet was removed from its gun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum RemovalCause {
    /// Struck the opposing combatant
    HitTarget,
    /// Traveled further than its range
    OutOfRange,
    /// Left the playable area
    OutOfBounds,
    /// Struck static level geometry
    HitGeometry,
}

/// Decides whether `bullet` leaves play this tick.
///
/// A target overlap wins over every other cause, so a bullet that reaches the target on the
/// same tick it runs out of range still deals damage.
///
/// # Arguments
/// * `bullet` - Bullet after this tick's movement
/// * `oracle` - Level collision queries
/// * `target` - Bounding box of the opposing combatant, if there is one
///
/// # Returns
/// `None` if the bullet survives the tick
pub fn removal_cause(
    bullet: &Bullet,
    oracle: &impl CollisionOracle,
    target: Option<Rect>,
) -> Option<RemovalCause> {
    let bounds = bullet.bounding_box();

    if target.is_some_and(|target| oracle.overlaps(target, bounds)) {
        Some(RemovalCause::HitTarget)
    } else if bullet.is_spent() {
        Some(RemovalCause::OutOfRange)
    } else if oracle.is_out_of_world_bounds(bounds) {
        Some(RemovalCause::OutOfBounds)
    } else if oracle.overlaps_static_geometry(bounds) {
        Some(RemovalCause::HitGeometry)
    } else {
        None
    }
}

/// A bullet that struck the opposing combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletHit {
    /// Bullet position at impact
    pub position: Vec2,
    /// Damage applied to the target
    pub damage: i32,
    /// Whether the hit took the target to zero health or below
    pub lethal: bool,
    /// Tier change of the shooting gun caused by this hit, as `(from, to)`
    pub upgrade: Option<(WeaponTier, WeaponTier)>,
}

/// A bullet removed without hitting anyone.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpiredBullet {
    pub position: Vec2,
    pub cause: RemovalCause,
}

/// Everything that happened to a gun's bullets during one `Gun::update`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub hits: Vec<BulletHit>,
    pub expired: Vec<ExpiredBullet>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.expired.is_empty()
    }

    /// Number of bullets removed for `cause`.
    pub fn count(&self, cause: RemovalCause) -> usize {
        match cause {
            RemovalCause::HitTarget => self.hits.len(),
            _ => self.expired.iter().filter(|e| e.cause == cause).count(),
        }
    }
}

/// Applies a bullet's damage to `target`.
///
/// When the hit is lethal the shooting gun is upgraded *before* the damage lands, so the
/// upgrade reflects the kill that is about to happen. The target always takes the full
/// damage.
pub fn resolve_hit(gun: &mut Gun, bullet: &Bullet, target: &mut dyn Combatant) -> BulletHit {
    let damage = bullet.damage();
    let lethal = target.health() - damage <= 0;

    let upgrade = if lethal {
        let from = gun.tier();
        gun.upgrade().then(|| (from, gun.tier()))
    } else {
        None
    };

    target.apply_damage(damage);
    debug!(
        "{:?} bullet hit {:?} for {} (health now {})",
        bullet.owner(),
        target.side(),
        damage,
        target.health()
    );

    BulletHit {
        position: bullet.position(),
        damage,
        lethal,
        upgrade,
    }
}

/// A standalone combatant for simulations outside the ECS.
#[derive(Clone, Debug, PartialEq)]
pub struct Duelist {
    pub side: Side,
    pub facing: Facing,
    pub bounds: Rect,
    pub health: i32,
    pub trigger_held: bool,
}

impl Duelist {
    pub fn new(side: Side, bounds: Rect, health: i32) -> Self {
        Self {
            side,
            facing: Facing::default(),
            bounds,
            health,
            trigger_held: false,
        }
    }

    /// Builder pattern: set facing.
    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

impl Combatant for Duelist {
    fn bounding_box(&self) -> Rect {
        self.bounds
    }

    fn facing(&self) -> Facing {
        self.facing
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn apply_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    fn side(&self) -> Side {
        self.side
    }

    fn is_trigger_held(&self) -> bool {
        self.trigger_held
    }
}

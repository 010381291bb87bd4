//! Bullet entity: a projectile owned by the gun that fired it.

use bevy::prelude::*;

use crate::gun::Gun;
use crate::types::{AssetKey, BulletKind, Facing, Side};

/// A live bullet.
///
/// Damage, range and visual kind are copied from the catalog row that was active when the
/// bullet was fired, so later upgrades of the gun never change bullets already in flight.
///
/// Velocity is in world units per tick. Traveled distance only accumulates the horizontal
/// component, which is what range is measured against.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    kind: BulletKind,
    damage: i32,
    range: f32,
    distance_traveled: f32,
    owner: Side,
    sprite: AssetKey,
}

impl Bullet {
    /// Creates a bullet at `gun`'s muzzle.
    ///
    /// The muzzle is the gun box edge on the facing side, vertically centered.
    pub fn spawn(gun: &Gun) -> Self {
        let properties = gun.properties();
        let facing = gun.facing();
        let kind = properties.bullet_kind;

        Self {
            position: gun.muzzle(),
            velocity: Vec2::new(properties.projectile_speed * facing.sign(), 0.0),
            facing,
            kind,
            damage: properties.damage_per_hit,
            range: properties.range,
            distance_traveled: 0.0,
            owner: gun.side(),
            sprite: gun.armory().sprites.bullet_key(kind, facing),
        }
    }

    /// Builder pattern: set the vertical velocity, used for shotgun spread.
    pub fn with_vertical_velocity(mut self, vertical: f32) -> Self {
        self.velocity.y = vertical;
        self
    }

    /// Moves the bullet by `delta_ticks` worth of velocity.
    pub fn advance(&mut self, delta_ticks: f32) {
        self.position += self.velocity * delta_ticks;
        self.distance_traveled += self.velocity.x.abs() * delta_ticks;
    }

    /// Whether the bullet has flown further than its range.
    pub fn is_spent(&self) -> bool {
        self.distance_traveled.abs() > self.range
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_center_size(self.position, self.kind.size())
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn kind(&self) -> BulletKind {
        self.kind
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    pub fn owner(&self) -> Side {
        self.owner
    }

    pub fn sprite(&self) -> &AssetKey {
        &self.sprite
    }
}

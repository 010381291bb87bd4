//! Global resources for the gunplay system.

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::{
    AssetKey, BulletKind, CollisionOracle, Facing, FireMode, SimClock, SpriteKeys, WeaponTier,
};

/// Global configuration for the gunplay plugin.
///
/// # Fields
/// * `ticks_per_second` - Simulation ticks per second; bullet velocities are in units per tick
/// * `debug_draw` - Whether to draw gun, bullet and arena boxes with gizmos
///
/// # Example
/// ```
/// use bevy_gunplay::resources::GunplayConfig;
///
/// let config = GunplayConfig {
///     ticks_per_second: 30.0,
///     debug_draw: true,
/// };
/// ```
#[derive(Resource, Reflect, Clone, Debug)]
#[reflect(Resource)]
pub struct GunplayConfig {
    /// Simulation ticks per second
    pub ticks_per_second: f32,
    /// Debug visualization
    pub debug_draw: bool,
}

impl Default for GunplayConfig {
    /// 60 ticks per second, debug drawing off.
    fn default() -> Self {
        Self {
            ticks_per_second: 60.0,
            debug_draw: false,
        }
    }
}

impl GunplayConfig {
    /// Converts an elapsed duration in seconds into simulation ticks.
    pub fn ticks_for(&self, delta_secs: f32) -> f32 {
        delta_secs * self.ticks_per_second
    }
}

/// Timing and geometry rules shared by every gun.
///
/// # Fields
/// * `burst_cooldown_ms` - Minimum time after a trigger release before a new burst may start
/// * `burst_length` - Rounds per burst for `FireMode::Burst`
/// * `shotgun_spread` - Vertical velocity offsets, one pellet each, for `FireMode::Shotgun`
/// * `gun_size` - Size of the gun's bounding box
/// * `owner_inset` - How far the gun overlaps its owner's box on the facing side
#[derive(Reflect, Clone, Debug, PartialEq)]
pub struct FiringRules {
    pub burst_cooldown_ms: u64,
    pub burst_length: u8,
    pub shotgun_spread: [f32; 3],
    pub gun_size: Vec2,
    pub owner_inset: f32,
}

impl Default for FiringRules {
    fn default() -> Self {
        Self {
            burst_cooldown_ms: 300,
            burst_length: 3,
            shotgun_spread: [-1.0, 0.0, 1.0],
            gun_size: Vec2::new(24.0, 10.0),
            owner_inset: 5.0,
        }
    }
}

/// One row of the weapon catalog.
///
/// # Fields
/// * `fire_mode` - How trigger state maps to bullet spawns
/// * `magazine_capacity` - Rounds in a full magazine (display only)
/// * `inter_shot_delay_ms` - A shot is allowed once strictly more than this has elapsed
/// * `damage_per_hit` - Health removed by one bullet
/// * `range` - Horizontal distance a bullet travels before it expires
/// * `bullet_kind` - Visual class of the bullets
/// * `projectile_speed` - Horizontal bullet speed in world units per tick
#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct WeaponProperties {
    pub fire_mode: FireMode,
    pub magazine_capacity: u8,
    pub inter_shot_delay_ms: u64,
    pub damage_per_hit: i32,
    pub range: f32,
    pub bullet_kind: BulletKind,
    pub projectile_speed: f32,
}

impl WeaponProperties {
    const fn row(
        fire_mode: FireMode,
        magazine_capacity: u8,
        inter_shot_delay_ms: u64,
        damage_per_hit: i32,
        range: f32,
        bullet_kind: BulletKind,
        projectile_speed: f32,
    ) -> Self {
        Self {
            fire_mode,
            magazine_capacity,
            inter_shot_delay_ms,
            damage_per_hit,
            range,
            bullet_kind,
            projectile_speed,
        }
    }
}

/// Immutable per-tier weapon table.
///
/// The lookup is total over [`WeaponTier`]; an invalid tier cannot be expressed.
///
/// # Example
/// ```
/// use bevy_gunplay::resources::WeaponCatalog;
/// use bevy_gunplay::types::{FireMode, WeaponTier};
///
/// let catalog = WeaponCatalog::standard();
/// assert_eq!(catalog.properties_of(WeaponTier::Rifle).fire_mode, FireMode::Burst);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponCatalog {
    rows: [WeaponProperties; WeaponTier::COUNT],
}

impl WeaponCatalog {
    /// Builds a catalog from rows listed in tier order.
    pub fn new(rows: [WeaponProperties; WeaponTier::COUNT]) -> Self {
        Self { rows }
    }

    /// The stock table.
    ///
    /// | tier     | mode  | mag | delay ms | dmg | range | bullet | speed |
    /// |----------|-------|-----|----------|-----|-------|--------|-------|
    /// | Pistol   | semi  | 12  | 250      | 10  | 400   | Light  | 9     |
    /// | Smg      | auto  | 30  | 80       | 5   | 300   | Light  | 10    |
    /// | Rifle    | burst | 30  | 70       | 8   | 450   | Medium | 11    |
    /// | Assault  | auto  | 30  | 120      | 12  | 600   | Medium | 12    |
    /// | Revolver | semi  | 6   | 400      | 25  | 500   | Magnum | 12    |
    /// | Shotgun  | spread| 8   | 700      | 12  | 220   | Pellet | 8     |
    /// | Sniper   | semi  | 5   | 1200     | 50  | 1200  | Rifle  | 18    |
    pub fn standard() -> Self {
        use BulletKind::*;
        use FireMode::*;

        Self::new([
            WeaponProperties::row(Semiautomatic, 12, 250, 10, 400.0, Light, 9.0),
            WeaponProperties::row(FullyAutomatic, 30, 80, 5, 300.0, Light, 10.0),
            WeaponProperties::row(Burst, 30, 70, 8, 450.0, Medium, 11.0),
            WeaponProperties::row(FullyAutomatic, 30, 120, 12, 600.0, Medium, 12.0),
            WeaponProperties::row(Semiautomatic, 6, 400, 25, 500.0, Magnum, 12.0),
            WeaponProperties::row(Shotgun, 8, 700, 12, 220.0, Pellet, 8.0),
            WeaponProperties::row(Semiautomatic, 5, 1200, 50, 1200.0, Rifle, 18.0),
        ])
    }

    pub fn properties_of(&self, tier: WeaponTier) -> &WeaponProperties {
        &self.rows[tier.index()]
    }

    /// Rows in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (WeaponTier, &WeaponProperties)> {
        WeaponTier::ALL.into_iter().zip(self.rows.iter())
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Sprite keys of the form `weapons/<tier>_<facing>` and `bullets/<kind>_<facing>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NamedSpriteKeys;

impl SpriteKeys for NamedSpriteKeys {
    fn weapon_key(&self, tier: WeaponTier, facing: Facing) -> AssetKey {
        format!("weapons/{}_{}", tier.name(), facing.suffix()).into()
    }

    fn bullet_key(&self, kind: BulletKind, facing: Facing) -> AssetKey {
        format!("bullets/{}_{}", kind.name(), facing.suffix()).into()
    }
}

/// Read-only data every gun is constructed with.
///
/// Cloning is cheap; all members are shared.
///
/// # Fields
/// * `catalog` - Per-tier weapon table
/// * `rules` - Burst, spread and placement rules
/// * `sprites` - Sprite key resolver
#[derive(Resource, Clone, Debug)]
pub struct Armory {
    pub catalog: Arc<WeaponCatalog>,
    pub rules: Arc<FiringRules>,
    pub sprites: Arc<dyn SpriteKeys>,
}

impl Default for Armory {
    fn default() -> Self {
        Self::new(WeaponCatalog::standard(), FiringRules::default())
    }
}

impl Armory {
    /// Creates an armory using [`NamedSpriteKeys`].
    pub fn new(catalog: WeaponCatalog, rules: FiringRules) -> Self {
        Self {
            catalog: Arc::new(catalog),
            rules: Arc::new(rules),
            sprites: Arc::new(NamedSpriteKeys),
        }
    }

    /// Builder pattern: replace the sprite key resolver.
    pub fn with_sprites(mut self, sprites: impl SpriteKeys) -> Self {
        self.sprites = Arc::new(sprites);
        self
    }
}

/// Playable area and static level blocks.
///
/// A box is out of bounds once its center leaves `bounds`.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_gunplay::resources::ArenaGeometry;
/// use bevy_gunplay::types::CollisionOracle;
///
/// let arena = ArenaGeometry::new(Rect::new(0.0, 0.0, 800.0, 600.0))
///     .with_block(Rect::new(300.0, 0.0, 340.0, 120.0));
///
/// assert!(arena.overlaps_static_geometry(Rect::new(310.0, 10.0, 320.0, 20.0)));
/// assert!(arena.is_out_of_world_bounds(Rect::new(900.0, 10.0, 910.0, 20.0)));
/// ```
#[derive(Resource, Reflect, Clone, Debug)]
#[reflect(Resource)]
pub struct ArenaGeometry {
    /// Playable area
    pub bounds: Rect,
    /// Static blocks bullets cannot pass
    pub blocks: Vec<Rect>,
}

impl Default for ArenaGeometry {
    /// A 1280x720 area centered on the origin with no blocks.
    fn default() -> Self {
        Self::new(Rect::from_center_size(Vec2::ZERO, Vec2::new(1280.0, 720.0)))
    }
}

impl ArenaGeometry {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            blocks: Vec::new(),
        }
    }

    /// Builder pattern: add a static block.
    pub fn with_block(mut self, block: Rect) -> Self {
        self.blocks.push(block);
        self
    }
}

impl CollisionOracle for ArenaGeometry {
    fn overlaps_static_geometry(&self, bounds: Rect) -> bool {
        self.blocks.iter().any(|block| self.overlaps(*block, bounds))
    }

    fn is_out_of_world_bounds(&self, bounds: Rect) -> bool {
        !self.bounds.contains(bounds.center())
    }
}

/// Hand-driven clock for deterministic simulations and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    pub fn at(millis: u64) -> Self {
        Self { now: millis }
    }

    pub fn advance(&mut self, millis: u64) {
        self.now += millis;
    }
}

impl SimClock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now
    }
}

//! Common types, enums and collaborator traits for the gunplay system.

use std::borrow::Cow;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Weapon progression level.
///
/// Tiers are totally ordered from [`WeaponTier::MIN`] to [`WeaponTier::MAX`]; a kill moves
/// the shooter's gun one step up, and upgrades and downgrades saturate at the ends.
///
/// # Example
/// ```
/// use bevy_gunplay::types::WeaponTier;
///
/// assert!(WeaponTier::Pistol < WeaponTier::Sniper);
/// assert_eq!(WeaponTier::Pistol.next(), Some(WeaponTier::Smg));
/// assert_eq!(WeaponTier::Sniper.next(), None);
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Reflect, Serialize, Deserialize,
)]
pub enum WeaponTier {
    #[default]
    Pistol,
    Smg,
    Rifle,
    Assault,
    Revolver,
    Shotgun,
    Sniper,
}

impl WeaponTier {
    /// Number of tiers.
    pub const COUNT: usize = 7;
    /// Lowest tier; every gun starts here.
    pub const MIN: WeaponTier = WeaponTier::Pistol;
    /// Highest tier; upgrades stop here.
    pub const MAX: WeaponTier = WeaponTier::Sniper;
    /// All tiers in ascending order.
    pub const ALL: [WeaponTier; Self::COUNT] = [
        WeaponTier::Pistol,
        WeaponTier::Smg,
        WeaponTier::Rifle,
        WeaponTier::Assault,
        WeaponTier::Revolver,
        WeaponTier::Shotgun,
        WeaponTier::Sniper,
    ];

    /// Position of this tier in the progression, starting at 0.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a tier by its progression index.
    pub fn from_index(index: usize) -> Option<WeaponTier> {
        Self::ALL.get(index).copied()
    }

    /// Looks up a tier that the caller knows is valid.
    ///
    /// # Panics
    /// Panics if `index` is outside `0..WeaponTier::COUNT`. An out-of-range tier is a bug in the
    /// caller, not a recoverable condition.
    pub fn at(index: usize) -> WeaponTier {
        match Self::from_index(index) {
            Some(tier) => tier,
            None => panic!("invalid weapon tier index {index} (valid: 0..{})", Self::COUNT),
        }
    }

    /// The next tier up, or `None` at the ceiling.
    pub fn next(self) -> Option<WeaponTier> {
        Self::from_index(self.index() + 1)
    }

    /// The next tier down, or `None` at the floor.
    pub fn previous(self) -> Option<WeaponTier> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Lowercase name, used when building asset keys.
    pub fn name(self) -> &'static str {
        match self {
            WeaponTier::Pistol => "pistol",
            WeaponTier::Smg => "smg",
            WeaponTier::Rifle => "rifle",
            WeaponTier::Assault => "assault",
            WeaponTier::Revolver => "revolver",
            WeaponTier::Shotgun => "shotgun",
            WeaponTier::Sniper => "sniper",
        }
    }
}

/// Error returned when a raw tier index does not name a [`WeaponTier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidTier(pub u8);

impl fmt::Display for InvalidTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid weapon tier {} (expected 0..{})",
            self.0,
            WeaponTier::COUNT
        )
    }
}

impl std::error::Error for InvalidTier {}

impl TryFrom<u8> for WeaponTier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        WeaponTier::from_index(value as usize).ok_or(InvalidTier(value))
    }
}

/// Rule mapping trigger state to bullet spawns.
///
/// # Variants
/// * `Semiautomatic` - One shot per trigger pull
/// * `Burst` - A fixed-length burst per trigger pull (see `FiringRules::burst_length`)
/// * `FullyAutomatic` - Keeps firing at the weapon's rate while the trigger is held
/// * `Shotgun` - One spread of pellets per trigger pull, not gated by the inter-shot delay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum FireMode {
    Semiautomatic,
    Burst,
    FullyAutomatic,
    Shotgun,
}

impl FireMode {
    /// Modes that fire exactly once per press and ignore repeat requests while firing.
    pub fn is_single_shot_per_press(self) -> bool {
        matches!(self, FireMode::Semiautomatic | FireMode::Shotgun)
    }
}

/// Visual class of a bullet. Selects the sprite key and the bullet's hit box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum BulletKind {
    Light,
    Medium,
    Magnum,
    Pellet,
    Rifle,
}

impl BulletKind {
    /// Hit box size in world units.
    pub fn size(self) -> Vec2 {
        match self {
            BulletKind::Light => Vec2::new(6.0, 2.0),
            BulletKind::Medium => Vec2::new(8.0, 3.0),
            BulletKind::Magnum => Vec2::new(8.0, 4.0),
            BulletKind::Pellet => Vec2::new(3.0, 3.0),
            BulletKind::Rifle => Vec2::new(12.0, 3.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BulletKind::Light => "light",
            BulletKind::Medium => "medium",
            BulletKind::Magnum => "magnum",
            BulletKind::Pellet => "pellet",
            BulletKind::Rifle => "rifle",
        }
    }
}

/// Which combatant something belongs to.
#[derive(
    Component, Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Horizontal facing of a combatant, its gun and its bullets.
#[derive(
    Component,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    Reflect,
    Serialize,
    Deserialize,
)]
#[reflect(Component)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `1.0` facing right, `-1.0` facing left.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// Opaque key naming an image in the game's asset store.
///
/// The gunplay core only selects keys; it never loads or interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetKey(pub Cow<'static, str>);

impl AssetKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for AssetKey {
    fn from(value: &'static str) -> Self {
        AssetKey(Cow::Borrowed(value))
    }
}

impl From<String> for AssetKey {
    fn from(value: String) -> Self {
        AssetKey(Cow::Owned(value))
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic millisecond clock used for every timing decision of a gun.
///
/// Guns never read system time. Tests drive a `ManualClock`; inside an app the fixed-step
/// `Time<Fixed>` resource is used.
pub trait SimClock {
    /// Milliseconds since an arbitrary, fixed origin. Must never decrease.
    fn now_millis(&self) -> u64;
}

impl<T: Default> SimClock for Time<T> {
    fn now_millis(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

/// Collision queries against the level, consumed by bullet resolution.
///
/// Implemented by `ArenaGeometry`; games with their own level representation implement it
/// over that instead.
pub trait CollisionOracle {
    /// Whether two axis-aligned boxes overlap. Touching edges do not count.
    fn overlaps(&self, a: Rect, b: Rect) -> bool {
        !a.intersect(b).is_empty()
    }

    /// Whether `bounds` overlaps any static level geometry.
    fn overlaps_static_geometry(&self, bounds: Rect) -> bool;

    /// Whether `bounds` has left the playable area.
    fn is_out_of_world_bounds(&self, bounds: Rect) -> bool;
}

/// A fighter that can be shot, as seen by a gun.
///
/// Hit resolution only needs the box, health, damage and side. `facing` and
/// `is_trigger_held` complete the handle for game code driving its own guns; the gun update
/// takes the trigger level as an argument instead of reading it from the target.
pub trait Combatant {
    fn bounding_box(&self) -> Rect;
    /// Not read by hit resolution.
    fn facing(&self) -> Facing;
    fn health(&self) -> i32;
    fn apply_damage(&mut self, amount: i32);
    fn side(&self) -> Side;
    /// Not read by hit resolution.
    fn is_trigger_held(&self) -> bool;
}

/// Resolves sprite keys for guns and bullets.
pub trait SpriteKeys: fmt::Debug + Send + Sync + 'static {
    fn weapon_key(&self, tier: WeaponTier, facing: Facing) -> AssetKey;
    fn bullet_key(&self, kind: BulletKind, facing: Facing) -> AssetKey;
}

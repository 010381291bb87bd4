//! Gun entity and its firing state machine.
//!
//! ```text
//!            fire() and burst cooldown elapsed
//!   Idle ──────────────────────────────────────▶ Firing
//!    ▲                                              │
//!    └──────────────────────────────────────────────┘
//!      stop_firing(), unless a burst is still incomplete
//!      (an incomplete burst finishes first, then auto-stops)
//! ```
//!
//! While `Firing`, every `update` calls `fire` again. Single-shot modes ignore those repeat
//! requests; automatic and burst modes fire whenever the inter-shot delay allows.

use bevy::prelude::*;

use crate::bullet::Bullet;
use crate::combat::{self, ExpiredBullet, RemovalCause, TickReport};
use crate::resources::{Armory, WeaponProperties};
use crate::types::{AssetKey, CollisionOracle, Combatant, Facing, FireMode, SimClock, Side, WeaponTier};

/// Trigger state of a gun.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum TriggerState {
    #[default]
    Idle,
    Firing,
}

/// Sprite keys selected for the gun's current tier.
///
/// `current` matches the gun's facing; `mirrored` is the key for the opposite facing, kept so
/// a renderer can flip without another lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct GunSprite {
    pub current: AssetKey,
    pub mirrored: AssetKey,
}

/// A gun owned by one combatant.
///
/// The gun owns every bullet it fired until that bullet is removed in [`Gun::update`].
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_gunplay::prelude::*;
///
/// let armory = Armory::default();
/// let mut clock = ManualClock::default();
/// let mut gun = Gun::new(&armory, Side::A, Rect::new(0.0, 0.0, 20.0, 60.0), Facing::Right);
///
/// gun.fire(&clock, true);
/// gun.fire(&clock, true); // semi-automatic: ignored until the trigger is released
/// assert_eq!(gun.bullets().len(), 1);
///
/// clock.advance(16);
/// gun.stop_firing(&clock);
/// assert!(!gun.is_firing());
/// ```
#[derive(Component, Clone, Debug)]
pub struct Gun {
    armory: Armory,
    tier: WeaponTier,
    fire_mode: FireMode,
    ammo_remaining: u8,
    inter_shot_delay_ms: u64,
    rounds_fired_in_burst: u8,
    last_shot_at: Option<u64>,
    last_release_at: Option<u64>,
    state: TriggerState,
    side: Side,
    facing: Facing,
    bounds: Rect,
    sprite: GunSprite,
    bullets: Vec<Bullet>,
}

impl Gun {
    /// Creates a lowest-tier gun held by an owner occupying `owner_bounds`.
    pub fn new(armory: &Armory, side: Side, owner_bounds: Rect, facing: Facing) -> Self {
        let tier = WeaponTier::MIN;
        let properties = armory.catalog.properties_of(tier);
        let sprite = GunSprite {
            current: armory.sprites.weapon_key(tier, facing),
            mirrored: armory.sprites.weapon_key(tier, facing.flipped()),
        };

        let mut gun = Self {
            armory: armory.clone(),
            tier,
            fire_mode: properties.fire_mode,
            ammo_remaining: properties.magazine_capacity,
            inter_shot_delay_ms: properties.inter_shot_delay_ms,
            rounds_fired_in_burst: 0,
            last_shot_at: None,
            last_release_at: None,
            state: TriggerState::Idle,
            side,
            facing,
            bounds: Rect::default(),
            sprite,
            bullets: Vec::new(),
        };
        gun.follow_owner(owner_bounds, facing);
        gun
    }

    /// Builder pattern: start at `tier` instead of the lowest tier.
    pub fn with_tier(mut self, tier: WeaponTier) -> Self {
        self.set_tier(tier);
        self
    }

    /// Handles a trigger request.
    ///
    /// Called once when the trigger is pressed, then again by every [`Gun::update`] while the
    /// gun is firing. Requests the state machine cannot honor are silently ignored.
    ///
    /// # Arguments
    /// * `clock` - Simulation clock
    /// * `trigger_held` - Whether the owner still holds the trigger; a finished burst waits
    ///   while it is held and stops once it is released
    pub fn fire(&mut self, clock: &impl SimClock, trigger_held: bool) {
        let now = clock.now_millis();

        match self.state {
            TriggerState::Firing if self.fire_mode.is_single_shot_per_press() => return,
            TriggerState::Firing => {}
            TriggerState::Idle => {
                if self.burst_cooldown_elapsed(now) {
                    self.state = TriggerState::Firing;
                }
            }
        }

        match self.fire_mode {
            FireMode::Shotgun => self.fire_spread(),
            FireMode::Burst => self.fire_burst(now, trigger_held),
            FireMode::Semiautomatic | FireMode::FullyAutomatic => {
                self.try_single_shot(now);
            }
        }
    }

    /// Handles a trigger release.
    ///
    /// Stamps the release time if the gun was firing. The gun returns to idle unless it is
    /// in the middle of a burst, which is allowed to finish first.
    pub fn stop_firing(&mut self, clock: &impl SimClock) {
        self.stop_firing_at(clock.now_millis());
    }

    /// Runs one simulation tick.
    ///
    /// Advances every bullet, removes those that hit the target, ran out of range, left the
    /// arena or struck level geometry, applies damage for target hits, and finally fires
    /// again if the gun is still firing.
    ///
    /// # Arguments
    /// * `delta_ticks` - Ticks elapsed since the previous update
    /// * `clock` - Simulation clock
    /// * `oracle` - Level collision queries
    /// * `target` - The opposing combatant, if present
    /// * `trigger_held` - Whether the owner is holding the trigger
    ///
    /// # Returns
    /// What happened to the removed bullets
    pub fn update(
        &mut self,
        delta_ticks: f32,
        clock: &impl SimClock,
        oracle: &impl CollisionOracle,
        mut target: Option<&mut dyn Combatant>,
        trigger_held: bool,
    ) -> TickReport {
        let mut report = TickReport::default();
        let target_bounds = target.as_deref().map(|t| t.bounding_box());

        let in_flight = std::mem::take(&mut self.bullets);
        let mut survivors = Vec::with_capacity(in_flight.len());

        for mut bullet in in_flight {
            bullet.advance(delta_ticks);

            match combat::removal_cause(&bullet, oracle, target_bounds) {
                None => survivors.push(bullet),
                Some(RemovalCause::HitTarget) => {
                    if let Some(target) = target.as_deref_mut() {
                        report.hits.push(combat::resolve_hit(self, &bullet, target));
                    }
                }
                Some(cause) => {
                    trace!("{:?} bullet removed: {:?}", self.side, cause);
                    report.expired.push(ExpiredBullet {
                        position: bullet.position(),
                        cause,
                    });
                }
            }
        }

        self.bullets = survivors;

        if self.is_firing() {
            if trigger_held || self.is_finishing_burst() {
                self.fire(clock, trigger_held);
            } else {
                // Only an unfinished burst outlives the trigger release.
                self.stop_firing_at(clock.now_millis());
            }
        }

        report
    }

    /// Moves one tier up. Returns `false` at the highest tier.
    pub fn upgrade(&mut self) -> bool {
        let Some(next) = self.tier.next() else {
            return false;
        };
        info!("{:?} gun upgraded: {:?} -> {:?}", self.side, self.tier, next);
        self.set_tier(next);
        true
    }

    /// Moves one tier down. Returns `false` at the lowest tier.
    pub fn downgrade(&mut self) -> bool {
        let Some(previous) = self.tier.previous() else {
            return false;
        };
        info!("{:?} gun downgraded: {:?} -> {:?}", self.side, self.tier, previous);
        self.set_tier(previous);
        true
    }

    /// Re-anchors the gun on its owner's box.
    ///
    /// The gun overlaps the owner by `owner_inset` on the facing side, with its top edge one
    /// third of the way down the owner.
    pub fn follow_owner(&mut self, owner_bounds: Rect, facing: Facing) {
        let rules = &self.armory.rules;
        let size = rules.gun_size;
        let top = owner_bounds.max.y - owner_bounds.height() / 3.0;

        let min_x = match facing {
            Facing::Right => owner_bounds.max.x - rules.owner_inset,
            Facing::Left => owner_bounds.min.x + rules.owner_inset - size.x,
        };
        self.bounds = Rect::new(min_x, top - size.y, min_x + size.x, top);

        if facing != self.facing {
            self.facing = facing;
            self.refresh_sprite();
        }
    }

    /// Bullet spawn point: the gun box edge on the facing side, vertically centered.
    pub fn muzzle(&self) -> Vec2 {
        let x = match self.facing {
            Facing::Right => self.bounds.max.x,
            Facing::Left => self.bounds.min.x,
        };
        Vec2::new(x, self.bounds.center().y)
    }

    /// Current weapon tier.
    pub fn tier(&self) -> WeaponTier {
        self.tier
    }

    /// Fire mode of the current tier.
    pub fn fire_mode(&self) -> FireMode {
        self.fire_mode
    }

    /// Catalog row of the current tier.
    pub fn properties(&self) -> &WeaponProperties {
        self.armory.catalog.properties_of(self.tier)
    }

    /// Rounds left in the magazine (display only).
    pub fn ammo_remaining(&self) -> u8 {
        self.ammo_remaining
    }

    /// Rounds fired since the trigger was last pulled (display only).
    pub fn rounds_fired_in_burst(&self) -> u8 {
        self.rounds_fired_in_burst
    }

    /// Bullets in flight.
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Trigger state.
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Whether the gun is in [`TriggerState::Firing`].
    pub fn is_firing(&self) -> bool {
        self.state == TriggerState::Firing
    }

    /// Side of the combatant holding the gun.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Facing the gun and its new bullets point in.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// World-space bounding box of the gun.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Sprite keys for the current tier and facing.
    pub fn sprite(&self) -> &GunSprite {
        &self.sprite
    }

    /// Shared catalog, rules and sprite resolver the gun was built from.
    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    /// Time of the most recent shot, if any.
    pub fn last_shot_at(&self) -> Option<u64> {
        self.last_shot_at
    }

    /// Time of the most recent trigger release while firing, if any.
    pub fn last_release_at(&self) -> Option<u64> {
        self.last_release_at
    }

    fn set_tier(&mut self, tier: WeaponTier) {
        self.tier = tier;
        let properties = self.armory.catalog.properties_of(tier);
        self.fire_mode = properties.fire_mode;
        self.ammo_remaining = properties.magazine_capacity;
        self.inter_shot_delay_ms = properties.inter_shot_delay_ms;
        self.refresh_sprite();
    }

    fn refresh_sprite(&mut self) {
        let sprites = &self.armory.sprites;
        self.sprite = GunSprite {
            current: sprites.weapon_key(self.tier, self.facing),
            mirrored: sprites.weapon_key(self.tier, self.facing.flipped()),
        };
    }

    /// Whether the gun is in burst mode with rounds of the current burst still to fire.
    fn is_finishing_burst(&self) -> bool {
        self.fire_mode == FireMode::Burst
            && self.rounds_fired_in_burst < self.armory.rules.burst_length
    }

    fn burst_cooldown_elapsed(&self, now: u64) -> bool {
        self.last_release_at.is_none_or(|released| {
            now.saturating_sub(released) >= self.armory.rules.burst_cooldown_ms
        })
    }

    fn stop_firing_at(&mut self, now: u64) {
        if self.state == TriggerState::Firing {
            self.last_release_at = Some(now);
        }

        if !self.is_finishing_burst() {
            self.state = TriggerState::Idle;
            self.rounds_fired_in_burst = 0;
        }
    }

    fn fire_spread(&mut self) {
        let spread = self.armory.rules.shotgun_spread;
        let pellets = spread.map(|vertical| Bullet::spawn(self).with_vertical_velocity(vertical));
        self.bullets.extend(pellets);
    }

    fn fire_burst(&mut self, now: u64, trigger_held: bool) {
        if self.rounds_fired_in_burst >= self.armory.rules.burst_length {
            if !trigger_held {
                self.stop_firing_at(now);
            }
            return;
        }

        if self.rounds_fired_in_burst == 0 && !self.burst_cooldown_elapsed(now) {
            debug!("{:?} burst suppressed: cooldown not elapsed", self.side);
            return;
        }

        self.try_single_shot(now);
    }

    /// Fires one bullet if strictly more than the inter-shot delay has passed since the last
    /// shot.
    fn try_single_shot(&mut self, now: u64) -> bool {
        let ready = self
            .last_shot_at
            .is_none_or(|last| now.saturating_sub(last) > self.inter_shot_delay_ms);
        if !ready {
            return false;
        }

        let bullet = Bullet::spawn(self);
        self.bullets.push(bullet);
        self.rounds_fired_in_burst = self.rounds_fired_in_burst.saturating_add(1);
        self.last_shot_at = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Duelist;
    use crate::resources::{ArenaGeometry, FiringRules, ManualClock, WeaponCatalog};
    use crate::types::{BulletKind, SpriteKeys};

    const OWNER: Rect = Rect {
        min: Vec2::new(0.0, 0.0),
        max: Vec2::new(20.0, 60.0),
    };

    fn gun(tier: WeaponTier) -> Gun {
        Gun::new(&Armory::default(), Side::A, OWNER, Facing::Right).with_tier(tier)
    }

    fn open_arena() -> ArenaGeometry {
        ArenaGeometry::new(Rect::new(-5000.0, -5000.0, 5000.0, 5000.0))
    }

    /// Runs `ticks` updates 16ms apart with no target, holding the trigger.
    fn hold_for(gun: &mut Gun, clock: &mut ManualClock, ticks: usize) {
        for _ in 0..ticks {
            clock.advance(16);
            gun.update(1.0, &*clock, &open_arena(), None, true);
        }
    }

    #[test]
    fn test_semi_fires_once_per_press() {
        let mut gun = gun(WeaponTier::Pistol);
        let mut clock = ManualClock::at(1_000);

        gun.fire(&clock, true);
        gun.fire(&clock, true);
        assert_eq!(gun.bullets().len(), 1);

        // Held: repeat requests from update are ignored.
        hold_for(&mut gun, &mut clock, 30);
        assert_eq!(gun.bullets().len(), 1);
    }

    #[test]
    fn test_semi_second_shot_needs_the_delay() {
        let mut gun = gun(WeaponTier::Pistol);
        let mut clock = ManualClock::at(1_000);

        gun.fire(&clock, true);
        gun.stop_firing(&clock);

        // Exactly the delay is not enough.
        clock.advance(250);
        gun.fire(&clock, true);
        assert_eq!(gun.bullets().len(), 1);
        gun.stop_firing(&clock);

        clock.advance(1);
        gun.fire(&clock, true);
        assert_eq!(gun.bullets().len(), 2);
    }

    #[test]
    fn test_auto_fires_at_its_rate_while_held() {
        let mut gun = gun(WeaponTier::Smg);
        let mut clock = ManualClock::at(0);

        gun.fire(&clock, true);
        assert!(gun.is_firing());
        // 80ms delay, 16ms ticks: a shot every 96ms.
        hold_for(&mut gun, &mut clock, 12);
        assert_eq!(gun.bullets().len(), 3);

        gun.stop_firing(&clock);
        hold_for(&mut gun, &mut clock, 12);
        assert_eq!(gun.bullets().len(), 3);
        assert_eq!(gun.rounds_fired_in_burst(), 0);
    }

    #[test]
    fn test_burst_fires_three_then_waits_while_held() {
        let mut gun = gun(WeaponTier::Rifle);
        let mut clock = ManualClock::at(0);

        gun.fire(&clock, true);
        hold_for(&mut gun, &mut clock, 20);

        assert_eq!(gun.bullets().len(), 3);
        assert_eq!(gun.rounds_fired_in_burst(), 3);
        assert!(gun.is_firing());
    }

    #[test]
    fn test_burst_stops_by_itself_once_released() {
        let mut gun = gun(WeaponTier::Rifle);
        let mut clock = ManualClock::at(0);

        gun.fire(&clock, true);
        // Released right after the first round: the burst still completes.
        gun.stop_firing(&clock);
        assert!(gun.is_firing());
        assert_eq!(gun.last_release_at(), Some(0));

        for _ in 0..30 {
            clock.advance(16);
            gun.update(1.0, &clock, &open_arena(), None, false);
        }

        assert_eq!(gun.bullets().len(), 3);
        assert!(!gun.is_firing());
        assert_eq!(gun.rounds_fired_in_burst(), 0);
    }

    #[test]
    fn test_burst_cannot_restart_within_cooldown() {
        let mut gun = gun(WeaponTier::Rifle);
        let mut clock = ManualClock::at(0);

        gun.fire(&clock, true);
        hold_for(&mut gun, &mut clock, 20);
        gun.stop_firing(&clock);
        assert!(!gun.is_firing());
        let released = clock.now_millis();

        clock.advance(100);
        gun.fire(&clock, true);
        assert_eq!(gun.bullets().len(), 3);
        assert!(!gun.is_firing());

        clock.advance(200);
        assert_eq!(clock.now_millis() - released, 300);
        gun.fire(&clock, true);
        assert_eq!(gun.bullets().len(), 4);
        assert!(gun.is_firing());
    }

    #[test]
    fn test_shotgun_spread() {
        let mut gun = gun(WeaponTier::Shotgun);
        let clock = ManualClock::at(0);

        gun.fire(&clock, true);

        let pellets = gun.bullets();
        assert_eq!(pellets.len(), 3);
        let offsets: Vec<f32> = pellets.iter().map(|b| b.velocity().y).collect();
        assert_eq!(offsets, vec![-1.0, 0.0, 1.0]);
        assert!(pellets.iter().all(|b| b.position() == pellets[0].position()));

        // Single shot per press.
        gun.fire(&clock, true);
        assert_eq!(gun.bullets().len(), 3);
    }

    #[test]
    fn test_shotgun_ignores_inter_shot_delay() {
        let mut gun = gun(WeaponTier::Shotgun);
        let mut clock = ManualClock::at(0);

        gun.fire(&clock, true);
        gun.stop_firing(&clock);
        clock.advance(1);
        gun.fire(&clock, true);

        assert_eq!(gun.bullets().len(), 6);
    }

    #[test]
    fn test_bullet_removed_exactly_past_range() {
        let standard = WeaponCatalog::standard();
        let mut rows = WeaponTier::ALL.map(|tier| standard.properties_of(tier).clone());
        rows[0].range = 100.0;
        rows[0].projectile_speed = 1.0;
        let armory = Armory::new(WeaponCatalog::new(rows), FiringRules::default());
        let mut gun = Gun::new(&armory, Side::A, OWNER, Facing::Right);
        let clock = ManualClock::at(0);
        gun.fire(&clock, true);
        gun.stop_firing(&clock);

        for tick in 1..=100 {
            let report = gun.update(1.0, &clock, &open_arena(), None, false);
            assert!(report.is_empty(), "removed early on tick {tick}");
        }
        assert_eq!(gun.bullets()[0].distance_traveled(), 100.0);

        let report = gun.update(1.0, &clock, &open_arena(), None, false);
        assert_eq!(report.count(RemovalCause::OutOfRange), 1);
        assert!(gun.bullets().is_empty());
    }

    #[test]
    fn test_update_applies_damage_once_per_hit() {
        let mut gun = gun(WeaponTier::Pistol);
        let clock = ManualClock::at(0);
        let mut target = Duelist::new(Side::B, Rect::new(60.0, 0.0, 80.0, 60.0), 100);

        gun.fire(&clock, true);
        gun.stop_firing(&clock);

        let mut hits = 0;
        for _ in 0..10 {
            let report = gun.update(1.0, &clock, &open_arena(), Some(&mut target), false);
            hits += report.hits.len();
        }

        assert_eq!(hits, 1);
        assert_eq!(target.health, 90);
        assert!(gun.bullets().is_empty());
    }

    #[test]
    fn test_kill_upgrades_before_damage() {
        let mut gun = gun(WeaponTier::Pistol);
        let clock = ManualClock::at(0);
        let mut target = Duelist::new(Side::B, Rect::new(60.0, 0.0, 80.0, 60.0), 10);

        gun.fire(&clock, true);
        gun.stop_firing(&clock);
        let report = (0..10)
            .map(|_| gun.update(1.0, &clock, &open_arena(), Some(&mut target), false))
            .find(|r| !r.hits.is_empty())
            .expect("bullet should reach the target");

        assert_eq!(report.hits[0].upgrade, Some((WeaponTier::Pistol, WeaponTier::Smg)));
        assert_eq!(gun.tier(), WeaponTier::Smg);
        assert_eq!(gun.fire_mode(), FireMode::FullyAutomatic);
        assert_eq!(target.health, 0);
    }

    #[test]
    fn test_geometry_removal_deals_no_damage() {
        let mut gun = gun(WeaponTier::Pistol);
        let clock = ManualClock::at(0);
        let mut target = Duelist::new(Side::B, Rect::new(200.0, 0.0, 220.0, 60.0), 100);
        let arena = open_arena().with_block(Rect::new(60.0, 0.0, 70.0, 60.0));

        gun.fire(&clock, true);
        gun.stop_firing(&clock);
        let mut geometry_hits = 0;
        for _ in 0..40 {
            let report = gun.update(1.0, &clock, &arena, Some(&mut target), false);
            geometry_hits += report.count(RemovalCause::HitGeometry);
            assert!(report.hits.is_empty());
        }

        assert_eq!(geometry_hits, 1);
        assert_eq!(target.health, 100);
    }

    #[test]
    fn test_tier_bounds_hold() {
        let mut gun = gun(WeaponTier::Pistol);
        for _ in 0..20 {
            gun.downgrade();
            assert_eq!(gun.tier(), WeaponTier::MIN);
        }
        for _ in 0..20 {
            gun.upgrade();
        }
        assert_eq!(gun.tier(), WeaponTier::MAX);
        assert!(!gun.upgrade());
        assert!(gun.downgrade());
        assert_eq!(gun.tier(), WeaponTier::Shotgun);
    }

    #[test]
    fn test_tier_change_rederives_properties_and_sprite() {
        let mut gun = gun(WeaponTier::Assault);
        gun.upgrade();

        assert_eq!(gun.tier(), WeaponTier::Revolver);
        assert_eq!(gun.fire_mode(), FireMode::Semiautomatic);
        assert_eq!(gun.ammo_remaining(), 6);
        assert_eq!(gun.sprite().current.as_str(), "weapons/revolver_right");
        assert_eq!(gun.sprite().mirrored.as_str(), "weapons/revolver_left");
    }

    #[test]
    fn test_stop_firing_when_idle_changes_nothing() {
        let mut gun = gun(WeaponTier::Rifle);
        let clock = ManualClock::at(500);
        let before = (
            gun.state(),
            gun.rounds_fired_in_burst(),
            gun.last_shot_at(),
            gun.last_release_at(),
        );

        gun.stop_firing(&clock);
        gun.stop_firing(&clock);

        let after = (
            gun.state(),
            gun.rounds_fired_in_burst(),
            gun.last_shot_at(),
            gun.last_release_at(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_follow_owner_flips_gun_and_sprite() {
        let mut gun = gun(WeaponTier::Pistol);
        assert_eq!(gun.bounds(), Rect::new(15.0, 30.0, 39.0, 40.0));
        assert_eq!(gun.muzzle(), Vec2::new(39.0, 35.0));

        gun.follow_owner(OWNER, Facing::Left);

        assert_eq!(gun.bounds(), Rect::new(-19.0, 30.0, 5.0, 40.0));
        assert_eq!(gun.muzzle(), Vec2::new(-19.0, 35.0));
        assert_eq!(gun.sprite().current.as_str(), "weapons/pistol_left");
    }

    #[test]
    fn test_kill_mid_burst_does_not_keep_firing_after_release() {
        let mut gun = gun(WeaponTier::Rifle);
        let mut clock = ManualClock::at(0);
        // Right next to the muzzle: the first round lands on the next tick.
        let mut target = Duelist::new(Side::B, Rect::new(50.0, 0.0, 70.0, 60.0), 1);

        gun.fire(&clock, false);
        gun.stop_firing(&clock);
        assert!(gun.is_firing());

        let mut hits = 0;
        for _ in 0..200 {
            clock.advance(16);
            let report = gun.update(1.0, &clock, &open_arena(), Some(&mut target), false);
            hits += report.hits.len();
        }

        assert_eq!(hits, 1);
        assert_eq!(gun.tier(), WeaponTier::Assault);
        assert!(!gun.is_firing());
        assert!(gun.bullets().is_empty());
        assert_eq!(target.health, 1 - 8);
    }

    #[test]
    fn test_held_trigger_keeps_firing_after_kill_upgrade() {
        let mut gun = gun(WeaponTier::Rifle);
        let mut clock = ManualClock::at(0);
        let mut target = Duelist::new(Side::B, Rect::new(50.0, 0.0, 70.0, 60.0), 1);

        gun.fire(&clock, true);
        // The kill lands at 16ms; the assault rifle's 120ms delay allows a shot at 128ms.
        for _ in 0..8 {
            clock.advance(16);
            gun.update(1.0, &clock, &open_arena(), Some(&mut target), true);
        }

        assert_eq!(gun.tier(), WeaponTier::Assault);
        assert!(gun.is_firing());
        assert_eq!(gun.bullets().len(), 1);
        assert_eq!(gun.last_shot_at(), Some(128));
    }

    #[derive(Debug)]
    struct FlatKeys;

    impl SpriteKeys for FlatKeys {
        fn weapon_key(&self, tier: WeaponTier, _facing: Facing) -> AssetKey {
            format!("gun-{}", tier.index()).into()
        }

        fn bullet_key(&self, _kind: BulletKind, _facing: Facing) -> AssetKey {
            "shot".into()
        }
    }

    #[test]
    fn test_injected_sprite_keys_are_used() {
        let armory = Armory::default().with_sprites(FlatKeys);
        let mut gun = Gun::new(&armory, Side::A, OWNER, Facing::Right);
        assert_eq!(gun.sprite().current.as_str(), "gun-0");
        assert_eq!(gun.sprite().mirrored.as_str(), "gun-0");

        gun.upgrade();
        assert_eq!(gun.sprite().current.as_str(), "gun-1");

        let clock = ManualClock::at(0);
        gun.fire(&clock, true);
        assert_eq!(gun.bullets()[0].sprite().as_str(), "shot");
    }
}

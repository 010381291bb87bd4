//! # Bevy Gunplay
//!
//! Tiered 2D gunplay for Bevy 0.18.
//!
//! ## Features
//! - Seven weapon tiers, from pistol to sniper, driven by a data catalog
//! - Semi-automatic, burst, fully automatic and shotgun fire modes
//! - Bullets owned by the gun that fired them, removed on hit, range, bounds or geometry
//! - Kill-driven upgrades: a lethal hit moves the shooter's gun one tier up
//! - Deterministic timing through an injected clock
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_gunplay::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(GunplayPluginGroup)
//!         .add_systems(Startup, spawn_duelists)
//!         .run();
//! }
//!
//! fn spawn_duelists(mut commands: Commands, armory: Res<Armory>) {
//!     let bounds = Rect::new(-300.0, -30.0, -280.0, 30.0);
//!     commands.spawn((
//!         CombatantBundle::new(Side::A, bounds, 100),
//!         Gun::new(&armory, Side::A, bounds, Facing::Right),
//!     ));
//! }
//! ```
//!
//! Guns can also be driven without the ECS; see [`gun::Gun`] and [`resources::ManualClock`].

pub mod bullet;
pub mod combat;
pub mod components;
pub mod events;
pub mod gun;
pub mod resources;
pub mod systems;
pub mod types;


pub mod prelude {
    pub use crate::bullet::Bullet;
    pub use crate::combat::{BulletHit, Duelist, ExpiredBullet, RemovalCause, TickReport};
    pub use crate::components::*;
    pub use crate::events::*;
    pub use crate::gun::{Gun, GunSprite, TriggerState};
    pub use crate::resources::*;
    pub use crate::types::*;
    pub use crate::GunplayPluginGroup;
    pub use crate::{GunplayCorePlugin, GunplayDebugPlugin};
}

use bevy::prelude::*;

/// Main plugin group that includes all gunplay subsystems.
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_gunplay::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(GunplayPluginGroup)
///     .run();
/// ```
#[derive(Default)]
pub struct GunplayPluginGroup;

impl PluginGroup for GunplayPluginGroup {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(GunplayCorePlugin)
            .add(GunplayDebugPlugin)
    }
}

/// Core gunplay plugin: resources, messages and the fixed-step firing systems.
///
/// Expects `Time<Fixed>` to be present, as it is with `DefaultPlugins` or `MinimalPlugins`.
///
/// # Systems
/// - `apply_trigger_input` - Trigger presses and releases become `fire` / `stop_firing`
/// - `sync_guns_to_owners` - Guns follow their owner's hitbox and facing
/// - `apply_tier_requests` - Manual upgrades and downgrades requested by the game
/// - `update_guns` - Bullet movement, removal, damage and repeat fire
pub struct GunplayCorePlugin;

impl Plugin for GunplayCorePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::Health>()
            .register_type::<components::Hitbox>()
            .register_type::<components::TriggerInput>()
            .register_type::<types::Side>()
            .register_type::<types::Facing>()
            .register_type::<resources::GunplayConfig>()
            .register_type::<resources::ArenaGeometry>()
            .init_resource::<resources::GunplayConfig>()
            .init_resource::<resources::ArenaGeometry>()
            .init_resource::<resources::Armory>()
            .add_message::<events::HitEvent>()
            .add_message::<events::TierChangedEvent>()
            .add_message::<events::BulletExpiredEvent>()
            .add_message::<events::TierChangeRequest>()
            .add_systems(
                FixedUpdate,
                (
                    systems::firing::apply_trigger_input,
                    systems::firing::sync_guns_to_owners,
                    systems::firing::apply_tier_requests,
                    systems::firing::update_guns,
                )
                    .chain(),
            );
    }
}

/// Debug plugin for gunplay visualization.
pub struct GunplayDebugPlugin;

impl Plugin for GunplayDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::debug::draw_gunplay_debug);
    }
}

//! Headless duel between two seeded bots.
//!
//! Each bot randomly pulls and releases its trigger and strafes up and down. Every kill
//! upgrades the killer's gun; the duel ends when one side has won with the top-tier gun
//! or the time limit runs out.
//!
//! Run with `cargo run --example headless_duel -- <seed>`.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy_gunplay::prelude::*;
use bevy_gunplay::systems::firing::apply_trigger_input;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_HEALTH: i32 = 100;
const TIME_LIMIT_SECS: f32 = 120.0;
const STRAFE_LIMIT: f32 = 80.0;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(7);

    println!("Starting headless duel (seed {seed})...");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 240.0,
        ))))
        .add_plugins(GunplayCorePlugin)
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .insert_resource(DuelSeed(seed))
        .add_systems(Startup, setup_duel)
        .add_systems(FixedUpdate, drive_bots.before(apply_trigger_input))
        .add_systems(Update, (report_hits, report_tier_changes, check_outcome).chain())
        .run();
}

#[derive(Resource)]
struct DuelSeed(u64);

#[derive(Component)]
struct Bot {
    name: &'static str,
    rng: StdRng,
    spawn: Rect,
    kills: u32,
}

fn setup_duel(mut commands: Commands, armory: Res<Armory>, seed: Res<DuelSeed>) {
    let duelists = [
        ("Alpha", Side::A, Rect::new(-300.0, -30.0, -280.0, 30.0), Facing::Right),
        ("Bravo", Side::B, Rect::new(280.0, -30.0, 300.0, 30.0), Facing::Left),
    ];

    for (i, (name, side, bounds, facing)) in duelists.into_iter().enumerate() {
        println!("[SETUP] {name} on side {side:?}");
        commands.spawn((
            CombatantBundle::new(side, bounds, MAX_HEALTH).with_facing(facing),
            Gun::new(&armory, side, bounds, facing),
            Bot {
                name,
                rng: StdRng::seed_from_u64(seed.0.wrapping_add(i as u64)),
                spawn: bounds,
                kills: 0,
            },
        ));
    }

    commands.insert_resource(ArenaGeometry::default().with_block(Rect::new(-10.0, 40.0, 10.0, 200.0)));
}

fn drive_bots(mut bots: Query<(&mut Bot, &mut TriggerInput, &mut Hitbox)>) {
    for (mut bot, mut trigger, mut hitbox) in bots.iter_mut() {
        if bot.rng.random_bool(0.08) {
            let held = !trigger.held;
            trigger.set(held);
        }

        if bot.rng.random_bool(0.05) {
            let offset = bot.rng.random_range(-STRAFE_LIMIT..=STRAFE_LIMIT);
            let spawn = bot.spawn;
            hitbox.0 = Rect::from_center_size(spawn.center() + Vec2::Y * offset, spawn.size());
        }
    }
}

fn report_hits(mut hits: MessageReader<HitEvent>, bots: Query<&Bot>) {
    for hit in hits.read() {
        let (Ok(shooter), Ok(target)) = (bots.get(hit.shooter), bots.get(hit.target)) else {
            continue;
        };
        println!(
            "[HIT] {} -> {} for {}{}",
            shooter.name,
            target.name,
            hit.damage,
            if hit.lethal { " (lethal)" } else { "" }
        );
    }
}

fn report_tier_changes(mut changes: MessageReader<TierChangedEvent>, mut bots: Query<&mut Bot>) {
    for change in changes.read() {
        let Ok(mut bot) = bots.get_mut(change.gun) else {
            continue;
        };
        if change.reason == TierChangeReason::Kill {
            bot.kills += 1;
        }
        println!(
            "[TIER] {} {:?} -> {:?} ({:?})",
            bot.name, change.from, change.to, change.reason
        );
    }
}

/// Revives defeated bots, and ends the duel once a bot scores a kill with the top-tier gun.
fn check_outcome(
    time: Res<Time>,
    mut fighters: Query<(&Bot, &Gun, &mut Health)>,
    mut exit: MessageWriter<AppExit>,
) {
    let champion = fighters
        .iter()
        .find(|(bot, gun, _)| gun.tier() == WeaponTier::MAX && bot.kills as usize >= WeaponTier::COUNT);
    if let Some((bot, _, _)) = champion {
        println!("[FINISHED] {} wins with {} kills.", bot.name, bot.kills);
        exit.write(AppExit::Success);
        return;
    }

    for (bot, _, mut health) in fighters.iter_mut() {
        if health.is_defeated() {
            println!("[RESPAWN] {} is back in the fight", bot.name);
            health.0 = MAX_HEALTH;
        }
    }

    if time.elapsed_secs() > TIME_LIMIT_SECS {
        println!("[FINISHED] Time limit reached, no winner.");
        for (bot, gun, _) in fighters.iter() {
            println!("  {}: {} kills, {:?}", bot.name, bot.kills, gun.tier());
        }
        exit.write(AppExit::Success);
    }
}

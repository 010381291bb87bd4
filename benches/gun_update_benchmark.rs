//! Benchmark for the per-tick gun update.

use bevy::prelude::*;
use bevy_gunplay::bullet::Bullet;
use bevy_gunplay::combat::{self, Duelist};
use bevy_gunplay::gun::Gun;
use bevy_gunplay::resources::{ArenaGeometry, Armory, ManualClock};
use bevy_gunplay::types::{Facing, Side, WeaponTier};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

const OWNER: Rect = Rect {
    min: Vec2::new(0.0, 0.0),
    max: Vec2::new(20.0, 60.0),
};

/// A shotgun with `bullet_count` pellets in flight, rounded up to whole spreads.
fn loaded_shotgun(bullet_count: usize, clock: &ManualClock) -> Gun {
    let mut gun =
        Gun::new(&Armory::default(), Side::A, OWNER, Facing::Right).with_tier(WeaponTier::Shotgun);
    while gun.bullets().len() < bullet_count {
        gun.fire(clock, true);
        gun.stop_firing(clock);
    }
    gun
}

fn arena() -> ArenaGeometry {
    let mut arena = ArenaGeometry::new(Rect::new(-2000.0, -2000.0, 2000.0, 2000.0));
    for i in 0..16 {
        let x = 300.0 + i as f32 * 40.0;
        arena = arena.with_block(Rect::new(x, 500.0, x + 20.0, 520.0));
    }
    arena
}

fn benchmark_gun_update(c: &mut Criterion) {
    let clock = ManualClock::at(0);
    let arena = arena();

    let mut group = c.benchmark_group("Gun Update");

    for bullet_count in [30, 300, 3000].iter() {
        let gun = loaded_shotgun(*bullet_count, &clock);

        group.bench_with_input(
            BenchmarkId::from_parameter(bullet_count),
            bullet_count,
            |b, &_count| {
                b.iter_batched(
                    || {
                        let target = Duelist::new(Side::B, Rect::new(180.0, 0.0, 200.0, 60.0), 1_000_000);
                        (gun.clone(), target)
                    },
                    |(mut gun, mut target)| {
                        let report = gun.update(1.0, &clock, &arena, Some(&mut target), false);
                        std::hint::black_box(report);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn benchmark_removal_cause(c: &mut Criterion) {
    let arena = arena();
    let gun = Gun::new(&Armory::default(), Side::A, OWNER, Facing::Right);
    let bullet = Bullet::spawn(&gun);
    let target = Some(Rect::new(500.0, 0.0, 520.0, 60.0));

    c.bench_function("Removal Cause", |b| {
        b.iter(|| combat::removal_cause(std::hint::black_box(&bullet), &arena, target));
    });
}

criterion_group!(benches, benchmark_gun_update, benchmark_removal_cause);
criterion_main!(benches);

use bevy::prelude::*;

use crate::gun::Gun;
use crate::resources::{ArenaGeometry, GunplayConfig};

/// Draw debug gizmos for guns, bullets and the arena.
///
/// Draws the gun box, every live bullet's box and the arena outline with its blocks.
pub fn draw_gunplay_debug(
    mut gizmos: Gizmos,
    guns: Query<&Gun>,
    arena: Res<ArenaGeometry>,
    config: Res<GunplayConfig>,
) {
    if !config.debug_draw {
        return;
    }

    outline(&mut gizmos, arena.bounds, Color::srgb(0.4, 0.4, 0.4));
    for block in &arena.blocks {
        outline(&mut gizmos, *block, Color::srgb(0.6, 0.6, 0.2));
    }

    for gun in guns.iter() {
        outline(&mut gizmos, gun.bounds(), Color::srgb(0.0, 0.6, 1.0));
        for bullet in gun.bullets() {
            outline(&mut gizmos, bullet.bounding_box(), Color::srgb(1.0, 0.0, 0.0));
        }
    }
}

fn outline(gizmos: &mut Gizmos, rect: Rect, color: Color) {
    gizmos.rect_2d(Isometry2d::from_translation(rect.center()), rect.size(), color);
}

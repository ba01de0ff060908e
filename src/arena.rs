//! Arena bounds and static boundary walls.
//!
//! The arena is sized from the primary window **once, at world creation**
//! (and again on reboot) — live window resizing is deliberately not tracked.
//! Three invisible static walls (floor, left, right) keep bodies on screen;
//! there is no ceiling, so task bodies can drop in from above.

use crate::config::VoidConfig;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// World dimensions snapshotted from the window when the world was created.
///
/// Systems that need screen extents (body spawning, shard grid) read this
/// instead of querying the window, which keeps them runnable headless.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// Marker for the static boundary walls.
#[derive(Component)]
pub struct Wall;

/// Snapshot the window size into [`ArenaBounds`] and spawn the boundary
/// walls.  Runs at startup and again when leaving the cleared screen, so a
/// rebooted world picks up the window's current dimensions.
pub fn setup_arena(
    mut commands: Commands,
    windows: Query<&Window>,
    config: Res<VoidConfig>,
    mut bounds: ResMut<ArenaBounds>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    *bounds = ArenaBounds {
        width: window.width(),
        height: window.height(),
    };

    let half_w = bounds.half_width();
    let half_h = bounds.half_height();
    let half_t = config.wall_thickness / 2.0;

    // Floor sits a little above the bottom edge so resting bodies stay visible.
    let walls = [
        (
            Vec2::new(0.0, -half_h - half_t + config.floor_raise),
            Vec2::new(half_w, half_t),
        ),
        (Vec2::new(-half_w - half_t, 0.0), Vec2::new(half_t, half_h)),
        (Vec2::new(half_w + half_t, 0.0), Vec2::new(half_t, half_h)),
    ];

    for (pos, half_extents) in walls {
        commands.spawn((
            Wall,
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y),
            Transform::from_translation(pos.extend(0.0)),
            GlobalTransform::default(),
        ));
    }

    eprintln!(
        "[SETUP] Arena {}x{} with 3 boundary walls",
        bounds.width, bounds.height
    );
}

//! Pointer input and delete-button hit-testing.
//!
//! A click is resolved in three steps: cursor position → world coordinates,
//! Rapier point query → the first task body under the pointer, then a
//! body-local rectangle test against the delete button's hit-region.  The
//! hit-region is a 40 px square around the button centre — deliberately
//! larger than the 24 px drawn glyph, since the target may be rotating and
//! in motion.
//!
//! A second pass runs the identical test on every pointer move purely to
//! switch the window cursor between arrow and pointer; it mutates nothing
//! else.

use crate::body::TaskBody;
use crate::config::VoidConfig;
use crate::task::TaskId;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use bevy_rapier2d::prelude::*;

// ── Messages ──────────────────────────────────────────────────────────────────

/// The pointer went down inside a task body's delete hit-region.
#[derive(Message, Debug, Clone, Copy)]
pub struct DeleteRequested(pub TaskId);

// ── Coordinate helpers ────────────────────────────────────────────────────────

/// Convert a window cursor position to world coordinates.
///
/// The camera is an unmoved `Camera2d`, so this is a translation to a
/// screen-centre origin plus a y flip.
pub fn cursor_to_world(cursor: Vec2, window: &Window) -> Vec2 {
    Vec2::new(
        cursor.x - window.width() / 2.0,
        -(cursor.y - window.height() / 2.0),
    )
}

/// Test whether a world-space point lies inside a body's delete hit-region.
///
/// The point is carried into the body's local (un-rotated, origin-centred)
/// frame with the inverse of the body's rotation, then tested against the
/// hit square centred at `(task_width/2 − button_pad_right, 0)`.  Because
/// the test happens in the local frame it is invariant under body rotation.
pub fn button_local_hit(transform: &Transform, point: Vec2, config: &VoidConfig) -> bool {
    let delta = point - transform.translation.truncate();
    let local = transform
        .rotation
        .inverse()
        .mul_vec3(delta.extend(0.0))
        .truncate();

    let button_x = config.task_width / 2.0 - config.button_pad_right;
    let half = config.button_hit_size / 2.0;

    (local.x - button_x).abs() <= half && local.y.abs() <= half
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// On left-press, resolve the topmost task body under the cursor and emit
/// [`DeleteRequested`] if the press landed in its delete hit-region.
///
/// Matching the point query's single pick: if the first task body found is
/// hit outside its button, the click is a no-op for task logic.
pub fn delete_click_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    rapier: ReadRapierContext,
    bodies: Query<(&TaskBody, &Transform)>,
    config: Res<VoidConfig>,
    mut delete: MessageWriter<DeleteRequested>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(context) = rapier.single() else {
        return;
    };

    let point = cursor_to_world(cursor, window);

    let mut hit: Option<TaskId> = None;
    context.intersections_with_point(point, QueryFilter::default(), |entity| {
        match bodies.get(entity) {
            Ok((task_body, transform)) => {
                if button_local_hit(transform, point, &config) {
                    hit = Some(task_body.task_id);
                }
                // First task body settles the click either way.
                false
            }
            // Walls, particles, shards: keep searching.
            Err(_) => true,
        }
    });

    if let Some(task_id) = hit {
        delete.write(DeleteRequested(task_id));
    }
}

/// Continuous hover pass: show a pointer cursor over any delete button.
///
/// Read-only with respect to simulation state — the only write is the
/// cursor-icon component on the window entity.
pub fn hover_cursor_system(
    mut commands: Commands,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    rapier: ReadRapierContext,
    bodies: Query<(&TaskBody, &Transform)>,
    config: Res<VoidConfig>,
) {
    let Ok((window_entity, window)) = windows.single() else {
        return;
    };
    let Ok(context) = rapier.single() else {
        return;
    };

    let mut hovering = false;
    if let Some(cursor) = window.cursor_position() {
        let point = cursor_to_world(cursor, window);
        context.intersections_with_point(point, QueryFilter::default(), |entity| {
            if let Ok((_, transform)) = bodies.get(entity) {
                if button_local_hit(transform, point, &config) {
                    hovering = true;
                }
                return false;
            }
            true
        });
    }

    let icon = if hovering {
        SystemCursorIcon::Pointer
    } else {
        SystemCursorIcon::Default
    };
    commands.entity(window_entity).insert(CursorIcon::System(icon));
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> VoidConfig {
        VoidConfig::default()
    }

    /// World-space position of the button centre for a body at `pos` rotated
    /// by `angle`.
    fn button_world_center(pos: Vec2, angle: f32, config: &VoidConfig) -> Vec2 {
        let local = Vec2::new(config.task_width / 2.0 - config.button_pad_right, 0.0);
        pos + Vec2::from_angle(angle).rotate(local)
    }

    #[test]
    fn hit_test_is_rotation_invariant() {
        let config = config();
        let pos = Vec2::new(123.0, -456.0);

        // Sweep θ across [0, 2π) — a click at the rotated button centre must
        // always resolve, and a click at the body centre must never.
        for step in 0..32 {
            let angle = step as f32 * std::f32::consts::TAU / 32.0;
            let transform = Transform::from_translation(pos.extend(0.0))
                .with_rotation(Quat::from_rotation_z(angle));

            let on_button = button_world_center(pos, angle, &config);
            assert!(
                button_local_hit(&transform, on_button, &config),
                "button centre must hit at angle {angle}"
            );
            assert!(
                !button_local_hit(&transform, pos, &config),
                "body centre must miss at angle {angle}"
            );
        }
    }

    #[test]
    fn hit_region_is_wider_than_glyph() {
        let config = config();
        let transform = Transform::from_translation(Vec3::ZERO);
        let button_x = config.task_width / 2.0 - config.button_pad_right;

        // Just outside the 24 px glyph but inside the 40 px hit square.
        let near_miss_on_glyph = Vec2::new(
            button_x + config.button_glyph_size / 2.0 + 4.0,
            0.0,
        );
        assert!(button_local_hit(&transform, near_miss_on_glyph, &config));

        // Outside the hit square entirely.
        let clear_miss = Vec2::new(button_x + config.button_hit_size / 2.0 + 1.0, 0.0);
        assert!(!button_local_hit(&transform, clear_miss, &config));
    }

    #[test]
    fn cursor_to_world_centers_and_flips_y() {
        let window = Window {
            resolution: bevy::window::WindowResolution::new(800, 600),
            ..Default::default()
        };
        // Top-left corner of the screen is (-w/2, +h/2) in world space.
        assert_eq!(
            cursor_to_world(Vec2::ZERO, &window),
            Vec2::new(-400.0, 300.0)
        );
        // Screen centre is the world origin.
        assert_eq!(
            cursor_to_world(Vec2::new(400.0, 300.0), &window),
            Vec2::ZERO
        );
    }
}

//! Overlay rendering: task outlines, delete glyphs, labels, shard wireframes.
//!
//! Everything here is a pure function of current transforms and registry
//! contents — no system in this module mutates simulation state.
//!
//! | System                    | Schedule | Purpose                                |
//! |---------------------------|----------|----------------------------------------|
//! | `attach_task_label_system`| Update   | Add a `Text2d` child to new task bodies |
//! | `task_overlay_system`     | Update   | Gizmo outline + delete glyph per body  |
//! | `shard_outline_system`    | Update   | Gizmo wireframe per shatter shard      |
//!
//! The label is a child entity, so it inherits the body's transform and
//! rotates with it for free.  Outlines are drawn with manually-rotated
//! `line_2d` segments; the faint second pass stands in for a glow.

use crate::body::{Accent, TaskBody};
use crate::config::VoidConfig;
use crate::constants::{
    alert_red, BUTTON_CROSS_HALF, LABEL_FONT_SIZE, LABEL_OFFSET_X, LABEL_Z,
};
use crate::shatter::{Shard, Vertices};
use crate::task::TaskStore;
use bevy::prelude::*;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct OverlayRenderPlugin;

impl Plugin for OverlayRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (attach_task_label_system, task_overlay_system, shard_outline_system),
        );
    }
}

// ── Label attachment ──────────────────────────────────────────────────────────

/// Attach the task's text as a `Text2d` child to every newly-spawned body.
///
/// Runs one frame after spawn via [`Added<TaskBody>`]; imperceptible at
/// 60 Hz, and it spares the spawn path an `Assets` handle.
pub fn attach_task_label_system(
    mut commands: Commands,
    store: Res<TaskStore>,
    query: Query<(Entity, &TaskBody), Added<TaskBody>>,
) {
    for (entity, task_body) in query.iter() {
        let Some(text) = store.text_of(task_body.task_id) else {
            continue;
        };
        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                Text2d::new(text),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(LABEL_OFFSET_X, 0.0, LABEL_Z),
            ));
        });
    }
}

// ── Gizmo passes ──────────────────────────────────────────────────────────────

/// Draw each task body's outline rectangle and its delete glyph.
///
/// The glyph square and "X" use the fixed alert colour regardless of the
/// body accent; the drawn square is smaller than the clickable hit-region.
pub fn task_overlay_system(
    mut gizmos: Gizmos,
    query: Query<(&Transform, &Accent), With<TaskBody>>,
    config: Res<VoidConfig>,
) {
    let half_w = config.task_width / 2.0;
    let half_h = config.task_height / 2.0;
    let button_x = config.task_width / 2.0 - config.button_pad_right;
    let glyph_half = config.button_glyph_size / 2.0;

    for (transform, accent) in query.iter() {
        let color = accent.color();

        // Body outline plus a widened low-alpha halo pass as the glow.
        draw_rect(&mut gizmos, transform, Vec2::ZERO, half_w, half_h, color);
        draw_rect(
            &mut gizmos,
            transform,
            Vec2::ZERO,
            half_w + 2.0,
            half_h + 2.0,
            color.with_alpha(0.25),
        );

        // Delete button box, its halo, and the X strokes.
        let button_center = Vec2::new(button_x, 0.0);
        draw_rect(&mut gizmos, transform, button_center, glyph_half, glyph_half, alert_red());
        draw_rect(
            &mut gizmos,
            transform,
            button_center,
            glyph_half + 2.0,
            glyph_half + 2.0,
            alert_red().with_alpha(0.25),
        );

        let cross = BUTTON_CROSS_HALF;
        draw_segment(
            &mut gizmos,
            transform,
            button_center + Vec2::new(-cross, cross),
            button_center + Vec2::new(cross, -cross),
            alert_red(),
        );
        draw_segment(
            &mut gizmos,
            transform,
            button_center + Vec2::new(cross, cross),
            button_center + Vec2::new(-cross, -cross),
            alert_red(),
        );
    }
}

/// Draw each shard's polygon outline in its accent colour.
pub fn shard_outline_system(
    mut gizmos: Gizmos,
    query: Query<(&Transform, &Vertices, &Accent), With<Shard>>,
) {
    for (transform, vertices, accent) in query.iter() {
        if vertices.0.len() < 2 {
            continue;
        }
        for i in 0..vertices.0.len() {
            let v1 = vertices.0[i];
            let v2 = vertices.0[(i + 1) % vertices.0.len()];
            draw_segment(&mut gizmos, transform, v1, v2, accent.color());
        }
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

/// Map a body-local point into world space through the body's transform.
fn to_world(transform: &Transform, local: Vec2) -> Vec2 {
    transform.translation.truncate() + transform.rotation.mul_vec3(local.extend(0.0)).truncate()
}

/// Draw one body-local line segment, rotated and translated with the body.
fn draw_segment(gizmos: &mut Gizmos, transform: &Transform, a: Vec2, b: Vec2, color: Color) {
    gizmos.line_2d(to_world(transform, a), to_world(transform, b), color);
}

/// Draw a body-local axis-aligned rectangle outline centred at `center`.
fn draw_rect(
    gizmos: &mut Gizmos,
    transform: &Transform,
    center: Vec2,
    half_w: f32,
    half_h: f32,
    color: Color,
) {
    let corners = [
        center + Vec2::new(-half_w, -half_h),
        center + Vec2::new(half_w, -half_h),
        center + Vec2::new(half_w, half_h),
        center + Vec2::new(-half_w, half_h),
    ];
    for i in 0..4 {
        draw_segment(gizmos, transform, corners[i], corners[(i + 1) % 4], color);
    }
}

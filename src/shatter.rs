//! The screen-shatter finale: a one-shot secondary scene of falling shards.
//!
//! When the last task clears, the screen "breaks" into a grid of small
//! polygon fragments that tumble away under gravity.  The scene is purely
//! decorative — shards carry no task semantics and are despawned wholesale
//! when the state leaves `Shattering`.
//!
//! | System                 | Schedule              | Purpose                      |
//! |------------------------|-----------------------|------------------------------|
//! | `enter_shatter_system` | `OnEnter(Shattering)` | Spawn the shard grid         |
//! | `exit_shatter_system`  | `OnExit(Shattering)`  | Despawn every shard          |

use crate::arena::ArenaBounds;
use crate::body::Accent;
use crate::config::VoidConfig;
use crate::constants::{
    background, SHARD_KICK_DOWN_MAX, SHARD_KICK_DOWN_MIN, SHARD_KICK_LATERAL,
    SHARD_RESTITUTION, SHARD_FRICTION, SHARD_SIDES_MAX, SHARD_SIDES_MIN, SHARD_SPIN, SHARD_Z,
};
use crate::sequencer::{DeferredAction, DeferredQueue};
use crate::ui::GameState;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier2d::prelude::*;
use rand::Rng;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker for one screen fragment.
#[derive(Component)]
pub struct Shard;

/// Polygon vertices in local space, kept for wireframe outline rendering.
#[derive(Component, Debug, Clone)]
pub struct Vertices(pub Vec<Vec2>);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ShatterPlugin;

impl Plugin for ShatterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Shattering), enter_shatter_system)
            .add_systems(OnExit(GameState::Shattering), exit_shatter_system);
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Tile the screen with a grid of shard polygons, kick each one, and
/// schedule the transition to the cleared screen.
pub fn enter_shatter_system(
    mut commands: Commands,
    bounds: Res<ArenaBounds>,
    config: Res<VoidConfig>,
    time: Res<Time>,
    mut queue: ResMut<DeferredQueue>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mut rng = rand::thread_rng();

    let cols = config.shard_cols;
    let rows = config.shard_rows;
    let cell_w = bounds.width / cols as f32;
    let cell_h = bounds.height / rows as f32;
    let radius = cell_w.min(cell_h) / config.shard_radius_divisor;

    let fill = materials.add(ColorMaterial::from_color(background()));

    for row in 0..rows {
        for col in 0..cols {
            let x = -bounds.half_width() + (col as f32 + 0.5) * cell_w;
            let y = bounds.half_height() - (row as f32 + 0.5) * cell_h;

            let sides = rng.gen_range(SHARD_SIDES_MIN..=SHARD_SIDES_MAX);
            let vertices = shard_polygon(sides, radius);

            let kick = Vec2::new(
                rng.gen_range(-SHARD_KICK_LATERAL..SHARD_KICK_LATERAL),
                -rng.gen_range(SHARD_KICK_DOWN_MIN..SHARD_KICK_DOWN_MAX),
            );

            commands.spawn((
                Shard,
                Accent::random(&mut rng),
                Vertices(vertices.clone()),
                Transform::from_translation(Vec3::new(x, y, SHARD_Z)).with_rotation(
                    Quat::from_rotation_z(rng.gen_range(0.0..std::f32::consts::PI)),
                ),
                GlobalTransform::default(),
                Visibility::default(),
                RigidBody::Dynamic,
                Collider::convex_hull(&vertices).unwrap_or_else(|| Collider::ball(radius * 0.6)),
                Restitution::coefficient(SHARD_RESTITUTION),
                Friction::coefficient(SHARD_FRICTION),
                Velocity {
                    linvel: kick,
                    angvel: rng.gen_range(-SHARD_SPIN..SHARD_SPIN),
                },
                Mesh2d(meshes.add(fan_mesh(&vertices))),
                MeshMaterial2d(fill.clone()),
            ));
        }
    }

    queue.schedule(
        time.elapsed_secs_f64() + config.shatter_duration as f64,
        DeferredAction::FinishShatter,
    );

    eprintln!("[SHATTER] {} shards falling", cols * rows);
}

/// Despawn every shard when the shatter animation ends.
pub fn exit_shatter_system(mut commands: Commands, shards: Query<Entity, With<Shard>>) {
    for entity in shards.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Vertices of a regular `sides`-gon of the given radius, centred on the
/// origin.  Irregularity comes from the per-shard side count and random
/// spawn rotation rather than vertex jitter, which keeps the hulls convex.
pub fn shard_polygon(sides: u32, radius: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / sides as f32;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Build a filled mesh for a convex polygon as a triangle fan from the
/// centroid: `(0, i, i+1 mod n)`.
fn fan_mesh(vertices: &[Vec2]) -> Mesh {
    let n = vertices.len();
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    let max_r = vertices
        .iter()
        .map(|v| v.length())
        .fold(1.0_f32, f32::max);

    // Centre vertex.
    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for v in vertices {
        positions.push([v.x, v.y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([v.x / (2.0 * max_r) + 0.5, v.y / (2.0 * max_r) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Explosion particles: the debris a destroyed task body bursts into.
//!
//! ## Design
//!
//! Particles are small dynamic Rapier rectangles with an [`ExplosionParticle`]
//! component carrying their spawn-time mass.  A two-system pipeline handles
//! their visuals:
//!
//! | System                        | Schedule | Purpose                                    |
//! |-------------------------------|----------|--------------------------------------------|
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned particles |
//! | `cull_escaped_particles_system` | Update | Safety sweep for debris that leaves the arena |
//!
//! [`spawn_explosion_burst`] takes only `&mut Commands` — no `Assets` access
//! at spawn time.  `attach_particle_mesh_system` supplies the `Mesh2d` one
//! frame later, which is imperceptible at 60 Hz.
//!
//! A single shared unit-quad mesh [`ParticleMesh`] resource is created at
//! plugin startup to avoid per-particle mesh allocation; each particle scales
//! it through its `Transform` (Rapier scales the collider the same way, so
//! the visual and physical footprints agree).

use crate::arena::ArenaBounds;
use crate::body::Accent;
use crate::config::VoidConfig;
use crate::constants::PARTICLE_Z;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier2d::prelude::*;
use rand::Rng;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Shared unit-quad mesh used by all particle entities (created once at startup).
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

// ── Component ─────────────────────────────────────────────────────────────────

/// Short-lived debris rectangle from a destroyed task body.
///
/// Lives until an attractor absorbs it or the world is torn down.
#[derive(Component, Debug, Clone, Copy)]
pub struct ExplosionParticle {
    /// Mass at spawn (`side² × density`), used by the attractor force law.
    /// Mirrors the collider's density-derived mass without a physics
    /// read-back, which keeps the force law headlessly testable.
    pub mass: f32,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh)
            .add_systems(Update, attach_particle_mesh_system);
    }
}

// ── Startup system ────────────────────────────────────────────────────────────

/// Create the shared unit quad and store it as a [`ParticleMesh`] resource.
fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(unit_quad_mesh());
    commands.insert_resource(ParticleMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned particle.
///
/// Uses [`Added<ExplosionParticle>`] so it only runs for particles that
/// appeared since the last frame — zero overhead for the steady-state
/// population.
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    query: Query<(Entity, &Accent), Added<ExplosionParticle>>,
) {
    for (entity, accent) in query.iter() {
        let mat_handle = materials.add(ColorMaterial::from_color(accent.color()));
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Despawn any particle that has somehow left the arena far behind.
///
/// The walls normally contain all debris; this sweep catches the rare
/// high-speed particle that tunnels out the open top and keeps orbiting a
/// long-dead attractor's former position.
pub fn cull_escaped_particles_system(
    mut commands: Commands,
    bounds: Res<ArenaBounds>,
    query: Query<(Entity, &Transform), With<ExplosionParticle>>,
) {
    let cull_distance = (bounds.width + bounds.height).max(1000.0);

    for (entity, transform) in query.iter() {
        if transform.translation.truncate().length() > cull_distance {
            commands.entity(entity).despawn();
        }
    }
}

// ── Public spawn helper ───────────────────────────────────────────────────────

/// Spawn the fixed-size particle burst for a destroyed task body.
///
/// Each particle gets a random side length, a random position inside the
/// destroyed body's footprint, a small random outward impulse, and the
/// destroyed body's accent colour.
pub fn spawn_explosion_burst(
    commands: &mut Commands,
    center: Vec2,
    accent: Accent,
    config: &VoidConfig,
) {
    let mut rng = rand::thread_rng();

    for _ in 0..config.explosion_particles {
        let size = rng.gen_range(
            config.particle_size_min..config.particle_size_min + config.particle_size_range,
        );
        let offset = Vec2::new(
            rng.gen_range(-config.task_width / 2.0..config.task_width / 2.0),
            rng.gen_range(-config.task_height / 2.0..config.task_height / 2.0),
        );
        let mass = size * size * config.particle_density;

        let kick = Vec2::new(rng.gen_range(-1.0..1.0_f32), rng.gen_range(-1.0..1.0_f32))
            * config.particle_kick_speed
            * mass;

        commands.spawn((
            ExplosionParticle { mass },
            accent,
            Transform::from_translation((center + offset).extend(PARTICLE_Z))
                .with_scale(Vec3::new(size, size, 1.0)),
            GlobalTransform::default(),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::cuboid(0.5, 0.5),
            ColliderMassProperties::Density(config.particle_density),
            Damping {
                linear_damping: config.particle_air_damping,
                angular_damping: config.particle_air_damping,
            },
            ExternalForce {
                force: Vec2::ZERO,
                torque: 0.0,
            },
            ExternalImpulse {
                impulse: kick,
                torque_impulse: 0.0,
            },
        ));
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled 1×1 quad mesh centred on the origin.
///
/// Two triangles over four vertices; particles scale it per-entity through
/// their `Transform`.
fn unit_quad_mesh() -> Mesh {
    let positions: Vec<[f32; 3]> = vec![
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
    ];
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; 4];
    let uvs: Vec<[f32; 2]> = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let indices: Vec<u32> = vec![0, 1, 2, 0, 2, 3];

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

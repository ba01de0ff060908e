//! Attractors — the "black holes" that swallow explosion debris.
//!
//! Each destroyed task body leaves an attractor entity at its last position.
//! While active, an attractor pulls every particle inward and adds a
//! half-strength perpendicular swirl, so debris spirals in instead of
//! falling straight.  Particles crossing the capture radius are absorbed
//! (despawned).  Forces from multiple simultaneously-active attractors
//! accumulate additively within a step.
//!
//! Attractors are keyed by their `Entity` id everywhere (scheduling,
//! deactivation), never by position — two tasks destroyed at the same spot
//! can never alias.  A deactivated attractor is inert but remains until the
//! world is torn down.

use crate::config::VoidConfig;
use crate::particles::ExplosionParticle;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

// ── Component ─────────────────────────────────────────────────────────────────

/// A timed point source of inward + tangential force.
#[derive(Component, Debug, Clone, Copy)]
pub struct Attractor {
    /// While true the attractor applies force; flipped off by the sequencer
    /// after its lifetime elapses.
    pub active: bool,
}

/// Spawn an active attractor at `position` and return its entity.
pub fn spawn_attractor(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Attractor { active: true },
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
        ))
        .id()
}

// ── System ────────────────────────────────────────────────────────────────────

/// Apply attractor forces to every live particle, once per update step.
///
/// Accumulated forces are zeroed first, then each active attractor adds its
/// contribution: an inward pull of `attractor_force × mass` along the
/// normalized direction plus a perpendicular swirl at half that magnitude.
/// A particle inside the capture radius is despawned and skipped for the
/// rest of the step.
pub fn attractor_forces_system(
    mut commands: Commands,
    attractors: Query<(&Transform, &Attractor), Without<ExplosionParticle>>,
    mut particles: Query<(Entity, &Transform, &ExplosionParticle, &mut ExternalForce)>,
    config: Res<VoidConfig>,
) {
    // Forces are re-derived from scratch each step.
    for (_, _, _, mut force) in particles.iter_mut() {
        force.force = Vec2::ZERO;
    }

    let mut captured: HashSet<Entity> = HashSet::new();

    for (attractor_transform, attractor) in attractors.iter() {
        if !attractor.active {
            continue;
        }
        let hole = attractor_transform.translation.truncate();

        for (entity, particle_transform, particle, mut force) in particles.iter_mut() {
            if captured.contains(&entity) {
                continue;
            }

            let delta = hole - particle_transform.translation.truncate();
            let distance = delta.length();

            if distance < config.attractor_radius {
                commands.entity(entity).despawn();
                captured.insert(entity);
                continue;
            }

            let inward = delta / distance;
            let magnitude = config.attractor_force * particle.mass;
            let swirl = Vec2::new(-inward.y, inward.x);

            force.force += inward * magnitude + swirl * magnitude * 0.5;
        }
    }
}

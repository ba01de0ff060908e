//! Task bodies and the registry that keeps them in lock-step with the store.
//!
//! Every live task owns exactly one dynamic rectangle in the physics world.
//! [`sync_task_bodies_system`] only ever *adds* bodies — removal is the
//! destruction pipeline's job (or a full teardown), so a body and its task
//! always leave together.
//!
//! New bodies spawn above the visible area at a random x and fall into view
//! under gravity.  Each is tagged with one of the two accent colours, chosen
//! 50/50 at spawn and fixed for the body's life.

use crate::arena::ArenaBounds;
use crate::config::VoidConfig;
use crate::constants::TASK_Z;
use crate::task::{TaskId, TaskStore};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;
use std::collections::HashMap;

// ── Components ────────────────────────────────────────────────────────────────

/// A task's physical presence in the void.
#[derive(Component, Debug, Clone, Copy)]
pub struct TaskBody {
    /// Back-reference to the owning task.
    pub task_id: TaskId,
}

/// Accent colour assigned at spawn; shared by the body outline, its label
/// glow, and the explosion particles it bursts into.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Cyan,
    Magenta,
}

impl Accent {
    /// Pick cyan or magenta with equal probability.
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Accent::Cyan
        } else {
            Accent::Magenta
        }
    }

    pub fn color(self) -> Color {
        match self {
            Accent::Cyan => crate::constants::accent_cyan(),
            Accent::Magenta => crate::constants::accent_magenta(),
        }
    }
}

// ── Registry resource ─────────────────────────────────────────────────────────

/// Mapping from task id to the entity of its simulated body.
///
/// Invariants: exactly one entry per live task that has a body; never an
/// entry for a task id absent from the [`TaskStore`].  A store task with no
/// entry yet is simply "pending spawn" until the next sync pass.
#[derive(Resource, Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<TaskId, Entity>,
}

impl BodyRegistry {
    pub fn insert(&mut self, id: TaskId, entity: Entity) {
        self.bodies.insert(id, entity);
    }

    /// Remove an entry, returning its entity if it was present.
    pub fn remove(&mut self, id: TaskId) -> Option<Entity> {
        self.bodies.remove(&id)
    }

    pub fn get(&self, id: TaskId) -> Option<Entity> {
        self.bodies.get(&id).copied()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Give every store task without a registry entry a freshly-spawned body.
///
/// Runs every frame; steady-state cost is one hash lookup per live task.
pub fn sync_task_bodies_system(
    mut commands: Commands,
    store: Res<TaskStore>,
    mut registry: ResMut<BodyRegistry>,
    bounds: Res<ArenaBounds>,
    config: Res<VoidConfig>,
) {
    let mut rng = rand::thread_rng();

    for task in store.iter() {
        if registry.contains(task.id) {
            continue;
        }

        let half_range = (bounds.half_width() - config.spawn_margin_x).max(0.0);
        let x = if half_range > 0.0 {
            rng.gen_range(-half_range..half_range)
        } else {
            0.0
        };
        let y = bounds.half_height() + config.spawn_drop_height;

        let accent = Accent::random(&mut rng);
        let entity = spawn_task_body(&mut commands, task.id, Vec2::new(x, y), accent, &config);
        registry.insert(task.id, entity);
    }
}

/// Spawn a single dynamic task rectangle and return its entity.
pub fn spawn_task_body(
    commands: &mut Commands,
    task_id: TaskId,
    position: Vec2,
    accent: Accent,
    config: &VoidConfig,
) -> Entity {
    commands
        .spawn((
            TaskBody { task_id },
            accent,
            Transform::from_translation(position.extend(TASK_Z)),
            GlobalTransform::default(),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::cuboid(config.task_width / 2.0, config.task_height / 2.0),
            Restitution::coefficient(config.task_restitution),
            Friction::coefficient(config.task_friction),
            Velocity::zero(),
        ))
        .id()
}

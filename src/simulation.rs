//! Simulation plugin: system registration and per-step ordering.
//!
//! The interactive core is one ordered chain per `Update`:
//! click resolution → destruction → store bookkeeping → body sync →
//! attractor forces → deferred-queue poll.  Rapier steps in its own
//! fixed-timestep schedule between frames; pointer events and deferred
//! callbacks are interleaved into this single-threaded timeline, never run
//! concurrently with it.

use crate::arena::{setup_arena, ArenaBounds, Wall};
use crate::attractor::{attractor_forces_system, Attractor};
use crate::body::{sync_task_bodies_system, BodyRegistry, TaskBody};
use crate::config::VoidConfig;
use crate::destruction::destruction_system;
use crate::input::{delete_click_system, hover_cursor_system, DeleteRequested};
use crate::particles::{cull_escaped_particles_system, ExplosionParticle};
use crate::sequencer::{poll_deferred_system, reset_episode, DeferredQueue, EpisodeState};
use crate::task::{apply_add_requests, apply_completions, TaskCompleted, TaskStore};
use crate::ui::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TaskStore>()
            .init_resource::<BodyRegistry>()
            .init_resource::<DeferredQueue>()
            .init_resource::<EpisodeState>()
            .init_resource::<ArenaBounds>()
            .add_message::<DeleteRequested>()
            .add_message::<TaskCompleted>()
            // Runs in every state: submitting a task from the cleared screen
            // doubles as a reboot, so this must not be gated.
            .add_systems(
                Update,
                apply_add_requests.before(sync_task_bodies_system),
            )
            .add_systems(
                Update,
                (
                    delete_click_system,
                    destruction_system,
                    apply_completions, // same frame as destruction: store and registry stay in step
                    sync_task_bodies_system,
                    attractor_forces_system,
                    poll_deferred_system,
                )
                    .chain()
                    .run_if(not(in_state(GameState::Cleared))),
            )
            .add_systems(
                Update,
                (hover_cursor_system, cull_escaped_particles_system)
                    .run_if(not(in_state(GameState::Cleared))),
            )
            .add_systems(OnEnter(GameState::Cleared), teardown_world_system)
            .add_systems(OnExit(GameState::Cleared), (setup_arena, reset_episode));
    }
}

/// Configure Rapier physics: straight-down gravity at the tuned strength.
pub fn setup_downward_gravity(
    mut rapier_config: Query<&mut RapierConfiguration>,
    config: Res<VoidConfig>,
) {
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity_y);
    }
}

/// Tear the primary physics world down when the cleared screen takes over.
///
/// Despawns every simulation entity, empties the registry, and cancels all
/// pending deferred work so nothing stale can fire into a rebuilt world.
#[allow(clippy::type_complexity)]
pub fn teardown_world_system(
    mut commands: Commands,
    mut registry: ResMut<BodyRegistry>,
    mut queue: ResMut<DeferredQueue>,
    entities: Query<
        Entity,
        Or<(
            With<TaskBody>,
            With<ExplosionParticle>,
            With<Attractor>,
            With<Wall>,
        )>,
    >,
) {
    let mut count = 0;
    for entity in entities.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    registry.clear();
    queue.clear();
    eprintln!("[TEARDOWN] Removed {count} world entities");
}

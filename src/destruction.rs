//! The destruction pipeline: what happens when a delete click lands.
//!
//! Everything below occurs atomically within one update step, per destroyed
//! task: the body leaves the simulation and the registry, the store is
//! notified, the particle burst spawns, and an attractor opens at the body's
//! last position with its deactivation scheduled on the deferred queue.
//!
//! A request whose task id is no longer registered is silently ignored —
//! the pointer can fire twice before the first despawn applies, and the
//! second click must be a harmless no-op.

use crate::attractor::spawn_attractor;
use crate::body::{Accent, BodyRegistry, TaskBody};
use crate::config::VoidConfig;
use crate::input::DeleteRequested;
use crate::particles::spawn_explosion_burst;
use crate::sequencer::{DeferredAction, DeferredQueue};
use crate::task::TaskCompleted;
use bevy::prelude::*;

/// Consume [`DeleteRequested`] messages and run the full destruction
/// sequence for each still-registered task id.
pub fn destruction_system(
    mut commands: Commands,
    mut requests: MessageReader<DeleteRequested>,
    mut registry: ResMut<BodyRegistry>,
    bodies: Query<(&Transform, &Accent), With<TaskBody>>,
    mut completed: MessageWriter<TaskCompleted>,
    mut queue: ResMut<DeferredQueue>,
    config: Res<VoidConfig>,
    time: Res<Time>,
) {
    for DeleteRequested(task_id) in requests.read() {
        // Double-fire guard: only a registered id destroys anything.
        let Some(entity) = registry.remove(*task_id) else {
            continue;
        };

        // Task and body leave together, so the store is notified even if the
        // registry somehow held a stale entity handle.
        completed.write(TaskCompleted(*task_id));

        let Ok((transform, accent)) = bodies.get(entity) else {
            continue;
        };
        let last_position = transform.translation.truncate();
        let accent = *accent;

        commands.entity(entity).despawn();

        spawn_explosion_burst(&mut commands, last_position, accent, &config);

        let attractor = spawn_attractor(&mut commands, last_position);
        queue.schedule(
            time.elapsed_secs_f64() + config.attractor_lifetime as f64,
            DeferredAction::DeactivateAttractor(attractor),
        );

        eprintln!("[DESTROY] {task_id} collapsed at {last_position:?}");
    }
}

//! Deferred work and end-of-game sequencing.
//!
//! Every "wait" in the game — attractor deactivation, the clear-signal
//! delay, the shatter-to-cleared transition — is an entry in one
//! [`DeferredQueue`], polled once per update step against the virtual clock.
//! Nothing blocks, and ordering relative to the physics step is
//! deterministic.
//!
//! Ordering discipline: an action re-validates the world when it *fires*,
//! never trusting state captured when it was scheduled.  The attractor may
//! be gone, the registry may have refilled, the whole world may have been
//! torn down — each case degrades to a no-op.
//!
//! ## Clear-signal rules
//!
//! `AllCleared` fires at most once per episode, and only when the registry
//! is empty at fire time *and* at least one task was added this episode.  A
//! world that starts empty and stays empty never fires.

use crate::attractor::Attractor;
use crate::body::BodyRegistry;
use crate::config::VoidConfig;
use crate::task::TaskStore;
use crate::ui::GameState;
use bevy::prelude::*;

// ── Messages ──────────────────────────────────────────────────────────────────

/// Every task is gone and the episode had at least one.  Fired once per
/// clearing episode; drives `Active → Shattering`.
#[derive(Message, Debug, Clone, Copy)]
pub struct AllCleared;

// ── Episode bookkeeping ───────────────────────────────────────────────────────

/// Per-episode flags guarding the clear signal.
#[derive(Resource, Debug, Default)]
pub struct EpisodeState {
    /// At least one task has been added since the episode began.  Gates the
    /// clear signal so an initially-empty world never "clears".
    pub ever_added: bool,
    /// The clear signal already fired this episode.
    pub clear_signalled: bool,
}

// ── Deferred queue ────────────────────────────────────────────────────────────

/// Work item scheduled for a future simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deferred {
    /// Absolute deadline in seconds of virtual elapsed time.
    pub due: f64,
    pub action: DeferredAction,
}

/// The kinds of deferred work the game schedules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Switch off this attractor; if the registry is empty afterwards,
    /// schedule the clear check.
    DeactivateAttractor(Entity),
    /// Re-read the registry and fire [`AllCleared`] if the episode earned it.
    CheckAllCleared,
    /// The shatter animation has played out; move to the cleared screen.
    FinishShatter,
}

/// Single queue of pending deferred work, drained by
/// [`poll_deferred_system`] once per update step.
#[derive(Resource, Debug, Default)]
pub struct DeferredQueue {
    entries: Vec<Deferred>,
}

impl DeferredQueue {
    /// Schedule `action` to fire once `now >= due`.
    pub fn schedule(&mut self, due: f64, action: DeferredAction) {
        self.entries.push(Deferred { due, action });
    }

    /// Remove and return every entry due at `now`, ordered by deadline so
    /// same-step actions fire in the order they were meant to.
    pub fn take_due(&mut self, now: f64) -> Vec<Deferred> {
        let mut due: Vec<Deferred> = Vec::new();
        self.entries.retain(|entry| {
            if entry.due <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due
    }

    /// Drop all pending work.  Called on world teardown so stale actions can
    /// never touch a rebuilt world.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Drain due deferred work, re-validating against current world state.
pub fn poll_deferred_system(
    mut queue: ResMut<DeferredQueue>,
    time: Res<Time>,
    registry: Res<BodyRegistry>,
    mut episode: ResMut<EpisodeState>,
    mut attractors: Query<&mut Attractor>,
    mut all_cleared: MessageWriter<AllCleared>,
    mut next_state: ResMut<NextState<GameState>>,
    config: Res<VoidConfig>,
) {
    let now = time.elapsed_secs_f64();

    for Deferred { action, .. } in queue.take_due(now) {
        match action {
            DeferredAction::DeactivateAttractor(entity) => {
                // The attractor may already be gone (teardown raced us).
                if let Ok(mut attractor) = attractors.get_mut(entity) {
                    attractor.active = false;
                }
                if registry.is_empty() {
                    queue.schedule(now + config.clear_delay as f64, DeferredAction::CheckAllCleared);
                }
            }
            DeferredAction::CheckAllCleared => {
                // Registry size is read *now*, not when the check was
                // scheduled — tasks added during the delay veto the clear.
                if registry.is_empty() && episode.ever_added && !episode.clear_signalled {
                    episode.clear_signalled = true;
                    all_cleared.write(AllCleared);
                    eprintln!("[SEQUENCER] All tasks cleared");
                }
            }
            DeferredAction::FinishShatter => {
                next_state.set(GameState::Cleared);
            }
        }
    }
}

/// Start a fresh episode when leaving the cleared screen.
///
/// Tasks submitted from the cleared screen survive into the new episode, so
/// `ever_added` is recomputed from the store rather than blindly reset.
pub fn reset_episode(mut episode: ResMut<EpisodeState>, store: Res<TaskStore>) {
    episode.clear_signalled = false;
    episode.ever_added = !store.is_empty();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_due_returns_only_elapsed_entries_in_order() {
        let mut queue = DeferredQueue::default();
        queue.schedule(3.0, DeferredAction::CheckAllCleared);
        queue.schedule(1.0, DeferredAction::FinishShatter);
        queue.schedule(2.0, DeferredAction::CheckAllCleared);

        let due = queue.take_due(2.5);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].action, DeferredAction::FinishShatter);
        assert_eq!(due[1].action, DeferredAction::CheckAllCleared);

        // The 3.0 deadline is untouched and still pending.
        assert_eq!(queue.len(), 1);
        let rest = queue.take_due(10.0);
        assert_eq!(rest.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_drops_pending_work() {
        let mut queue = DeferredQueue::default();
        queue.schedule(1.0, DeferredAction::CheckAllCleared);
        queue.schedule(2.0, DeferredAction::FinishShatter);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.take_due(100.0).is_empty());
    }
}

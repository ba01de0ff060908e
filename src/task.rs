//! The task store — the list of things the player has promised to do.
//!
//! The store is the UI shell's collaborator: the physics core never touches
//! it directly.  Communication happens over two messages:
//!
//! | Message            | Direction       | Effect                          |
//! |--------------------|-----------------|---------------------------------|
//! | `AddTaskRequested` | UI → store      | Append a task with a fresh id   |
//! | `TaskCompleted`    | core → store    | Remove the destroyed task       |
//!
//! Invariant: task ids are unique for the store's lifetime — they are drawn
//! from a monotonic counter that is never reset, not even across reboots, so
//! a stale deferred callback can never alias a new task.

use crate::sequencer::EpisodeState;
use crate::ui::GameState;
use bevy::prelude::*;
use std::fmt;

// ── Ids and records ───────────────────────────────────────────────────────────

/// Opaque unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// One entry in the to-do list.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
}

// ── Store resource ────────────────────────────────────────────────────────────

/// Ordered list of live tasks plus the id counter.
#[derive(Resource, Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Append a task and return its freshly-allocated id.
    pub fn add(&mut self, text: impl Into<String>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            text: text.into(),
        });
        id
    }

    /// Remove a task by id.  Returns `false` when the id was not present —
    /// callers treat that as a harmless no-op, not an error.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Text of a live task, if it exists.
    pub fn text_of(&self, id: TaskId) -> Option<&str> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Bulk reset.  The id counter is deliberately NOT reset.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// UI shell asks for a new task with this text.
#[derive(Message, Debug, Clone)]
pub struct AddTaskRequested(pub String);

/// Core notifies the store that a task's body was destroyed.
#[derive(Message, Debug, Clone, Copy)]
pub struct TaskCompleted(pub TaskId);

// ── Systems ───────────────────────────────────────────────────────────────────

/// Apply queued `AddTaskRequested` messages to the store.
///
/// Submitting a task while the cleared screen is up doubles as a reboot:
/// the state flips back to `Active` and the new task falls into the rebuilt
/// world (the old list, if the player skipped the reboot button, survives).
pub fn apply_add_requests(
    mut requests: MessageReader<AddTaskRequested>,
    mut store: ResMut<TaskStore>,
    mut episode: ResMut<EpisodeState>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for AddTaskRequested(text) in requests.read() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        let id = store.add(trimmed);
        episode.ever_added = true;
        eprintln!("[TASKS] Added {id}: {trimmed:?}");

        if *state.get() == GameState::Cleared {
            next_state.set(GameState::Active);
        }
    }
}

/// Apply queued `TaskCompleted` messages to the store.
///
/// Runs in the same frame, directly after the destruction pipeline, so the
/// store and the body registry never disagree across a frame boundary.
pub fn apply_completions(
    mut completions: MessageReader<TaskCompleted>,
    mut store: ResMut<TaskStore>,
) {
    for TaskCompleted(id) in completions.read() {
        store.remove(*id);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

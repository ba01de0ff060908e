//! Headless unit tests for the [`GameState`] state machine.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering, no physics —
//! so they run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `Active`.
//! 2. The `AllCleared` listener transitions `Active` → `Shattering`.
//! 3. A `FinishShatter` deferred action transitions to `Cleared`.
//! 4. `AllCleared` arriving outside `Active` is ignored.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use voidlist::body::BodyRegistry;
use voidlist::config::VoidConfig;
use voidlist::sequencer::{
    poll_deferred_system, AllCleared, DeferredAction, DeferredQueue, EpisodeState,
};
use voidlist::ui::{all_cleared_listener, GameState};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with the state machine, the sequencer
/// resources, and the two systems that drive state transitions.
///
/// `MinimalPlugins` provides scheduling and `Time`; `StatesPlugin` adds the
/// `StateTransition` schedule needed by `init_state`.
fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app.init_resource::<BodyRegistry>();
    app.init_resource::<DeferredQueue>();
    app.init_resource::<EpisodeState>();
    app.insert_resource(VoidConfig::default());
    app.add_message::<AllCleared>();
    app.add_systems(Update, (poll_deferred_system, all_cleared_listener).chain());
    app
}

fn current_state(app: &App) -> GameState {
    app.world().resource::<State<GameState>>().get().clone()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// The default variant of `GameState` is `Active`.
#[test]
fn default_state_is_active() {
    let mut app = app();
    app.update(); // run one frame so StateTransition fires
    assert_eq!(
        current_state(&app),
        GameState::Active,
        "initial state must be Active"
    );
}

/// An `AllCleared` message in `Active` requests `Shattering`.
#[test]
fn all_cleared_transitions_to_shattering() {
    let mut app = app();
    app.update();

    app.world_mut().write_message(AllCleared);
    app.update(); // listener requests Shattering
    app.update(); // StateTransition applies it

    assert_eq!(
        current_state(&app),
        GameState::Shattering,
        "AllCleared in Active must enter Shattering"
    );
}

/// A due `FinishShatter` action moves the state to `Cleared`.
#[test]
fn finish_shatter_transitions_to_cleared() {
    let mut app = app();
    app.update();

    app.world_mut()
        .resource_mut::<DeferredQueue>()
        .schedule(0.0, DeferredAction::FinishShatter);
    app.update(); // poll fires, requests Cleared
    app.update(); // StateTransition applies it

    assert_eq!(
        current_state(&app),
        GameState::Cleared,
        "FinishShatter must land in Cleared"
    );
}

/// `AllCleared` arriving while already shattering or cleared is ignored —
/// the listener only acts from `Active`.
#[test]
fn all_cleared_is_ignored_outside_active() {
    let mut app = app();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Cleared);
    app.update();
    assert_eq!(current_state(&app), GameState::Cleared);

    app.world_mut().write_message(AllCleared);
    app.update();
    app.update();

    assert_eq!(
        current_state(&app),
        GameState::Cleared,
        "AllCleared outside Active must not change state"
    );
}

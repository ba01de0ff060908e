//! UI shell — `GameState` definition, task input bar, and the cleared screen.
//!
//! ## States
//!
//! | State        | Description                                            |
//! |--------------|--------------------------------------------------------|
//! | `Active`     | Normal interaction; tasks fall, clicks destroy         |
//! | `Shattering` | Last task cleared; shard scene plays over the world    |
//! | `Cleared`    | World torn down; congratulations + reboot affordance   |
//!
//! ## Systems (registered by `UiShellPlugin`)
//!
//! | System                   | Schedule                  | Purpose                      |
//! |--------------------------|---------------------------|------------------------------|
//! | `setup_input_bar`        | `Startup`                 | Spawn the typing bar         |
//! | `keyboard_input_system`  | `Update`                  | Buffer keys, submit on Enter |
//! | `input_bar_display_system` | `Update`                | Mirror the buffer into the UI|
//! | `all_cleared_listener`   | `Update`                  | `Active → Shattering`        |
//! | `setup_cleared_overlay`  | `OnEnter(Shattering)`     | Big "SYSTEM CLEARED" text    |
//! | `setup_reboot_button`    | `OnEnter(Cleared)`        | Spawn the reboot button      |
//! | `reboot_button_system`   | `Update / in Cleared`     | Handle reboot clicks         |
//! | `cleanup_cleared_ui`     | `OnExit(Cleared)`         | Despawn overlay + button     |

use crate::constants::{accent_magenta, alert_red, INPUT_MAX_LEN};
use crate::sequencer::AllCleared;
use crate::task::{AddTaskRequested, TaskStore};
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine, owned by the UI shell.
///
/// The simulation systems in [`crate::simulation::SimulationPlugin`] run
/// while the state is anything but `Cleared`; entering `Cleared` tears the
/// physics world down.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Normal interaction.
    #[default]
    Active,
    /// Transient end-of-game animation; auto-advances to `Cleared`.
    Shattering,
    /// Everything done; waiting for an explicit reboot.
    Cleared,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Characters typed so far for the next task.
#[derive(Resource, Debug, Default)]
pub struct InputBuffer {
    pub text: String,
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the task input bar.
#[derive(Component)]
pub struct InputBarRoot;

/// The text node inside the input bar that mirrors [`InputBuffer`].
#[derive(Component)]
pub struct InputBarText;

/// Root node of the "SYSTEM CLEARED" overlay (spawned when shattering starts).
#[derive(Component)]
pub struct ClearedOverlayRoot;

/// Tags the reboot button on the cleared screen.
#[derive(Component)]
pub struct RebootButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `GameState`, the input bar, and the cleared-screen UI.
///
/// This plugin must be added to the app **before** any plugin that calls
/// `.run_if(in_state(...))`, so the state is always registered first.
pub struct UiShellPlugin;

impl Plugin for UiShellPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<InputBuffer>()
            .add_message::<AddTaskRequested>()
            .add_message::<AllCleared>()
            .add_systems(Startup, setup_input_bar)
            .add_systems(
                Update,
                (
                    keyboard_input_system,
                    input_bar_display_system,
                    all_cleared_listener,
                ),
            )
            .add_systems(OnEnter(GameState::Shattering), setup_cleared_overlay)
            .add_systems(OnEnter(GameState::Cleared), setup_reboot_button)
            .add_systems(
                Update,
                reboot_button_system.run_if(in_state(GameState::Cleared)),
            )
            .add_systems(OnExit(GameState::Cleared), cleanup_cleared_ui);
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn bar_border() -> Color {
    Color::srgb(0.0, 0.55, 0.55)
}
fn bar_text() -> Color {
    Color::srgb(0.70, 1.0, 1.0)
}
fn hint_color() -> Color {
    Color::srgb(0.30, 0.30, 0.38)
}
fn reboot_text() -> Color {
    accent_magenta()
}

// ── Startup: input bar ────────────────────────────────────────────────────────

/// Spawn the task input bar in the top-left corner, terminal-prompt style.
///
/// There is no text-input widget to lean on; [`keyboard_input_system`] feeds
/// [`InputBuffer`] and [`input_bar_display_system`] mirrors it here.
pub fn setup_input_bar(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::FlexStart,
                align_items: AlignItems::FlexStart,
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(24.0)),
                ..default()
            },
            InputBarRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    width: Val::Px(420.0),
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BorderColor::all(bar_border()),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            ))
            .with_children(|bar| {
                bar.spawn((
                    Text::new("> _"),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(bar_text()),
                    InputBarText,
                ));
            });

            root.spawn((
                Text::new("type a task · enter to drop it into the void"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(hint_color()),
            ));
        });
}

// ── Update: typing ────────────────────────────────────────────────────────────

/// Collect typed characters into [`InputBuffer`]; Enter submits the buffer
/// as an [`AddTaskRequested`] message.
pub fn keyboard_input_system(
    mut keys: MessageReader<KeyboardInput>,
    mut buffer: ResMut<InputBuffer>,
    mut add: MessageWriter<AddTaskRequested>,
) {
    for event in keys.read() {
        if !event.state.is_pressed() {
            continue;
        }
        match &event.logical_key {
            Key::Character(chars) => {
                for c in chars.chars().filter(|c| !c.is_control()) {
                    if buffer.text.len() < INPUT_MAX_LEN {
                        buffer.text.push(c);
                    }
                }
            }
            Key::Space => {
                if buffer.text.len() < INPUT_MAX_LEN {
                    buffer.text.push(' ');
                }
            }
            Key::Backspace => {
                buffer.text.pop();
            }
            Key::Enter => {
                if !buffer.text.trim().is_empty() {
                    add.write(AddTaskRequested(buffer.text.clone()));
                }
                buffer.text.clear();
            }
            _ => {}
        }
    }
}

/// Mirror the input buffer into the bar's text node.
pub fn input_bar_display_system(
    buffer: Res<InputBuffer>,
    mut query: Query<&mut Text, With<InputBarText>>,
) {
    if !buffer.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        text.0 = format!("> {}_", buffer.text);
    }
}

// ── Update: clear signal ──────────────────────────────────────────────────────

/// Drive `Active → Shattering` when the sequencer reports the board clear.
pub fn all_cleared_listener(
    mut cleared: MessageReader<AllCleared>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if cleared.read().next().is_some() && *state.get() == GameState::Active {
        next_state.set(GameState::Shattering);
    }
}

// ── OnEnter(Shattering): overlay ──────────────────────────────────────────────

/// Spawn the full-screen congratulations overlay.
///
/// Appears behind the falling shards and stays up through `Cleared`; torn
/// down with the rest of the cleared UI on reboot.
pub fn setup_cleared_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            ClearedOverlayRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("SYSTEM CLEARED: CONGRATS"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(accent_magenta()),
            ));
        });
}

// ── OnEnter(Cleared): reboot button ───────────────────────────────────────────

/// Spawn the reboot button at the bottom of the cleared screen.
pub fn setup_reboot_button(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                padding: UiRect::bottom(Val::Px(40.0)),
                ..default()
            },
            ClearedOverlayRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(24.0), Val::Px(8.0)),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(Color::NONE),
                BorderColor::all(reboot_text()),
                RebootButton,
            ))
            .with_children(|btn| {
                btn.spawn((
                    Text::new("REBOOT SYSTEM"),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(reboot_text()),
                ));
            });
        });
}

// ── Update (Cleared only): reboot interaction ─────────────────────────────────

/// Handle reboot presses: wipe the task list and return to `Active`.
///
/// The physics world was already torn down on entering `Cleared`; leaving it
/// rebuilds the arena at the window's current size.
#[allow(clippy::type_complexity)]
pub fn reboot_button_system(
    query: Query<(&Interaction, &Children), (Changed<Interaction>, With<RebootButton>)>,
    mut btn_text: Query<&mut TextColor>,
    mut store: ResMut<TaskStore>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (interaction, children) in query.iter() {
        match interaction {
            Interaction::Pressed => {
                store.clear();
                next_state.set(GameState::Active);
                eprintln!("[REBOOT] Fresh void");
            }
            Interaction::Hovered => {
                for child in children.iter() {
                    if let Ok(mut color) = btn_text.get_mut(child) {
                        *color = TextColor(alert_red());
                    }
                }
            }
            Interaction::None => {
                for child in children.iter() {
                    if let Ok(mut color) = btn_text.get_mut(child) {
                        *color = TextColor(reboot_text());
                    }
                }
            }
        }
    }
}

// ── OnExit(Cleared): cleanup ──────────────────────────────────────────────────

/// Despawn the congratulations overlay and the reboot button.
pub fn cleanup_cleared_ui(
    mut commands: Commands,
    query: Query<Entity, With<ClearedOverlayRoot>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use voidlist::config::{load_void_config, VoidConfig};
use voidlist::{arena, constants, graphics, particles, render, shatter, simulation, ui};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "VOID//LIST".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(constants::background()))
        // Insert VoidConfig with compiled defaults; load_void_config will
        // overwrite it from assets/void.toml (if present) in the Startup schedule.
        .insert_resource(VoidConfig::default())
        // pixels_per_meter(1.0) keeps world units identical to screen pixels,
        // so spawn positions, hit-regions, and force constants all share one
        // coordinate space.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        // UiShellPlugin registers GameState and must come before the plugins
        // whose systems run under in_state conditions.
        .add_plugins((
            ui::UiShellPlugin,
            simulation::SimulationPlugin,
            particles::ParticlesPlugin,
            shatter::ShatterPlugin,
            render::OverlayRenderPlugin,
        ))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                load_void_config,
                graphics::setup_camera.after(load_void_config),
                arena::setup_arena
                    .after(load_void_config)
                    .after(graphics::setup_camera),
                simulation::setup_downward_gravity.after(load_void_config),
            ),
        )
        .run();
}

//! Runtime configuration loaded from `assets/void.toml`.
//!
//! [`VoidConfig`] is a Bevy [`Resource`] that mirrors the runtime-worthy
//! tuneables from [`crate::constants`].  At startup, [`load_void_config`] reads
//! `assets/void.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<VoidConfig>` to any system parameter list and read values
//! with `config.task_width`, `config.attractor_force`, etc.
//!
//! Loaded values are range-checked through [`crate::error`]'s validators; a
//! file that fails validation is rejected wholesale and the compiled defaults
//! stay in place.

use crate::constants::*;
use crate::error::{
    validate_attractor_force, validate_explosion_particles, validate_gravity,
    validate_shard_grid,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable simulation and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/void.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoidConfig {
    // ── World & Arena ─────────────────────────────────────────────────────────
    pub wall_thickness: f32,
    pub floor_raise: f32,
    pub spawn_margin_x: f32,
    pub spawn_drop_height: f32,
    pub gravity_y: f32,

    // ── Task Bodies ───────────────────────────────────────────────────────────
    pub task_width: f32,
    pub task_height: f32,
    pub task_restitution: f32,
    pub task_friction: f32,

    // ── Delete Button ─────────────────────────────────────────────────────────
    pub button_glyph_size: f32,
    pub button_hit_size: f32,
    pub button_pad_right: f32,

    // ── Explosion Particles ───────────────────────────────────────────────────
    pub explosion_particles: u32,
    pub particle_size_min: f32,
    pub particle_size_range: f32,
    pub particle_density: f32,
    pub particle_kick_speed: f32,
    pub particle_air_damping: f32,

    // ── Attractor ─────────────────────────────────────────────────────────────
    pub attractor_force: f32,
    pub attractor_radius: f32,
    pub attractor_lifetime: f32,
    pub clear_delay: f32,

    // ── Shatter Scene ─────────────────────────────────────────────────────────
    pub shatter_duration: f32,
    pub shard_cols: u32,
    pub shard_rows: u32,
    pub shard_radius_divisor: f32,
}

impl Default for VoidConfig {
    fn default() -> Self {
        Self {
            // World & Arena
            wall_thickness: WALL_THICKNESS,
            floor_raise: FLOOR_RAISE,
            spawn_margin_x: SPAWN_MARGIN_X,
            spawn_drop_height: SPAWN_DROP_HEIGHT,
            gravity_y: GRAVITY_Y,
            // Task Bodies
            task_width: TASK_WIDTH,
            task_height: TASK_HEIGHT,
            task_restitution: TASK_RESTITUTION,
            task_friction: TASK_FRICTION,
            // Delete Button
            button_glyph_size: BUTTON_GLYPH_SIZE,
            button_hit_size: BUTTON_HIT_SIZE,
            button_pad_right: BUTTON_PAD_RIGHT,
            // Explosion Particles
            explosion_particles: EXPLOSION_PARTICLES,
            particle_size_min: PARTICLE_SIZE_MIN,
            particle_size_range: PARTICLE_SIZE_RANGE,
            particle_density: PARTICLE_DENSITY,
            particle_kick_speed: PARTICLE_KICK_SPEED,
            particle_air_damping: PARTICLE_AIR_DAMPING,
            // Attractor
            attractor_force: ATTRACTOR_FORCE,
            attractor_radius: ATTRACTOR_RADIUS,
            attractor_lifetime: ATTRACTOR_LIFETIME,
            clear_delay: CLEAR_DELAY,
            // Shatter Scene
            shatter_duration: SHATTER_DURATION,
            shard_cols: SHARD_COLS,
            shard_rows: SHARD_ROWS,
            shard_radius_divisor: SHARD_RADIUS_DIVISOR,
        }
    }
}

impl VoidConfig {
    /// Range-check the values that can destabilise the simulation.
    fn validate(&self) -> crate::error::VoidResult<()> {
        validate_gravity(self.gravity_y)?;
        validate_attractor_force(self.attractor_force)?;
        validate_explosion_particles(self.explosion_particles)?;
        validate_shard_grid(self.shard_cols, self.shard_rows)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/void.toml` and overwrite the
/// `VoidConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors and
/// validation failures are printed to stderr but do not abort the game — the
/// compiled defaults stay in place.  A missing file is silently ignored.
pub fn load_void_config(mut config: ResMut<VoidConfig>) {
    let path = "assets/void.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<VoidConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    println!("✓ Loaded void config from {path}");
                }
                Err(e) => {
                    eprintln!("⚠ Rejected {path}: {e}; using defaults");
                }
            },
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

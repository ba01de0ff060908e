//! Centralised physics, gameplay, and visual constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes the tested range and the observable consequence of
//! changing it.  Runtime overrides go in `assets/void.toml`
//! (see [`crate::config`]); this file remains the authoritative default source.

use bevy::prelude::*;

// ── World & Arena ─────────────────────────────────────────────────────────────

/// Thickness of the static boundary walls (world units / px).
///
/// Walls sit just outside the visible area; thickness only matters for
/// preventing fast bodies from tunnelling through.  100 is comfortably above
/// the tunnelling threshold at the speeds this simulation produces.
pub const WALL_THICKNESS: f32 = 100.0;

/// How far the floor is raised above the bottom window edge (px) so settled
/// task bodies remain fully visible.
pub const FLOOR_RAISE: f32 = 10.0;

/// Horizontal margin kept clear at each arena edge when picking a spawn x for
/// a new task body.  Prevents bodies from spawning half-embedded in a wall.
pub const SPAWN_MARGIN_X: f32 = 200.0;

/// How far above the arena top edge task bodies spawn (px).
///
/// Bodies drop in from off-screen, so the entrance reads as "falling out of
/// the void" rather than popping into existence.
pub const SPAWN_DROP_HEIGHT: f32 = 100.0;

/// Downward gravity magnitude (px/s²).
///
/// Roughly half of on-screen earth-feel (~980); tasks drift down lazily
/// instead of slamming into the floor.  Tested range: 300–700.
pub const GRAVITY_Y: f32 = 490.0;

// ── Task Bodies ───────────────────────────────────────────────────────────────

/// Fixed width of every task rectangle (px).
pub const TASK_WIDTH: f32 = 300.0;

/// Fixed height of every task rectangle (px).
pub const TASK_HEIGHT: f32 = 60.0;

/// Restitution of task bodies.  0.5 gives a noticeable but quickly-settling
/// bounce when a body lands on the floor or another body.
pub const TASK_RESTITUTION: f32 = 0.5;

/// Friction of task bodies.  Low, so stacked bodies slide into loose piles
/// instead of locking into towers.
pub const TASK_FRICTION: f32 = 0.1;

// ── Delete Button ─────────────────────────────────────────────────────────────

/// Side length of the drawn delete-button square (px, body-local).
pub const BUTTON_GLYPH_SIZE: f32 = 24.0;

/// Side length of the *clickable* square around the button centre (px).
///
/// Deliberately larger than [`BUTTON_GLYPH_SIZE`]: the body may be rotating
/// and in motion, so a generous hit margin keeps the button targetable.
pub const BUTTON_HIT_SIZE: f32 = 40.0;

/// Distance from the body's right edge to the button centre (px).
pub const BUTTON_PAD_RIGHT: f32 = 30.0;

/// Half-length of each stroke of the "X" glyph (px).
pub const BUTTON_CROSS_HALF: f32 = 6.0;

// ── Task Label ────────────────────────────────────────────────────────────────

/// Body-local x offset of the task text anchor (px).  Slightly left of centre
/// so the text clears the delete button on the right.
pub const LABEL_OFFSET_X: f32 = -15.0;

/// Font size of the task text (pt).
pub const LABEL_FONT_SIZE: f32 = 16.0;

// ── Explosion Particles ───────────────────────────────────────────────────────

/// Number of particles spawned per destroyed task body.
pub const EXPLOSION_PARTICLES: u32 = 30;

/// Minimum particle side length (px).
pub const PARTICLE_SIZE_MIN: f32 = 2.0;

/// Width of the random range added on top of [`PARTICLE_SIZE_MIN`] (px).
/// Particle sides are drawn uniformly from `[MIN, MIN + RANGE)`.
pub const PARTICLE_SIZE_RANGE: f32 = 6.0;

/// Collider density of explosion particles (mass per px²).
///
/// Also used to precompute the spawn-time mass stored on the particle, which
/// the attractor force law scales by.  Keep the two in sync by changing only
/// this constant.
pub const PARTICLE_DENSITY: f32 = 0.001;

/// Speed scale of the random outward kick given to each particle at spawn
/// (px/s).  The applied impulse is `direction × PARTICLE_KICK_SPEED × mass`,
/// so the resulting velocity change is size-independent.
pub const PARTICLE_KICK_SPEED: f32 = 120.0;

/// Air-drag damping applied to particles (1/s).
///
/// Without drag the swirl force keeps particles on wide stable orbits and the
/// absorption window feels endless.  At 3.0 a free particle loses ~95 % of its
/// speed per second, so orbits decay visibly within the attractor's lifetime.
pub const PARTICLE_AIR_DAMPING: f32 = 3.0;

// ── Attractor ("black hole") ──────────────────────────────────────────────────

/// Inward attractor acceleration (px/s², applied as force × particle mass).
///
/// Tested range: 1500–8000.  At 4000 a particle one task-width away is
/// absorbed well inside the 2 s active window; above ~10000 particles
/// slingshot past the capture radius and visibly oscillate.
pub const ATTRACTOR_FORCE: f32 = 4000.0;

/// Capture radius (px): particles closer than this are absorbed and removed.
pub const ATTRACTOR_RADIUS: f32 = 5.0;

/// Seconds an attractor stays active after its task is destroyed.
pub const ATTRACTOR_LIFETIME: f32 = 2.0;

/// Seconds between an attractor deactivating with an empty registry and the
/// "all cleared" signal firing.  The registry is re-read when the delay
/// elapses, so tasks added in the window cancel the signal.
pub const CLEAR_DELAY: f32 = 1.0;

// ── Shatter Scene ─────────────────────────────────────────────────────────────

/// Seconds the shatter animation plays before the cleared screen takes over.
pub const SHATTER_DURATION: f32 = 1.5;

/// Shard grid columns across the screen.
pub const SHARD_COLS: u32 = 10;

/// Shard grid rows down the screen.
pub const SHARD_ROWS: u32 = 10;

/// Shard radius = `min(cell_w, cell_h) / SHARD_RADIUS_DIVISOR`.  At 1.5 the
/// shards overlap slightly, so the grid reads as a broken pane with no gaps.
pub const SHARD_RADIUS_DIVISOR: f32 = 1.5;

/// Inclusive range of shard polygon side counts.  3–5 sides look like glass
/// fragments; more sides read as bubbles.
pub const SHARD_SIDES_MIN: u32 = 3;
pub const SHARD_SIDES_MAX: u32 = 5;

/// Restitution of shards — nearly dead on impact, like falling glass.
pub const SHARD_RESTITUTION: f32 = 0.1;

/// Friction of shards.
pub const SHARD_FRICTION: f32 = 0.5;

/// Maximum horizontal speed (px/s) of the random initial shard kick.
pub const SHARD_KICK_LATERAL: f32 = 60.0;

/// Downward speed range (px/s) of the initial shard kick.
pub const SHARD_KICK_DOWN_MIN: f32 = 60.0;
pub const SHARD_KICK_DOWN_MAX: f32 = 160.0;

/// Maximum magnitude of the random initial shard spin (rad/s).
pub const SHARD_SPIN: f32 = 2.5;

// ── UI ────────────────────────────────────────────────────────────────────────

/// Maximum characters accepted into the task input buffer.
pub const INPUT_MAX_LEN: usize = 60;

// ── Z Layers ──────────────────────────────────────────────────────────────────

/// Z of task bodies.
pub const TASK_Z: f32 = 0.05;
/// Z of the task label relative to its body.
pub const LABEL_Z: f32 = 0.1;
/// Z of shatter shards.
pub const SHARD_Z: f32 = 0.5;
/// Z of explosion particles — above tasks, below shards.
pub const PARTICLE_Z: f32 = 0.4;

// ── Palette ───────────────────────────────────────────────────────────────────

/// Near-black void background.
pub fn background() -> Color {
    Color::srgb(0.02, 0.02, 0.02)
}

/// Cyan accent — one of the two colours a task body can spawn with.
pub fn accent_cyan() -> Color {
    Color::srgb(0.0, 1.0, 1.0)
}

/// Magenta accent — the other task body colour.
pub fn accent_magenta() -> Color {
    Color::srgb(0.91, 0.47, 0.98)
}

/// Alert red used for the delete glyph, independent of the body accent.
pub fn alert_red() -> Color {
    Color::srgb(1.0, 0.0, 0.24)
}

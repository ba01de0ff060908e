//! Simulation-specific error types.
//!
//! Nothing in normal operation is fatal: destruction requests for unknown
//! tasks are idempotent no-ops and deferred callbacks tolerate a torn-down
//! world.  What remains is configuration validation — values loaded from
//! `assets/void.toml` are range-checked here before they are allowed to
//! replace the compiled defaults.

use std::fmt;

/// Top-level error enum for the voidlist simulation.
#[derive(Debug)]
pub enum VoidError {
    /// A configuration value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// The shatter grid would produce an unreasonable shard count.
    BadShardGrid {
        cols: u32,
        rows: u32,
    },
}

impl fmt::Display for VoidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoidError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            VoidError::BadShardGrid { cols, rows } => write!(
                f,
                "shatter grid {}x{} is outside the supported 1..=50 per axis",
                cols, rows
            ),
        }
    }
}

impl std::error::Error for VoidError {}

/// Convenience alias: a `Result` using `VoidError` as the error type.
pub type VoidResult<T> = Result<T, VoidError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `attractor_force` is outside its validated safe range.
///
/// Above ~10000 particles slingshot past the capture radius instead of being
/// absorbed; non-positive values make destruction debris permanent.
pub fn validate_attractor_force(value: f32) -> VoidResult<()> {
    if value <= 0.0 || value > 10000.0 {
        Err(VoidError::UnsafeConstant {
            name: "attractor_force",
            value,
            safe_range: "(0.0, 10000.0]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if the per-destruction particle batch size is outside
/// the supported range.
pub fn validate_explosion_particles(value: u32) -> VoidResult<()> {
    if value == 0 || value > 500 {
        Err(VoidError::UnsafeConstant {
            name: "explosion_particles",
            value: value as f32,
            safe_range: "[1, 500]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `gravity_y` is not strictly positive.  Zero or upward
/// gravity strands freshly-spawned task bodies off-screen above the arena.
pub fn validate_gravity(value: f32) -> VoidResult<()> {
    if value <= 0.0 {
        Err(VoidError::UnsafeConstant {
            name: "gravity_y",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if the shatter grid is degenerate or absurdly dense.
pub fn validate_shard_grid(cols: u32, rows: u32) -> VoidResult<()> {
    if cols == 0 || rows == 0 || cols > 50 || rows > 50 {
        Err(VoidError::BadShardGrid { cols, rows })
    } else {
        Ok(())
    }
}

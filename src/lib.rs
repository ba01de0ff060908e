//! Voidlist — a physics to-do list.
//!
//! Tasks fall into a dark void as rigid neon rectangles.  Clicking a task's
//! delete glyph destroys it in a burst of debris that a transient black hole
//! swallows; clearing the whole list shatters the screen.

pub mod arena;
pub mod attractor;
pub mod body;
pub mod config;
pub mod constants;
pub mod destruction;
pub mod error;
pub mod graphics;
pub mod input;
pub mod particles;
pub mod render;
pub mod sequencer;
pub mod shatter;
pub mod simulation;
pub mod task;
pub mod ui;

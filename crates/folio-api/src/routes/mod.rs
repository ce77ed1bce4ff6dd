//! Route modules, one per side of the sync pair.

pub mod editor;
pub mod health;
pub mod renderer;

//! Folio renderer side.
//!
//! Holds the page currently on screen, moves between pages through a
//! three-phase transition, and applies snapshots pushed by the editor.

pub mod navigation;
pub mod runtime;
pub mod template;
pub mod transition;

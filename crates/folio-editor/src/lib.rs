//! Folio editor side.
//!
//! Owns the ordered page list, derives the editor's step projection from
//! it, and broadcasts debounced configuration snapshots to renderers.

pub mod application;
pub mod domain;

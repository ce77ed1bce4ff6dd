//! Shared page model and sync abstractions for Folio.
//!
//! This crate defines the types that travel between the editor and the
//! renderer, the wire format they travel in, and the traits for the
//! external collaborators both sides depend on. It contains no editor or
//! navigation logic.

pub mod collaborator;
pub mod error;
pub mod message;
pub mod page;
pub mod transport;

//! Shared test doubles and utilities for Folio.

mod status;
mod store;
mod template;
mod transport;

pub use status::{FixedClock, RecordingStatusIndicator, fixed_now};
pub use store::{FailingStore, InMemoryStore};
pub use template::StaticTemplate;
pub use transport::{FailingTransport, RecordingTransport};

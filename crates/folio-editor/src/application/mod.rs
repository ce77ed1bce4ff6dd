//! Editor services: the sync channel and the editing session that pairs
//! every mutation with a step recompute, a save and a broadcast.

pub mod session;
pub mod sync_channel;

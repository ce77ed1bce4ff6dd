//! Editor domain types: the page list and its step projection.

pub mod page_list;
pub mod steps;

//! Storage primitives for the service layer.
//!
//! Everything persists as plain JSON files: a keyed map for user records and
//! a flat array for the contact list. Both are single-writer by design; a
//! second process rewriting the same file races last-writer-wins.

pub mod json_map_store;

//! Contact list persistence.
//!
//! The whole collection is one pretty-printed JSON array on disk. Every
//! operation re-reads the document and every mutation rewrites it wholesale.

mod store;

pub use store::ContactStore;

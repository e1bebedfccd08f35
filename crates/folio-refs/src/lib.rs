//! Head pointer management for Folio.
//!
//! The head ref names the latest accepted revision. It is the only mutable
//! state in a repository: every other object is immutable and
//! content-addressed.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests and embedding
//! - [`fs`] -- File-backed [`FsRefStore`] with atomic replacement

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use traits::RefStore;

//! Content-addressed object storage for Folio.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every page version, tree snapshot, and revision
//! is stored as an immutable object identified by its BLAKE3 hash
//! (domain-separated by object kind).
//!
//! # Object Types
//!
//! - [`Blob`] -- raw page markup
//! - [`Tree`] -- sorted mapping of page paths to blob ids
//! - [`Commit`] -- a revision: tree, parent, author, timestamp, message
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- one file per object, written atomically
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Write-then-link: objects are durable before any ref points at them.
//! 3. Concurrent reads are always safe (objects are immutable).
//! 4. The store never interprets object contents -- it is a pure key-value store.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod builder;
pub mod error;
pub mod fs;
pub mod hasher;
pub mod memory;
pub mod object;
pub mod traits;

pub use builder::TreeBuilder;
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use hasher::ContentHasher;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;

//! Foundation types for Folio.
//!
//! This crate provides the identity and metadata types shared by every other
//! Folio crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (BLAKE3 hash) for blobs,
//!   trees, and revisions
//! - [`Author`] -- Name and email recorded on every revision
//! - [`Timestamp`] -- Seconds since the UNIX epoch, UTC

pub mod author;
pub mod error;
pub mod object;

pub use author::{Author, Timestamp};
pub use error::TypeError;
pub use object::ObjectId;

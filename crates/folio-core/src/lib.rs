//! Versioned wiki page storage.
//!
//! Pages are stored as immutable, content-addressed revisions. Any past
//! revision of a page can be read back byte for byte, diffed against its
//! parent, rendered (with results cached by revision), or reverted by
//! applying its inverse patch on top of the current head.
//!
//! # Modules
//!
//! - [`graph`] -- [`RevisionGraph`]: commits, head, and history
//! - [`paths`] -- [`PageResolver`]: title to storage path mapping
//! - [`log`] -- [`page_log`]: per-page and whole-wiki history
//! - [`revert`] -- the revert engine
//! - [`patch`] -- unified diff of a revision
//! - [`wiki`] -- [`Wiki`], the facade tying the above together
//! - [`config`] -- [`WikiConfig`], loaded from `folio.toml`

pub mod config;
pub mod error;
pub mod graph;
pub mod log;
pub mod patch;
pub mod paths;
pub mod revert;
pub mod wiki;

pub use config::{AuthorConfig, ConfigError, WikiConfig, CONFIG_FILE};
pub use error::{WikiError, WikiResult};
pub use graph::{History, PathChange, Revision, RevisionGraph, ROOT_MESSAGE};
pub use log::{page_log, LogEntry};
pub use patch::revision_patch;
pub use paths::PageResolver;
pub use revert::{revert, RevertOutcome};
pub use wiki::Wiki;

// Re-export the types that appear in the facade's signatures.
pub use folio_render::Flavor;
pub use folio_types::{Author, ObjectId, Timestamp};

//! Render cache for Folio.
//!
//! Rendered HTML is keyed by `(title, revision, flavor)`. A revision id pins
//! the exact source bytes, so an entry can never go stale and is never
//! invalidated: the first write for a key is the only one that lands.
//!
//! # Key Types
//!
//! - [`RenderCache`] -- `get_or_render` over a store, a renderer, and a source
//! - [`MarkupRenderer`] -- converts page markup to HTML ([`PreformattedRenderer`] is bundled)
//! - [`RenderStore`] -- first-writer-wins storage ([`InMemoryRenderStore`], [`FileRenderStore`])
//! - [`SourceResolver`] -- supplies page bytes at a revision on a cache miss

pub mod cache;
pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod renderer;
pub mod traits;

pub use cache::RenderCache;
pub use error::{RenderError, RenderResult};
pub use fs::FileRenderStore;
pub use key::{Flavor, RenderKey};
pub use memory::InMemoryRenderStore;
pub use renderer::PreformattedRenderer;
pub use traits::{MarkupRenderer, RenderStore, SourceResolver};

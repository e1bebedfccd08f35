//! `get_or_render`: the read-through path in front of the renderer.

use std::fmt;
use std::sync::Arc;

use folio_types::ObjectId;
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::key::{Flavor, RenderKey};
use crate::memory::InMemoryRenderStore;
use crate::traits::{MarkupRenderer, RenderStore, SourceResolver};

/// Read-through cache of rendered pages.
///
/// On a miss the source is resolved at the pinned revision, rendered, and
/// stored. There is no single-flight: concurrent misses on one key each
/// render, and the store keeps whichever write lands first. Render failures
/// are returned as-is and never stored. A store that fails to read or write
/// only costs a re-render.
#[derive(Clone)]
pub struct RenderCache {
    renderer: Arc<dyn MarkupRenderer>,
    store: Arc<dyn RenderStore>,
}

impl RenderCache {
    pub fn new(renderer: Arc<dyn MarkupRenderer>, store: Arc<dyn RenderStore>) -> Self {
        Self { renderer, store }
    }

    /// A cache over an [`InMemoryRenderStore`].
    pub fn in_memory(renderer: Arc<dyn MarkupRenderer>) -> Self {
        Self::new(renderer, Arc::new(InMemoryRenderStore::new()))
    }

    pub fn renderer(&self) -> &dyn MarkupRenderer {
        self.renderer.as_ref()
    }

    /// Return the rendered page, rendering and storing it on a miss.
    pub fn get_or_render<S>(
        &self,
        source: &S,
        title: &str,
        revision: &ObjectId,
        flavor: Flavor,
    ) -> Result<Vec<u8>, S::Error>
    where
        S: SourceResolver + ?Sized,
        S::Error: From<RenderError>,
    {
        let key = RenderKey::new(title, *revision, flavor);
        match self.store.get(&key) {
            Ok(Some(html)) => {
                debug!(key = %key, "render cache hit");
                return Ok(html);
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "render cache read failed"),
        }

        let bytes = source.resolve(title, revision)?;
        let html = self.renderer.render(title, &bytes, flavor)?.into_bytes();

        match self.store.insert_if_absent(&key, &html) {
            Ok(true) => debug!(key = %key, bytes = html.len(), "cached render"),
            Ok(false) => debug!(key = %key, "render already cached by another caller"),
            Err(e) => warn!(key = %key, error = %e, "render cache write failed"),
        }
        Ok(html)
    }

    /// Render content that has no revision yet. Never cached.
    pub fn render_uncached(
        &self,
        title: &str,
        source: &[u8],
        flavor: Flavor,
    ) -> Result<String, RenderError> {
        self.renderer.render(title, source, flavor)
    }
}

impl fmt::Debug for RenderCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCache").finish_non_exhaustive()
    }
}

//! The `Wiki` facade: the page-level API consumers use.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use folio_refs::FsRefStore;
use folio_render::{
    FileRenderStore, Flavor, MarkupRenderer, PreformattedRenderer, RenderCache, RenderError,
};
use folio_store::FsObjectStore;
use folio_types::{Author, ObjectId};
use tracing::{debug, info};

use crate::config::WikiConfig;
use crate::error::{WikiError, WikiResult};
use crate::graph::{PathChange, RevisionGraph};
use crate::log::{page_log, LogEntry};
use crate::paths::PageResolver;
use crate::patch::revision_patch;
use crate::revert::{revert, RevertOutcome};

/// A versioned collection of wiki pages.
///
/// All methods take `&self` and are safe to call from many threads. Every
/// mutating call reads head once, works against that snapshot, and commits
/// only if head has not moved meanwhile; otherwise it fails with
/// [`WikiError::ConcurrentUpdate`] and the caller may retry.
pub struct Wiki {
    graph: RevisionGraph,
    resolver: PageResolver,
    renders: RenderCache,
    config: WikiConfig,
}

impl Wiki {
    /// Build a wiki over existing stores, creating the root revision if the
    /// repository is empty.
    pub fn new(graph: RevisionGraph, renders: RenderCache, config: WikiConfig) -> WikiResult<Self> {
        graph.init()?;
        Ok(Self {
            resolver: PageResolver::new(&config.page_extension),
            graph,
            renders,
            config,
        })
    }

    /// A wiki held entirely in memory.
    pub fn in_memory() -> WikiResult<Self> {
        Self::new(
            RevisionGraph::in_memory(),
            RenderCache::in_memory(Arc::new(PreformattedRenderer)),
            WikiConfig::default(),
        )
    }

    /// Open the on-disk repository at `root`, creating it if needed.
    ///
    /// Objects live under `root/objects`, head in `root/HEAD`, and settings
    /// in `root/folio.toml`.
    pub fn open(root: impl AsRef<Path>) -> WikiResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let config = WikiConfig::load(root)?;

        let graph = RevisionGraph::new(
            Arc::new(FsObjectStore::open(root)?),
            Arc::new(FsRefStore::open(root)?),
        );
        let renderer: Arc<dyn MarkupRenderer> = Arc::new(PreformattedRenderer);
        let renders = match config.render_cache_path(root) {
            Some(dir) => {
                let store = FileRenderStore::open(dir).map_err(|e| match e {
                    RenderError::Io(io) => WikiError::Io(io),
                    other => other.into(),
                })?;
                RenderCache::new(renderer, Arc::new(store))
            }
            None => RenderCache::in_memory(renderer),
        };

        debug!(root = %root.display(), "opened repository");
        Self::new(graph, renders, config)
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    pub fn graph(&self) -> &RevisionGraph {
        &self.graph
    }

    pub fn resolver(&self) -> &PageResolver {
        &self.resolver
    }

    /// The author named in the configuration.
    pub fn default_author(&self) -> WikiResult<Author> {
        Ok(self.config.author.to_author()?)
    }

    pub fn head(&self) -> WikiResult<ObjectId> {
        self.graph.head()
    }

    /// Parse a revision id from its hex form.
    pub fn parse_revision(&self, text: &str) -> WikiResult<ObjectId> {
        ObjectId::from_hex(text).map_err(|_| WikiError::InvalidRevision(text.to_string()))
    }

    /// Exact bytes of `title` at `revision`.
    pub fn resolve(&self, title: &str, revision: &ObjectId) -> WikiResult<Vec<u8>> {
        let path = self.resolver.path_for(title)?;
        self.graph
            .read_path(&path, revision)?
            .ok_or_else(|| WikiError::PageNotFound {
                title: title.to_string(),
                revision: *revision,
            })
    }

    /// Titles of all pages at `revision`, sorted.
    pub fn list_pages(&self, revision: &ObjectId) -> WikiResult<Vec<String>> {
        Ok(self.resolver.list_titles(&self.graph.tree_at(revision)?))
    }

    /// History of `title`, or of the whole wiki. See [`page_log`].
    pub fn page_log(&self, title: Option<&str>) -> WikiResult<Vec<LogEntry>> {
        page_log(&self.graph, &self.resolver, title)
    }

    /// Rendered HTML of `title` at `revision`, from cache when possible.
    pub fn get_or_render(
        &self,
        title: &str,
        revision: &ObjectId,
        flavor: Flavor,
    ) -> WikiResult<Vec<u8>> {
        self.resolver.validate_title(title)?;
        let source = |title: &str, revision: &ObjectId| self.resolve(title, revision);
        self.renders.get_or_render(&source, title, revision, flavor)
    }

    /// Render content that has not been committed. Never cached.
    pub fn render_preview(&self, title: &str, content: &[u8], flavor: Flavor) -> WikiResult<String> {
        Ok(self.renders.render_uncached(title, content, flavor)?)
    }

    /// Current content of `title`, or nothing if the page does not exist.
    pub fn page_source_or_empty(&self, title: &str) -> WikiResult<Vec<u8>> {
        let path = self.resolver.path_for(title)?;
        let head = self.graph.head()?;
        Ok(self.graph.read_path(&path, &head)?.unwrap_or_default())
    }

    /// Whether committing `content` would change `title`. A page that does
    /// not exist is always changed.
    pub fn is_changed(&self, title: &str, content: &[u8]) -> WikiResult<bool> {
        let path = self.resolver.path_for(title)?;
        let head = self.graph.head()?;
        Ok(self.graph.read_path(&path, &head)?.as_deref() != Some(content))
    }

    /// Replace the content of `title`, creating the page if needed.
    ///
    /// The content must render; an edit that changes nothing fails with
    /// [`WikiError::NoChanges`].
    pub fn commit_edit(
        &self,
        title: &str,
        message: &str,
        content: &[u8],
        author: Author,
    ) -> WikiResult<ObjectId> {
        let path = self.resolver.path_for(title)?;
        let head = self.graph.head()?;
        if self.graph.read_path(&path, &head)?.as_deref() == Some(content) {
            return Err(WikiError::NoChanges(title.to_string()));
        }
        self.renders.render_uncached(title, content, Flavor::Plain)?;

        let revision = self.graph.commit_on(
            head,
            &[PathChange::Write {
                path,
                content: content.to_vec(),
            }],
            author,
            message,
        )?;
        info!(title, revision = %revision.short_hex(), "edited page");
        Ok(revision)
    }

    /// Rename `old_title` to `new_title`, keeping its content.
    pub fn commit_move(&self, old_title: &str, new_title: &str, author: Author) -> WikiResult<ObjectId> {
        let from = self.resolver.path_for(old_title)?;
        let to = self.resolver.path_for(new_title)?;
        let head = self.graph.head()?;
        let tree = self.graph.tree_at(&head)?;
        if !tree.contains(&from) {
            return Err(WikiError::PageNotFound {
                title: old_title.to_string(),
                revision: head,
            });
        }
        if tree.contains(&to) {
            return Err(WikiError::PageExists(new_title.to_string()));
        }
        let change = self.resolver.rename(old_title, new_title)?;

        let message = format!("Move \"{old_title}\" to \"{new_title}\"");
        let revision = self.graph.commit_on(head, &[change], author, message)?;
        info!(from = old_title, to = new_title, revision = %revision.short_hex(), "moved page");
        Ok(revision)
    }

    /// Undo the single-page edit made by `target`. See [`revert`].
    pub fn commit_revert(&self, target: &ObjectId, author: Author) -> WikiResult<RevertOutcome> {
        revert(&self.graph, &self.resolver, target, author)
    }

    /// Unified diff of `revision` against its parent.
    pub fn revision_patch(&self, revision: &ObjectId) -> WikiResult<String> {
        revision_patch(&self.graph, revision)
    }
}

impl fmt::Debug for Wiki {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wiki")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author::new("Ada", "ada@example.org").unwrap()
    }

    #[test]
    fn edit_then_resolve() {
        let wiki = Wiki::in_memory().unwrap();
        let rev = wiki.commit_edit("intro", "create", b"Hello", author()).unwrap();
        assert_eq!(wiki.head().unwrap(), rev);
        assert_eq!(wiki.resolve("intro", &rev).unwrap(), b"Hello");
        assert_eq!(wiki.list_pages(&rev).unwrap(), ["intro"]);
    }

    #[test]
    fn unchanged_edit_is_rejected() {
        let wiki = Wiki::in_memory().unwrap();
        let rev = wiki.commit_edit("intro", "create", b"Hello", author()).unwrap();
        assert!(matches!(
            wiki.commit_edit("intro", "again", b"Hello", author()),
            Err(WikiError::NoChanges(t)) if t == "intro"
        ));
        assert_eq!(wiki.head().unwrap(), rev);
    }

    #[test]
    fn empty_new_page_counts_as_changed() {
        let wiki = Wiki::in_memory().unwrap();
        assert!(wiki.is_changed("blank", b"").unwrap());
        wiki.commit_edit("blank", "create", b"", author()).unwrap();
        assert!(!wiki.is_changed("blank", b"").unwrap());
    }

    #[test]
    fn unrenderable_edit_is_not_committed() {
        let wiki = Wiki::in_memory().unwrap();
        let head = wiki.head().unwrap();
        assert!(matches!(
            wiki.commit_edit("intro", "bad", b"nul\0", author()),
            Err(WikiError::RenderFailure(_))
        ));
        assert_eq!(wiki.head().unwrap(), head);
    }

    #[test]
    fn move_preserves_content() {
        let wiki = Wiki::in_memory().unwrap();
        wiki.commit_edit("a", "create", b"body", author()).unwrap();
        let rev = wiki.commit_move("a", "b", author()).unwrap();

        let parent = wiki.graph().parent_of(&rev).unwrap().unwrap();
        assert_eq!(wiki.resolve("b", &rev).unwrap(), wiki.resolve("a", &parent).unwrap());
        assert!(matches!(
            wiki.resolve("a", &rev),
            Err(WikiError::PageNotFound { .. })
        ));
        assert_eq!(
            wiki.graph().read_commit(&rev).unwrap().message,
            "Move \"a\" to \"b\""
        );
    }

    #[test]
    fn move_checks_both_titles() {
        let wiki = Wiki::in_memory().unwrap();
        wiki.commit_edit("a", "create", b"1", author()).unwrap();
        wiki.commit_edit("b", "create", b"2", author()).unwrap();
        assert!(matches!(
            wiki.commit_move("missing", "c", author()),
            Err(WikiError::PageNotFound { .. })
        ));
        assert!(matches!(
            wiki.commit_move("a", "b", author()),
            Err(WikiError::PageExists(t)) if t == "b"
        ));
        assert!(matches!(
            wiki.commit_move("a", "x/y", author()),
            Err(WikiError::InvalidTitle { .. })
        ));
    }

    #[test]
    fn render_is_cached_and_stable() {
        let wiki = Wiki::in_memory().unwrap();
        let rev = wiki.commit_edit("intro", "create", b"<b>", author()).unwrap();
        let first = wiki.get_or_render("intro", &rev, Flavor::Plain).unwrap();
        let second = wiki.get_or_render("intro", &rev, Flavor::Plain).unwrap();
        assert_eq!(first, second);
        assert!(String::from_utf8(first).unwrap().contains("&lt;b&gt;"));
    }

    #[test]
    fn render_of_missing_page_fails() {
        let wiki = Wiki::in_memory().unwrap();
        let head = wiki.head().unwrap();
        assert!(matches!(
            wiki.get_or_render("ghost", &head, Flavor::Navigation),
            Err(WikiError::PageNotFound { .. })
        ));
    }

    #[test]
    fn preview_and_source() {
        let wiki = Wiki::in_memory().unwrap();
        assert_eq!(wiki.page_source_or_empty("intro").unwrap(), b"");
        let html = wiki.render_preview("intro", b"draft", Flavor::Plain).unwrap();
        assert!(html.contains("draft"));

        wiki.commit_edit("intro", "create", b"kept", author()).unwrap();
        assert_eq!(wiki.page_source_or_empty("intro").unwrap(), b"kept");
    }

    #[test]
    fn parse_revision_rejects_garbage() {
        let wiki = Wiki::in_memory().unwrap();
        let head = wiki.head().unwrap();
        assert_eq!(wiki.parse_revision(&head.to_hex()).unwrap(), head);
        assert!(matches!(
            wiki.parse_revision("xyz"),
            Err(WikiError::InvalidRevision(_))
        ));
    }

    #[test]
    fn default_author_comes_from_config() {
        let wiki = Wiki::in_memory().unwrap();
        assert_eq!(wiki.default_author().unwrap().name, "anonymous");
    }
}

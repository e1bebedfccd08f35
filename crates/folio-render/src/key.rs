use std::fmt;

use folio_types::ObjectId;

/// How a page is wrapped when rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flavor {
    /// The page body alone.
    Plain,
    /// The page body under a navigation header.
    Navigation,
}

impl Flavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Navigation => "navigation",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub title: String,
    pub revision: ObjectId,
    pub flavor: Flavor,
}

impl RenderKey {
    pub fn new(title: impl Into<String>, revision: ObjectId, flavor: Flavor) -> Self {
        Self {
            title: title.into(),
            revision,
            flavor,
        }
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.title, self.revision.short_hex(), self.flavor)
    }
}

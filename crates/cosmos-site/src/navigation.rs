//! Top-level site index.
//!
//! Pages are grouped into fixed categories. Categories are listed in
//! alphabetical order and always appear, even when they have no entries.

use std::collections::BTreeMap;

/// Index category, ordered alphabetically by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Common,
    Global,
    Hosts,
    Sites,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Common, Self::Global, Self::Hosts, Self::Sites];

    /// Heading text shown on the index page.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Global => "Global",
            Self::Hosts => "Hosts",
            Self::Sites => "Sites",
        }
    }
}

/// One page listed in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Directory name below the output root.
    pub name: String,
    /// Whether `name/index.html` was written and should be linked.
    pub linked: bool,
}

/// Categorized list of generated pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIndex {
    categories: BTreeMap<Category, Vec<IndexEntry>>,
}

impl Default for SiteIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteIndex {
    /// Create an index with every category present and empty.
    pub fn new() -> Self {
        Self {
            categories: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
        }
    }

    /// Append an entry; entries keep insertion order within a category.
    pub fn push(&mut self, category: Category, name: impl Into<String>, linked: bool) {
        self.categories.entry(category).or_default().push(IndexEntry {
            name: name.into(),
            linked,
        });
    }

    /// Entries of one category.
    pub fn entries(&self, category: Category) -> &[IndexEntry] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories with their entries, alphabetically.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[IndexEntry])> {
        self.categories
            .iter()
            .map(|(category, entries)| (*category, entries.as_slice()))
    }
}

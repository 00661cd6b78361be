//! Static HTML site assembly for Cosmos projects.
//!
//! [`StaticSiteBuilder`] walks a project, renders one page per host and
//! common directory that has Hiera data, adds pages for the global data, the
//! Puppet rules and the managed sites, and writes a categorized index:
//!
//! ```text
//! output/
//! ├── index.html
//! ├── vanilla.css
//! ├── global/index.html
//! ├── cosmos-rules/index.html
//! ├── sites/index.html
//! ├── web-common/index.html
//! └── a.example.org/index.html
//! ```

mod builder;
mod navigation;
mod sites;
mod template;

pub use builder::{
    BuildError, BuildSettings, BuildSummary, RULES_PAGE, SITES_PAGE, StaticSiteBuilder,
};
pub use navigation::{Category, IndexEntry, SiteIndex};
pub use sites::{MANAGED_SITES_KEY, ManagedSites, REGISTER_SITES, REGISTER_SITES_ARRAY};

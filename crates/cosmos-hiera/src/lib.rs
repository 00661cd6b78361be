//! Project discovery and Hiera data loading for Cosmos.
//!
//! A Cosmos project keeps one directory per host (named by FQDN), shared
//! configuration in `*-common` directories and site-wide data in `global`.
//! This crate provides:
//!
//! - [`Classifier`]: finds host and common directories under a project root
//! - [`HieraLoader`]: loads the Hiera YAML of one directory into a [`Mapping`]
//!
//! Missing directories are never errors; they simply yield no names or an
//! empty mapping. Malformed YAML in a recognized file is always an error.
//!
//! # Example
//!
//! ```ignore
//! use cosmos_hiera::{Classifier, HieraLoader};
//!
//! let classifier = Classifier::new("/srv/cosmos");
//! let loader = HieraLoader::new("/srv/cosmos");
//! for host in classifier.hosts() {
//!     let tree = loader.load(&host, false)?;
//!     println!("{host}: {} keys", tree.len());
//! }
//! ```
//!
//! [`Mapping`]: cosmos_tree::Mapping

mod classify;
mod error;
mod loader;
mod merge;

pub use classify::{
    Classifier, DEFAULT_GLOBAL_DIR, DirectoryClass, classify_common, classify_hosts,
    classify_name, is_common_dir, is_fqdn,
};
pub use error::HieraError;
pub use loader::{
    DEFAULT_DATA_PATH, DEFAULT_FILE_NAMES, DEFAULT_PUPPET_DIR, HieraLoader, HieraSettings,
    MergeStrategy, ParseMergeStrategyError,
};
pub use merge::merge_into;

//! Ordered configuration tree for Cosmos.
//!
//! Hiera data is parsed into a [`Value`]: a tagged union of scalars,
//! sequences and insertion-ordered [`Mapping`]s. The loader produces these
//! trees and the renderer consumes them, so neither needs to know about the
//! YAML library in between.
//!
//! # Example
//!
//! ```
//! use cosmos_tree::parse_yaml;
//!
//! let tree = parse_yaml("ntp:\n  servers:\n    - a.example.org\n").unwrap();
//! assert_eq!(tree.depth(), 2);
//! ```

mod mapping;
mod value;
mod yaml;

pub use mapping::{IntoIter, Iter, Mapping};
pub use value::{Scalar, Value};
pub use yaml::{ConversionError, parse_yaml};

//! HTML rendering of Cosmos configuration trees.
//!
//! Shallow trees are flattened into a single nested table. Deep trees are
//! unfolded into a sectioned document: each mapping layer above the depth
//! threshold becomes a heading, and the remaining shallow subtrees become
//! tables.
//!
//! Rendering is a pure function of the tree and the starting heading level,
//! so the renderer never touches the filesystem.
//!
//! # Example
//!
//! ```
//! use cosmos_renderer::TreeRenderer;
//! use cosmos_tree::parse_yaml;
//!
//! let tree = parse_yaml("a: 1\nb: 2\n").unwrap();
//! let html = TreeRenderer::new().render(&tree);
//! assert!(html.starts_with("<table"));
//! ```

mod escape;
mod table;
mod tree;

pub use escape::escape_html;
pub use table::render_table;
pub use tree::{
    DEFAULT_DEPTH_THRESHOLD, HeadingOverflow, MAX_HEADING_LEVEL, MIN_DEPTH_THRESHOLD, TreeRenderer,
};

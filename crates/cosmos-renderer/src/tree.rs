//! Depth-aware tree rendering.
//!
//! A mapping whose depth reaches the threshold is unfolded one layer at a
//! time: every child mapping gets a heading and is rendered one level
//! deeper, while every non-mapping child is wrapped into a one-row table.
//! Anything below the threshold is flattened with [`render_table`].
//!
//! [`render_table`]: crate::render_table

use std::fmt::Write;
use std::iter;

use cosmos_tree::{Mapping, Value};

use crate::escape::push_escaped;
use crate::table::{push_entries_table, push_table};

/// Depth at which mappings start being unfolded into sections.
pub const DEFAULT_DEPTH_THRESHOLD: usize = 4;

/// Lowest accepted threshold.
///
/// Unfolding strictly lowers the depth of each section, and a mapping of
/// depth 1 has no child mapping left to unfold, so a smaller threshold
/// would never reach a table.
pub const MIN_DEPTH_THRESHOLD: usize = 2;

/// Deepest heading level HTML defines.
pub const MAX_HEADING_LEVEL: usize = 6;

/// What to emit for section levels beyond [`MAX_HEADING_LEVEL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeadingOverflow {
    /// Keep counting: `<h7>`, `<h8>`, and so on.
    #[default]
    Unbounded,
    /// Emit `<h6>` carrying the real level in `aria-level`.
    Clamp,
}

/// Renders configuration trees as HTML fragments.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer {
    depth_threshold: usize,
    heading_overflow: HeadingOverflow,
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeRenderer {
    /// Create a renderer with the default threshold and unbounded headings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            depth_threshold: DEFAULT_DEPTH_THRESHOLD,
            heading_overflow: HeadingOverflow::default(),
        }
    }

    /// Set the depth threshold. Values below [`MIN_DEPTH_THRESHOLD`] are raised to it.
    #[must_use]
    pub fn with_depth_threshold(mut self, threshold: usize) -> Self {
        self.depth_threshold = threshold.max(MIN_DEPTH_THRESHOLD);
        self
    }

    #[must_use]
    pub fn with_heading_overflow(mut self, overflow: HeadingOverflow) -> Self {
        self.heading_overflow = overflow;
        self
    }

    #[must_use]
    pub fn depth_threshold(&self) -> usize {
        self.depth_threshold
    }

    #[must_use]
    pub fn heading_overflow(&self) -> HeadingOverflow {
        self.heading_overflow
    }

    /// Render a tree starting at heading level 0.
    ///
    /// Top-level sections therefore get `<h1>`.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        self.render_at(value, 0)
    }

    /// Render a tree whose sections start one below `level`.
    #[must_use]
    pub fn render_at(&self, value: &Value, level: usize) -> String {
        let mut out = String::new();
        self.render_into(value, level, &mut out);
        out
    }

    fn render_into(&self, value: &Value, level: usize, out: &mut String) {
        match value {
            Value::Mapping(mapping) if mapping.depth() >= self.depth_threshold => {
                self.render_sections(mapping, level + 1, out);
            }
            other => push_table(other, out),
        }
    }

    fn render_sections(&self, mapping: &Mapping, level: usize, out: &mut String) {
        for (key, value) in mapping {
            if let Value::Mapping(_) = value {
                self.push_heading(key, level, out);
                self.render_into(value, level, out);
            } else {
                push_entries_table(iter::once((key, value)), out);
            }
        }
    }

    fn push_heading(&self, text: &str, level: usize, out: &mut String) {
        let tag = match self.heading_overflow {
            HeadingOverflow::Clamp if level > MAX_HEADING_LEVEL => {
                let _ = write!(out, r#"<h{MAX_HEADING_LEVEL} aria-level="{level}">"#);
                MAX_HEADING_LEVEL
            }
            HeadingOverflow::Clamp | HeadingOverflow::Unbounded => {
                let _ = write!(out, "<h{level}>");
                level
            }
        };
        push_escaped(out, text);
        let _ = writeln!(out, "</h{tag}>");
    }
}

//! Flattened table rendering.
//!
//! Mappings become two-column tables with the key in a header cell on the
//! left and the value on the right. Nested mappings and sequences become
//! nested tables inside the value cell. Every table spans the full width
//! available to it.

use cosmos_tree::{Mapping, Scalar, Value};

use crate::escape::push_escaped;

const TABLE_OPEN: &str = r#"<table width="100%">"#;
const TABLE_CLOSE: &str = "</table>";

/// Render a whole tree as one flattened table.
///
/// A scalar has no table structure and renders as plain text.
pub fn render_table(value: &Value) -> String {
    let mut out = String::new();
    push_table(value, &mut out);
    out
}

pub(crate) fn push_table(value: &Value, out: &mut String) {
    match value {
        Value::Mapping(mapping) => push_entries_table(mapping, out),
        Value::Sequence(items) => push_sequence_table(items, out),
        Value::Scalar(scalar) => push_scalar(scalar, out),
    }
}

/// Render key/value rows in iteration order.
pub(crate) fn push_entries_table<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a Value)>,
    out: &mut String,
) {
    out.push_str(TABLE_OPEN);
    for (key, value) in entries {
        out.push_str("<tr><th>");
        push_escaped(out, key);
        out.push_str("</th><td>");
        push_table(value, out);
        out.push_str("</td></tr>");
    }
    out.push_str(TABLE_CLOSE);
}

/// Render a sequence.
///
/// A sequence of mappings that all share the same keys in the same order
/// becomes a grid with one header row; anything else is a single column.
fn push_sequence_table(items: &[Value], out: &mut String) {
    out.push_str(TABLE_OPEN);
    if let Some(columns) = shared_columns(items) {
        out.push_str("<tr>");
        for column in &columns {
            out.push_str("<th>");
            push_escaped(out, column);
            out.push_str("</th>");
        }
        out.push_str("</tr>");
        for item in items.iter().filter_map(Value::as_mapping) {
            out.push_str("<tr>");
            for value in item.values() {
                out.push_str("<td>");
                push_table(value, out);
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
    } else {
        for item in items {
            out.push_str("<tr><td>");
            push_table(item, out);
            out.push_str("</td></tr>");
        }
    }
    out.push_str(TABLE_CLOSE);
}

/// Column names shared by every item, if all items are non-empty mappings
/// with identical key lists.
fn shared_columns(items: &[Value]) -> Option<Vec<&str>> {
    let mut mappings = items.iter().map(Value::as_mapping);
    let first: &Mapping = mappings.next()??;
    if first.is_empty() {
        return None;
    }
    let columns: Vec<&str> = first.keys().collect();
    for mapping in mappings {
        if !mapping?.keys().eq(columns.iter().copied()) {
            return None;
        }
    }
    Some(columns)
}

fn push_scalar(scalar: &Scalar, out: &mut String) {
    match scalar {
        Scalar::Markup(html) => out.push_str(html),
        Scalar::String(text) => push_escaped(out, text),
        other => push_escaped(out, &other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use cosmos_tree::parse_yaml;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_flat_mapping() {
        let tree = parse_yaml("a: 1\nb: 2\n").unwrap();
        assert_eq!(
            render_table(&tree),
            r#"<table width="100%"><tr><th>a</th><td>1</td></tr><tr><th>b</th><td>2</td></tr></table>"#
        );
    }

    #[test]
    fn test_empty_mapping() {
        assert_eq!(
            render_table(&Value::Mapping(Mapping::new())),
            r#"<table width="100%"></table>"#
        );
    }

    #[test]
    fn test_nested_mapping_in_cell() {
        let tree = parse_yaml("outer:\n  inner: x\n").unwrap();
        assert_eq!(
            render_table(&tree),
            concat!(
                r#"<table width="100%"><tr><th>outer</th><td>"#,
                r#"<table width="100%"><tr><th>inner</th><td>x</td></tr></table>"#,
                "</td></tr></table>"
            )
        );
    }

    #[test]
    fn test_scalar_sequence_is_single_column() {
        let tree = parse_yaml("servers:\n  - a\n  - b\n").unwrap();
        assert_eq!(
            render_table(&tree),
            concat!(
                r#"<table width="100%"><tr><th>servers</th><td>"#,
                r#"<table width="100%"><tr><td>a</td></tr><tr><td>b</td></tr></table>"#,
                "</td></tr></table>"
            )
        );
    }

    #[test]
    fn test_uniform_mapping_sequence_is_grid() {
        let tree = parse_yaml("- name: a\n  port: 80\n- name: b\n  port: 443\n").unwrap();
        assert_eq!(
            render_table(&tree),
            concat!(
                r#"<table width="100%">"#,
                "<tr><th>name</th><th>port</th></tr>",
                "<tr><td>a</td><td>80</td></tr>",
                "<tr><td>b</td><td>443</td></tr>",
                "</table>"
            )
        );
    }

    #[test]
    fn test_mixed_mapping_sequence_is_single_column() {
        let tree = parse_yaml("- name: a\n- port: 443\n").unwrap();
        let html = render_table(&tree);
        assert!(!html.contains("<tr><th>name</th><th>"));
        assert!(html.contains("<tr><td><table"));
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(
            render_table(&Value::Sequence(Vec::new())),
            r#"<table width="100%"></table>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let tree = parse_yaml("\"<key>\": \"a & b\"\n").unwrap();
        assert_eq!(
            render_table(&tree),
            r#"<table width="100%"><tr><th>&lt;key&gt;</th><td>a &amp; b</td></tr></table>"#
        );
    }

    #[test]
    fn test_markup_is_verbatim() {
        let tree = Value::Mapping(Mapping::singleton(
            "link",
            Value::markup(r#"<a href="https://a.com">a.com</a>"#),
        ));
        assert!(render_table(&tree).contains(r#"<td><a href="https://a.com">a.com</a></td>"#));
    }

    #[test]
    fn test_null_and_bool_cells() {
        let tree = parse_yaml("n: ~\nb: true\n").unwrap();
        assert_eq!(
            render_table(&tree),
            r#"<table width="100%"><tr><th>n</th><td></td></tr><tr><th>b</th><td>true</td></tr></table>"#
        );
    }

    #[test]
    fn test_scalar_renders_as_text() {
        assert_eq!(render_table(&Value::from("plain")), "plain");
    }
}

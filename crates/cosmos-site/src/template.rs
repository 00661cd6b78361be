//! HTML page templates for static site generation.
//!
//! Directory pages live one level below the output root, so they reference
//! the stylesheet and the index with `../`. The index page lives at the root.

use std::fmt::Write;

use cosmos_renderer::escape_html as escape;

use crate::navigation::SiteIndex;

const GO_BACK: &str = r#"<a href="../index.html">Go back...</a>"#;

const WELCOME: &str =
    "<h1>Welcome</h1><p>Welcome Cosmonaut, please go ahead and explore the Cosmos</p>";

/// Wrap rendered content into a directory page.
pub(crate) fn render_page(content: &str, stylesheet: &str) -> String {
    let mut html = String::with_capacity(content.len() + 256);
    let _ = write!(
        html,
        r#"<html><head><link rel="stylesheet" href="../{}"></head><body>"#,
        escape(stylesheet)
    );
    html.push_str(GO_BACK);
    html.push_str(content);
    html.push_str(GO_BACK);
    html.push_str("</body></html>");
    html
}

/// Render the top-level index page.
pub(crate) fn render_index(index: &SiteIndex, stylesheet: &str) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        r#"<html><head><link rel="stylesheet" href="{}"></head><body>"#,
        escape(stylesheet)
    );
    html.push_str(WELCOME);

    for (category, entries) in index.iter() {
        let _ = write!(html, "<h2>{}</h2><ul>", category.heading());
        for entry in entries {
            let name = escape(&entry.name);
            if entry.linked {
                let _ = write!(html, r#"<li><a href="{name}/index.html">{name}</a></li>"#);
            } else {
                let _ = write!(html, "<li>{name}</li>");
            }
        }
        html.push_str("</ul>");
    }

    html.push_str("</body></html>");
    html
}

//! Standalone HTML documents for journal deviations.

use crate::utils::escape_html;

/// Extension of rendered journal documents
pub const JOURNAL_EXTENSION: &str = "htm";

const STYLESHEETS: &[&str] = &[
    "http://st.deviantart.net/css/deviantart-network_lc.css?3843780832",
    "http://st.deviantart.net/css/group_secrets_lc.css?3250492874",
    "http://st.deviantart.net/css/v6core_lc.css?4246581581",
    "http://st.deviantart.net/css/sidebar_lc.css?1490570941",
    "http://st.deviantart.net/css/writer_lc.css?3090682151",
    "http://st.deviantart.net/css/v6loggedin_lc.css?3001430805",
];

const LATE_STYLESHEETS: &[&str] = &[
    "http://st.deviantart.net/roses/cssmin/core.css?1488405371919",
    "http://st.deviantart.net/roses/cssmin/peeky.css?1487067424177",
    "http://st.deviantart.net/roses/cssmin/desktop.css?1491362542749",
];

const WRAPPERS: &[&str] = &[
    "dev-page-container bubbleview",
    "dev-page-view view-mode-normal",
    "dev-view-main-content",
    "dev-view-deviation",
    "journal-wrapper tt-a",
    "journal-wrapper2",
    "journal withskin",
];

/// Render a journal as a complete HTML document
///
/// The title is escaped; `css` and `html` are embedded verbatim.
pub fn render(title: &str, css: &str, html: &str) -> String {
    let mut doc = String::with_capacity(html.len() + css.len() + 2048);

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    doc.push_str("    <meta charset=\"utf-8\">\n");
    doc.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    for href in STYLESHEETS {
        doc.push_str(&format!("    <link rel=\"stylesheet\" href=\"{}\">\n", href));
    }
    doc.push_str(&format!("    <style>{}</style>\n", css));
    for href in LATE_STYLESHEETS {
        doc.push_str(&format!("    <link rel=\"stylesheet\" href=\"{}\" >\n", href));
    }
    doc.push_str("</head>\n");
    doc.push_str(
        "<body id=\"deviantART-v7\" class=\"bubble no-apps loggedout w960 deviantart\">\n",
    );
    doc.push_str("    <div id=\"output\">\n");
    for class in WRAPPERS {
        doc.push_str(&format!("    <div class=\"{}\">\n", class));
    }
    doc.push_str("    ");
    doc.push_str(html);
    doc.push('\n');
    for _ in 0..=WRAPPERS.len() {
        doc.push_str("    </div>\n");
    }
    doc.push_str("</body>\n</html>\n");

    doc
}

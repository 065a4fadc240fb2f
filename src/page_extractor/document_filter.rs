//! Removal of non-content nodes before extraction.

use ego_tree::NodeId;
use scraper::{Html, Selector};

/// Selectors for the node kinds removed by `default_document_filter`
pub const NON_CONTENT_SELECTORS: &[&str] = &[
    "head",
    "script",
    "noscript",
    r#"link[rel="stylesheet"]"#,
    "style",
    "meta",
];

/// Detach every node matching `selector` from the document
///
/// Only nodes still attached to the document are matched, so nodes inside an
/// already removed subtree are neither detached again nor counted. Returns the
/// number of nodes removed. Unparsable selectors remove nothing.
pub fn remove_matching(doc: &mut Html, selector: &str) -> usize {
    let Ok(selector) = Selector::parse(selector) else {
        log::debug!("Skipping unparsable removal selector: {selector}");
        return 0;
    };

    let ids: Vec<NodeId> = doc.root_element().select(&selector).map(|el| el.id()).collect();
    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

/// Strip head, scripts, styles, stylesheet links and meta tags
///
/// Applying it to an already filtered document removes nothing.
pub fn default_document_filter(doc: &mut Html) {
    for selector in NON_CONTENT_SELECTORS {
        remove_matching(doc, selector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Title</title>
    <meta charset="utf-8">
    <link rel="stylesheet" href="/site.css">
    <style>body { color: red; }</style>
</head>
<body>
    <link rel="icon" href="/favicon.ico">
    <script>console.log("tracking");</script>
    <noscript>Enable JavaScript</noscript>
    <p>Visible text</p>
    <meta name="inline" content="x">
</body>
</html>"#;

    #[test]
    fn removes_non_content_nodes() {
        let mut doc = Html::parse_document(PAGE);
        default_document_filter(&mut doc);
        let html = doc.root_element().html();

        assert!(!html.contains("<head"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<noscript"));
        assert!(!html.contains("<style"));
        assert!(!html.contains("<meta"));
        assert!(!html.contains("site.css"));
        assert!(html.contains("Visible text"));
        // only stylesheet links are content-free
        assert!(html.contains("favicon.ico"));
    }

    #[test]
    fn filter_is_idempotent() {
        let mut doc = Html::parse_document(PAGE);
        default_document_filter(&mut doc);
        let once = doc.root_element().html();
        default_document_filter(&mut doc);
        assert_eq!(doc.root_element().html(), once);
        for selector in NON_CONTENT_SELECTORS {
            assert_eq!(remove_matching(&mut doc, selector), 0);
        }
    }

    #[test]
    fn remove_matching_counts_nodes() {
        let mut doc = Html::parse_document("<body><p>a</p><p>b</p><div>c</div></body>");
        assert_eq!(remove_matching(&mut doc, "p"), 2);
        assert_eq!(remove_matching(&mut doc, "p"), 0);
        assert_eq!(remove_matching(&mut doc, "[[invalid"), 0);
    }

    #[test]
    fn nodes_inside_removed_subtrees_are_not_counted() {
        let mut doc = Html::parse_document(
            r#"<html><head><meta charset="utf-8"><title>t</title></head><body><p>x</p></body></html>"#,
        );
        assert_eq!(remove_matching(&mut doc, "head"), 1);
        assert_eq!(remove_matching(&mut doc, "meta"), 0);
        assert_eq!(remove_matching(&mut doc, "title"), 0);
        assert_eq!(remove_matching(&mut doc, "p"), 1);
    }
}

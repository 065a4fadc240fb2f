//! Page content extraction.
//!
//! This module turns rendered HTML into the content returned for a URL:
//! non-content nodes are filtered out, a selector picks the node, and the
//! node is serialized as HTML or tidied plain text.

// Sub-modules
pub mod document_filter;
pub mod extractors;
pub mod hooks;
pub mod text_tidy;

// Re-exports for public API
pub use document_filter::{NON_CONTENT_SELECTORS, default_document_filter, remove_matching};
pub use extractors::extract_from_html;
pub use hooks::{
    DocumentFilter, PageHooks, SelectorChooser, TextTidier, UrlRewriter, default_selector_chooser,
    default_url_rewriter,
};
pub use text_tidy::default_text_tidier;

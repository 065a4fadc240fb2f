//! Content extraction from rendered HTML
//!
//! Parse, filter, select, serialize. This half of the pipeline is
//! synchronous and never retried; the browser half lives in
//! `crawl_engine::page_loader`.

use scraper::{Html, Selector};

use super::hooks::PageHooks;
use crate::crawl_engine::{CrawlError, CrawlResult, ExtractMode};

/// Extract content for `url` from its rendered `html`
///
/// The selector comes from the selector chooser hook. Only the first
/// matching node is used; when nothing matches the result is an empty
/// string, not an error.
///
/// # Errors
///
/// `CrawlError::Selector` when the chosen selector does not parse.
pub fn extract_from_html(
    html: &str,
    url: &str,
    mode: ExtractMode,
    hooks: &PageHooks,
) -> CrawlResult<String> {
    let mut doc = Html::parse_document(html);
    hooks.filter_document(&mut doc);

    let selector_text = hooks.selector_for(url);
    let selector = Selector::parse(&selector_text).map_err(|e| CrawlError::Selector {
        url: url.to_string(),
        selector: selector_text.clone(),
        reason: e.to_string(),
    })?;

    let Some(selected) = doc.root_element().select(&selector).next() else {
        log::debug!("Selector '{selector_text}' matched nothing on {url}");
        return Ok(String::new());
    };

    match mode {
        ExtractMode::Html => Ok(selected.inner_html()),
        ExtractMode::Text => {
            let text: String = selected.text().collect();
            Ok(hooks.tidy_text(&text))
        }
    }
}

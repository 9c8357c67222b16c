//! Offer extraction for deal-listing pages.
//!
//! Each `.box-green` block on a listing page becomes an [`Offer`]. Remaining
//! time is joined in from the `timeleft_cache` table the page defines in a
//! script block.

pub mod config;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod parser;
pub mod timecache;

use std::io::Read;

use chrono::Utc;
use scraper::Html;
use tracing::debug;

pub use document::{HtmlNode, Node};
pub use error::DocumentParseError;
pub use models::{Offer, ParseResult};
pub use timecache::TimeCache;

/// Extracts every offer under `root` and stamps the result with the current time.
pub fn parse<N: Node>(category: &str, root: &N) -> ParseResult {
    let times = timecache::resolve(root);
    let offers = parser::parse_offers(root, &times);
    debug!(category, offers = offers.len(), "parsed page");

    ParseResult {
        category: category.to_string(),
        created_at: Utc::now(),
        offers,
    }
}

pub fn parse_html(category: &str, document: &Html) -> ParseResult {
    parse(category, &HtmlNode::root(document))
}

/// Parses a page from any byte stream, e.g. a saved file.
pub fn parse_from_reader<R: Read>(
    category: &str,
    mut reader: R,
) -> Result<ParseResult, DocumentParseError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(DocumentParseError::Read)?;
    let document = Html::parse_document(&String::from_utf8_lossy(&bytes));
    Ok(parse_html(category, &document))
}

/// Parses a page from the body of an HTTP response.
pub fn parse_from_response(
    category: &str,
    response: reqwest::blocking::Response,
) -> Result<ParseResult, DocumentParseError> {
    let body = response.text().map_err(DocumentParseError::Response)?;
    let document = Html::parse_document(&body);
    Ok(parse_html(category, &document))
}

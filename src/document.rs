//! Minimal query surface over a parsed HTML tree.
//!
//! Extraction code only talks to [`Node`], so it does not care which HTML
//! library produced the tree. The `scraper` implementation is the one used
//! by the crate's entry points.

use std::cell::RefCell;
use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

pub trait Node: Sized {
    /// All descendants matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Vec<Self>;

    /// First descendant matching `selector`.
    fn find_first(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    /// Concatenated text content.
    fn text(&self) -> String;

    /// Attribute value, or `default` when the attribute is missing.
    fn attr(&self, name: &str, default: &str) -> String;
}

/// [`Node`] backed by a `scraper` element.
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> HtmlNode<'a> {
    pub fn root(document: &'a Html) -> Self {
        Self(document.root_element())
    }
}

thread_local! {
    static SELECTORS: RefCell<HashMap<String, Selector>> = RefCell::new(HashMap::new());
}

/// Runs `f` with the parsed form of `selector`, parsing each distinct string once per thread.
/// Invalid selectors are logged and not cached.
fn with_selector<T>(selector: &str, f: impl FnOnce(&Selector) -> T) -> Option<T> {
    SELECTORS.with(|cache| {
        let mut cache = cache.borrow_mut();
        if !cache.contains_key(selector) {
            match Selector::parse(selector) {
                Ok(sel) => {
                    cache.insert(selector.to_string(), sel);
                }
                Err(e) => {
                    warn!(selector, error = %e, "invalid selector");
                    return None;
                }
            }
        }
        cache.get(selector).map(f)
    })
}

impl Node for HtmlNode<'_> {
    fn find_all(&self, selector: &str) -> Vec<Self> {
        with_selector(selector, |sel| self.0.select(sel).map(HtmlNode).collect())
            .unwrap_or_default()
    }

    fn find_first(&self, selector: &str) -> Option<Self> {
        with_selector(selector, |sel| self.0.select(sel).next().map(HtmlNode)).flatten()
    }

    fn text(&self) -> String {
        self.0.text().collect()
    }

    fn attr(&self, name: &str, default: &str) -> String {
        self.0.value().attr(name).unwrap_or(default).to_string()
    }
}

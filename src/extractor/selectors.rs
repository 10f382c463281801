//! Selector-chain primitives.
//!
//! Every field the extractor pulls out of a product card is backed by
//! an ordered list of selector hypotheses; the first one that yields a
//! non-empty value wins. Selector chains are the load-bearing answer to
//! an upstream site that renames its obfuscated CSS classes without
//! notice: adding a new hypothesis is a one-line change.

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;

pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compiles a chain from CSS fragments. Fragments that fail to
    /// parse are dropped rather than aborting the whole chain.
    pub fn new(css: &[&str]) -> Self {
        let selectors = css
            .iter()
            .filter_map(|fragment| match Selector::parse(fragment) {
                Ok(selector) => Some(selector),
                Err(err) => {
                    debug!(fragment, %err, "skipping unparsable selector");
                    None
                }
            })
            .collect();
        Self { selectors }
    }

    /// All elements matched by the first selector that matches
    /// anything, or None when every hypothesis misses.
    pub fn all_matches_of_first<'a>(&self, scope: &ElementRef<'a>) -> Option<Vec<ElementRef<'a>>> {
        for selector in &self.selectors {
            let matched: Vec<ElementRef<'a>> = scope.select(selector).collect();
            if !matched.is_empty() {
                return Some(matched);
            }
        }
        None
    }

    /// First element matched by any selector in chain order.
    pub fn first_match<'a>(&self, scope: &ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Trimmed text of the first matching element, skipping matches
    /// whose text collapses to nothing.
    pub fn first_text(&self, scope: &ElementRef) -> Option<String> {
        for selector in &self.selectors {
            for element in scope.select(selector) {
                let text = element.text().collect::<String>();
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
        None
    }

    /// First non-empty attribute value among `attrs` on the first
    /// matching element of each selector, in chain order.
    pub fn first_attr(&self, scope: &ElementRef, attrs: &[&str]) -> Option<String> {
        for selector in &self.selectors {
            for element in scope.select(selector) {
                for attr in attrs {
                    if let Some(value) = element.value().attr(attr) {
                        let value = value.trim();
                        if !value.is_empty() {
                            return Some(value.to_string());
                        }
                    }
                }
            }
        }
        None
    }
}

/// Matches a rupee amount like `₹1,29,999`. Group 1 is the digit run.
pub fn rupee_pattern() -> Regex {
    Regex::new(r"₹\s*([0-9][0-9,]*)").expect("static rupee pattern")
}

/// Matches a star rating like `4.3★`.
pub fn star_rating_pattern() -> Regex {
    Regex::new(r"([0-9](?:\.[0-9]+)?)\s*★").expect("static star pattern")
}

/// Matches a review tally like `12,384 Ratings`.
pub fn review_count_pattern() -> Regex {
    Regex::new(r"([0-9][0-9,]*)\s*Ratings").expect("static review pattern")
}

/// Parses the first rupee amount in `text` to whole rupees. Indian
/// digit grouping (`1,29,999`) collapses with the commas.
pub fn parse_rupees(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures(text)
        .and_then(|captures| captures[1].replace(',', "").parse::<u64>().ok())
}

/// All distinct rupee amounts in `text`, in document order.
pub fn all_rupee_amounts(pattern: &Regex, text: &str) -> Vec<u64> {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures[1].replace(',', "").parse::<u64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn chain_takes_the_first_selector_that_matches() {
        let html = Html::parse_fragment(
            r#"<div><span class="name">Fallback</span><h3>Primary</h3></div>"#,
        );
        let chain = SelectorChain::new(&["h2", "h3", "span.name"]);
        let root = html.root_element();
        assert_eq!(chain.first_text(&root).as_deref(), Some("Primary"));
    }

    #[test]
    fn empty_text_matches_are_skipped() {
        let html =
            Html::parse_fragment(r#"<div><p class="t">  </p><p class="t">Real title</p></div>"#);
        let chain = SelectorChain::new(&["p.t"]);
        let root = html.root_element();
        assert_eq!(chain.first_text(&root).as_deref(), Some("Real title"));
    }

    #[test]
    fn unparsable_fragments_are_dropped_not_fatal() {
        let html = Html::parse_fragment(r#"<div><em>kept</em></div>"#);
        let chain = SelectorChain::new(&["p:::broken", "em"]);
        let root = html.root_element();
        assert_eq!(chain.first_text(&root).as_deref(), Some("kept"));
    }

    #[test]
    fn rupee_parsing_handles_indian_grouping() {
        let pattern = rupee_pattern();
        assert_eq!(parse_rupees(&pattern, "₹1,29,999"), Some(129999));
        assert_eq!(parse_rupees(&pattern, "from ₹ 999 onwards"), Some(999));
        assert_eq!(parse_rupees(&pattern, "no price here"), None);
    }

    #[test]
    fn multiple_amounts_come_back_in_document_order() {
        let pattern = rupee_pattern();
        assert_eq!(
            all_rupee_amounts(&pattern, "₹24,999 ₹29,999 58% off"),
            vec![24999, 29999]
        );
    }
}

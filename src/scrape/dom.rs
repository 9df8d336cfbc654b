//! Queryable HTML tree
//!
//! Thin wrapper over `scraper` so the extractors only ever ask three things of
//! a document: select by CSS, step to the next sibling element, read text.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
pub struct Page {
    html: Html,
}

/// One element of a [`Page`]
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

impl Page {
    /// Parse a full document. Malformed markup is recovered, never rejected.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching `css`, in document order
    pub fn select(&self, css: &str) -> Vec<Node<'_>> {
        match selector(css) {
            Some(sel) => self.html.select(&sel).map(|element| Node { element }).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching `css`
    pub fn first(&self, css: &str) -> Option<Node<'_>> {
        self.select(css).into_iter().next()
    }
}

impl<'a> Node<'a> {
    /// Descendants matching `css`, in document order
    pub fn select(&self, css: &str) -> Vec<Node<'a>> {
        match selector(css) {
            Some(sel) => self.element.select(&sel).map(|element| Node { element }).collect(),
            None => Vec::new(),
        }
    }

    /// First descendant matching `css`
    pub fn first(&self, css: &str) -> Option<Node<'a>> {
        self.select(css).into_iter().next()
    }

    /// Next sibling that is an element, skipping text and comments
    pub fn next_element(&self) -> Option<Node<'a>> {
        self.element
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|element| Node { element })
    }

    /// Text content with whitespace collapsed
    pub fn text(&self) -> String {
        self.element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Whether `class` is one of the element's classes
    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <div class="facts">
            <span class="label">Proteínas</span>
            <!-- value follows -->
            <span class="value">
                20,7g
            </span>
            <a href="/x" class="link extra">Link  text</a>
        </div>
    "#;

    #[test]
    fn test_select_and_text() {
        let page = Page::parse(HTML);
        let label = page.first(".label").unwrap();
        assert_eq!(label.text(), "Proteínas");
        assert_eq!(page.select("span").len(), 2);
    }

    #[test]
    fn test_next_element_skips_text_and_comments() {
        let page = Page::parse(HTML);
        let label = page.first(".label").unwrap();
        let value = label.next_element().unwrap();
        assert_eq!(value.text(), "20,7g");
        assert!(value.has_class("value"));
    }

    #[test]
    fn test_attr_and_nested_select() {
        let page = Page::parse(HTML);
        let facts = page.first(".facts").unwrap();
        let link = facts.first("a.link").unwrap();
        assert_eq!(link.attr("href"), Some("/x"));
        assert_eq!(link.text(), "Link text");
        assert!(link.has_class("extra"));
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let page = Page::parse(HTML);
        assert!(page.select("[[[").is_empty());
    }
}

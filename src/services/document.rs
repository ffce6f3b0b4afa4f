//! Small query surface over a parsed HTML document.
//!
//! The extractor only needs a handful of capabilities: find a container by
//! marker attribute, list descendants matching a selector, read text, and
//! probe attributes. Keeping them here isolates `scraper` from the tile rules.

use scraper::{ElementRef, Html, Selector};

/// A parsed page.
pub struct Page {
    html: Html,
}

impl Page {
    /// Parse a full HTML document.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// First element matching `selector`, typically a container located by marker.
    pub fn find(&self, selector: &Selector) -> Option<Node<'_>> {
        self.html.select(selector).next().map(Node::from)
    }
}

/// A borrowed element of a [`Page`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Node<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Node<'a> {
    /// All descendants matching `selector`, in document order.
    pub fn find_all(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.element.select(selector).map(Node::from).collect()
    }

    /// First descendant matching `selector`.
    pub fn find(&self, selector: &Selector) -> Option<Node<'a>> {
        self.element.select(selector).next().map(Node::from)
    }

    /// Text content with whitespace runs collapsed and ends trimmed.
    pub fn text(&self) -> String {
        let raw: String = self.element.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.element.value().attr(name).is_some()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"
        <html><body>
          <ul data-id="specs">
            <li class="tile d-none"><p>  hidden
               tile </p></li>
            <li class="tile"><button data-m='{"cN":"x"}' disabled>Go</button></li>
          </ul>
        </body></html>
    "#;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_find_container_and_children() {
        let page = Page::parse(MARKUP);
        let container = page.find(&sel(r#"ul[data-id="specs"]"#)).unwrap();
        let tiles = container.find_all(&sel("li.tile"));

        assert_eq!(tiles.len(), 2);
        assert!(tiles[0].has_class("d-none"));
        assert!(!tiles[1].has_class("d-none"));
    }

    #[test]
    fn test_text_is_normalized() {
        let page = Page::parse(MARKUP);
        let p = page.find(&sel("p")).unwrap();
        assert_eq!(p.text(), "hidden tile");
    }

    #[test]
    fn test_nested_text_nodes_keep_one_space() {
        let page = Page::parse("<p>16GB <span>RAM</span></p><div><b>256GB</b><i>SSD</i></div>");
        assert_eq!(page.find(&sel("p")).unwrap().text(), "16GB RAM");
        // Adjacent nodes without whitespace are not split.
        assert_eq!(page.find(&sel("div")).unwrap().text(), "256GBSSD");
    }

    #[test]
    fn test_attributes() {
        let page = Page::parse(MARKUP);
        let button = page.find(&sel("button")).unwrap();

        assert!(button.has_attr("disabled"));
        assert_eq!(button.attr("data-m"), Some(r#"{"cN":"x"}"#));
        assert_eq!(button.attr("missing"), None);
    }

    #[test]
    fn test_missing_container() {
        let page = Page::parse("<html><body></body></html>");
        assert!(page.find(&sel(r#"ul[data-id="specs"]"#)).is_none());
    }
}

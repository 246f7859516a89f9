//! Content items
//!
//! A content item is identified by its node. Re-rendering the same post as
//! a new node yields a new item.

use quill_dom::{NodeId, Selector};
use url::Url;

use crate::{ConfigError, HostPage, HostResult, SelectorConfig};

/// Attribute marking an item node as augmented
pub const AUGMENTED_ATTR: &str = "data-quill-augmented";

/// One item of the host's content feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub node: NodeId,
    pub text: String,
    pub url: Option<String>,
}

/// Has `node` already been augmented?
pub fn is_augmented<H: HostPage>(host: &H, node: NodeId) -> bool {
    host.attribute(node, AUGMENTED_ATTR).is_some()
}

/// Mark `node` as augmented
pub fn mark_augmented<H: HostPage>(host: &H, node: NodeId) -> HostResult<()> {
    host.set_attribute(node, AUGMENTED_ATTR, "true")
}

/// Recognizes feed items and pulls their content out
pub trait ItemMatcher {
    /// Is `node` an item?
    fn is_item<H: HostPage>(&self, host: &H, node: NodeId) -> bool;

    /// Extract an item's content; `None` if it has no readable text
    fn extract<H: HostPage>(&self, host: &H, node: NodeId) -> Option<ContentItem>;
}

/// Test-id based matcher for the host's feed markup
#[derive(Debug, Clone)]
pub struct SelectorMatcher {
    item: Selector,
    text: Selector,
    text_fallback: Selector,
    link: Selector,
}

impl SelectorMatcher {
    pub fn new(item: Selector, text: Selector, text_fallback: Selector, link: Selector) -> Self {
        Self {
            item,
            text,
            text_fallback,
            link,
        }
    }

    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            SelectorConfig::parse("item", &config.item)?,
            SelectorConfig::parse("text", &config.text)?,
            SelectorConfig::parse("text_fallback", &config.text_fallback)?,
            SelectorConfig::parse("link", &config.link)?,
        ))
    }

    fn item_text<H: HostPage>(&self, host: &H, node: NodeId) -> Option<String> {
        let region = host
            .query(node, &self.text)
            .or_else(|| host.query(node, &self.text_fallback))?;
        let text = host.text_content(region).trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    fn item_url<H: HostPage>(&self, host: &H, node: NodeId) -> Option<String> {
        let link = host.query(node, &self.link)?;
        let href = host.attribute(link, "href")?;
        resolve_href(&host.url(), &href)
    }
}

impl Default for SelectorMatcher {
    fn default() -> Self {
        let text_fallback = Selector::tag("div").and_attr("lang", quill_dom::AttrOp::Exists);
        let link = Selector::tag("a").and_attr("href", quill_dom::AttrOp::Contains("/status/".to_string()));
        Self::new(
            Selector::attr_equals("data-testid", "tweet"),
            Selector::attr_equals("data-testid", "tweetText"),
            text_fallback,
            link,
        )
    }
}

impl ItemMatcher for SelectorMatcher {
    fn is_item<H: HostPage>(&self, host: &H, node: NodeId) -> bool {
        host.matches(node, &self.item)
    }

    fn extract<H: HostPage>(&self, host: &H, node: NodeId) -> Option<ContentItem> {
        let text = self.item_text(host, node)?;
        Some(ContentItem {
            node,
            text,
            url: self.item_url(host, node),
        })
    }
}

/// Resolve `href` against the page URL; absolute hrefs stand alone
fn resolve_href(base: &str, href: &str) -> Option<String> {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .or_else(|_| Url::parse(href))
        .ok()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Page;
    use quill_dom::simulate::build_item;

    fn page_with_item(url: &str, text: &str, href: Option<&str>) -> (Page, NodeId) {
        let page = Page::new(url);
        let doc = page.document();
        let item = build_item(&mut doc.borrow_mut(), text, href).unwrap();
        let body = page.body();
        doc.borrow_mut().append_child(body, item).unwrap();
        (page, item)
    }

    #[test]
    fn test_extract_resolves_relative_link() {
        let (page, node) = page_with_item("https://x.com/home", "hello world", Some("/alice/status/42"));
        let item = SelectorMatcher::default().extract(&page, node).unwrap();
        assert_eq!(item.text, "hello world");
        assert_eq!(item.url.as_deref(), Some("https://x.com/alice/status/42"));
    }

    #[test]
    fn test_extract_keeps_absolute_link_on_blank_page() {
        let (page, node) = page_with_item("about:blank", "abc", Some("https://x/1/status/1"));
        let item = SelectorMatcher::default().extract(&page, node).unwrap();
        assert_eq!(item.url.as_deref(), Some("https://x/1/status/1"));
    }

    #[test]
    fn test_link_without_status_is_ignored() {
        let (page, node) = page_with_item("https://x.com/home", "abc", Some("/alice"));
        let item = SelectorMatcher::default().extract(&page, node).unwrap();
        assert_eq!(item.url, None);
    }

    #[test]
    fn test_text_fallback_to_lang_div() {
        let page = Page::new("https://x.com/home");
        let article = page.create_element("article", &[("data-testid", "tweet")]);
        let body = page.create_element("div", &[("lang", "fr")]);
        page.insert_before(article, body, None).unwrap();
        page.set_text_content(body, "  bonjour ").unwrap();
        page.insert_before(page.body(), article, None).unwrap();

        let matcher = SelectorMatcher::default();
        assert!(matcher.is_item(&page, article));
        assert_eq!(matcher.extract(&page, article).unwrap().text, "bonjour");
    }

    #[test]
    fn test_blank_item_is_not_extracted() {
        let (page, node) = page_with_item("https://x.com/home", "   ", None);
        assert!(SelectorMatcher::default().extract(&page, node).is_none());
    }

    #[test]
    fn test_mark_roundtrip() {
        let (page, node) = page_with_item("https://x.com/home", "abc", None);
        assert!(!is_augmented(&page, node));
        mark_augmented(&page, node).unwrap();
        assert!(is_augmented(&page, node));
    }

    #[test]
    fn test_from_config_matches_default() {
        let (page, node) = page_with_item("https://x.com/home", "abc", Some("/a/status/1"));
        let configured = SelectorMatcher::from_config(&SelectorConfig::default()).unwrap();
        assert_eq!(
            configured.extract(&page, node),
            SelectorMatcher::default().extract(&page, node)
        );
    }
}

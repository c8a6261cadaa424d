//! Queryable view over a parsed episode page.
//!
//! Extractors only see [`DocumentQuery`]; [`HtmlDocument`] backs it with
//! `scraper`. Lookups never fail loudly: a missing node is `None`, and the
//! caller decides whether that breaks the record.

use scraper::{ElementRef, Html, Selector};

pub trait DocumentQuery {
    /// `content` of the first `<meta property="...">` with the given property.
    fn meta_content(&self, property: &str) -> Option<String>;

    /// Inner HTML of the first `tag` inside the first element carrying `class`.
    fn class_descendant_inner_html(&self, class: &str, tag: &str) -> Option<String>;

    /// Attribute value of the first element carrying `class`.
    fn class_attr(&self, class: &str, attr: &str) -> Option<String>;
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    fn first_with_class(&self, class: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(&format!(".{}", class)).ok()?;
        self.html.select(&selector).next()
    }
}

impl DocumentQuery for HtmlDocument {
    fn meta_content(&self, property: &str) -> Option<String> {
        let selector = Selector::parse(&format!("meta[property='{}']", property)).ok()?;
        self.html
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|content| content.to_string())
    }

    fn class_descendant_inner_html(&self, class: &str, tag: &str) -> Option<String> {
        let section = self.first_with_class(class)?;
        let selector = Selector::parse(tag).ok()?;
        section.select(&selector).next().map(|el| el.inner_html())
    }

    fn class_attr(&self, class: &str, attr: &str) -> Option<String> {
        self.first_with_class(class)
            .and_then(|el| el.value().attr(attr))
            .map(|value| value.to_string())
    }
}

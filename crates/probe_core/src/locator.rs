use serde::Serialize;

use crate::ElementDescriptor;

/// A CSS selector and an XPath expression meant to re-find one element.
///
/// Both are best-effort hints: ids are assumed unique and values are
/// substituted literally without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locator {
    pub css: String,
    pub xpath: String,
}

/// Builds both locator expressions for an element.
pub fn locate(element: &ElementDescriptor) -> Locator {
    Locator {
        css: css_selector(element),
        xpath: xpath_expression(element),
    }
}

/// `#id`, else `.class1.class2...`, else the bare tag name.
pub fn css_selector(element: &ElementDescriptor) -> String {
    if let Some(id) = element.id.as_deref() {
        return format!("#{id}");
    }
    if !element.class_list.is_empty() {
        let mut selector = String::new();
        for class in &element.class_list {
            selector.push('.');
            selector.push_str(class);
        }
        return selector;
    }
    element.tag_name.to_ascii_lowercase()
}

/// `//*[@id="id"]`, else `//tag`.
///
/// The tag fallback matches every element with that tag; no positional
/// index is added.
pub fn xpath_expression(element: &ElementDescriptor) -> String {
    match element.id.as_deref() {
        Some(id) => format!(r#"//*[@id="{id}"]"#),
        None => format!("//{}", element.tag_name.to_ascii_lowercase()),
    }
}

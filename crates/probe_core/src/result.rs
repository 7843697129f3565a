use serde::Serialize;

use crate::Locator;

/// Ordered items plus their count, serialized as `{count, items}`.
///
/// The count is derived from the items on construction so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection<T> {
    count: usize,
    items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Vec::new().into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IconItem {
    Image { src: String, alt: String },
    Svg { content: String },
    Icon { class: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonLocator {
    pub text: String,
    #[serde(flatten)]
    pub locator: Locator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputLocator {
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(flatten)]
    pub locator: Locator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLocator {
    #[serde(flatten)]
    pub locator: Locator,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LocatorGroups {
    pub buttons: Vec<ButtonLocator>,
    pub inputs: Vec<InputLocator>,
    pub navigation: Vec<NavigationLocator>,
}

/// Summary of one analysed page, the payload of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub url: String,
    pub links: Collection<LinkItem>,
    pub icons: Collection<IconItem>,
    pub locators: LocatorGroups,
}

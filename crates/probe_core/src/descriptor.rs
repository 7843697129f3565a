use std::collections::BTreeMap;

/// Snapshot of one DOM element as returned by a page query.
///
/// `id` is `None` when the attribute is missing or empty, matching how a
/// rendered DOM reports `element.id`. `class_list` keeps the tokens of the
/// `class` attribute in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementDescriptor {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_list: Vec<String>,
    /// Concatenated text content of the element and its descendants, untrimmed.
    pub text: String,
    /// Serialized outer markup of the element.
    pub markup: String,
    pub attributes: BTreeMap<String, String>,
}

impl ElementDescriptor {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Records an attribute, keeping `id` and `class_list` in sync with it.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "id" => self.id = Some(value.clone()).filter(|id| !id.is_empty()),
            "class" => self.class_list = split_class_list(&value),
            _ => {}
        }
        self.attributes.insert(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Raw `class` attribute, or an empty string when the element has none.
    pub fn class_attr(&self) -> &str {
        self.attr("class").unwrap_or_default()
    }
}

fn split_class_list(raw: &str) -> Vec<String> {
    raw.split_ascii_whitespace().map(ToOwned::to_owned).collect()
}

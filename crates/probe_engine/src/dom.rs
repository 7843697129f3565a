use probe_core::ElementDescriptor;
use scraper::{ElementRef, Html, Selector};

use crate::ExtractionError;

/// Runs `selector` against a parsed copy of `html` and describes every match.
pub(crate) fn select_descriptors(
    html: &str,
    selector: &str,
) -> Result<Vec<ElementDescriptor>, ExtractionError> {
    Ok(select_many(html, &[selector])?.pop().unwrap_or_default())
}

/// Runs every selector against a single parse of `html`.
///
/// The document is parsed inside this call because `scraper::Html` is not
/// `Send` and must not live across an await point. All selectors are checked
/// before any parsing happens.
pub(crate) fn select_many(
    html: &str,
    selectors: &[&str],
) -> Result<Vec<Vec<ElementDescriptor>>, ExtractionError> {
    let parsed = selectors
        .iter()
        .map(|selector| parse_selector(selector))
        .collect::<Result<Vec<_>, _>>()?;
    let document = Html::parse_document(html);
    Ok(parsed
        .iter()
        .map(|selector| document.select(selector).map(describe).collect())
        .collect())
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|err| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

fn describe(element: ElementRef<'_>) -> ElementDescriptor {
    let value = element.value();
    value.attrs().fold(
        ElementDescriptor::new(value.name())
            .with_text(element.text().collect::<String>())
            .with_markup(element.html()),
        |descriptor, (name, attr)| descriptor.with_attr(name, attr),
    )
}

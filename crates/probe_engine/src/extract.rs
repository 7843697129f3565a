use probe_core::{
    locate, AnalysisResult, ButtonLocator, ElementDescriptor, IconItem, InputLocator, LinkItem,
    LocatorGroups, NavigationLocator,
};
use url::Url;

use crate::{ExtractionError, PageHandle};

const BASE: &str = "base[href]";
const LINKS: &str = "a";
const IMAGES: &str = "img";
const SVGS: &str = "svg";
const ICON_CLASSES: &str = r#"[class*="icon"]"#;
const BUTTONS: &str = r#"button, [role="button"]"#;
const INPUTS: &str = "input, textarea, select";
const NAVIGATION: &str = r#"nav, [role="navigation"]"#;

const PASSES: [&str; 8] = [
    BASE,
    LINKS,
    IMAGES,
    SVGS,
    ICON_CLASSES,
    BUTTONS,
    INPUTS,
    NAVIGATION,
];

/// Everything pulled out of one page, before it is tied to a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSummary {
    pub links: Vec<LinkItem>,
    pub icons: Vec<IconItem>,
    pub locators: LocatorGroups,
}

impl PageSummary {
    pub fn into_result(self, url: impl Into<String>) -> AnalysisResult {
        AnalysisResult {
            url: url.into(),
            links: self.links.into(),
            icons: self.icons.into(),
            locators: self.locators,
        }
    }
}

/// Runs the link, icon and locator passes over a loaded page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageExtractor;

impl PageExtractor {
    /// Queries every pass in one batch, then builds the summary from the
    /// matches.
    pub async fn extract(&self, page: &dyn PageHandle) -> Result<PageSummary, ExtractionError> {
        let mut found = page.query_many(&PASSES).await?.into_iter();
        let mut next = move || found.next().unwrap_or_default();

        let base = document_base(page.url(), &next());
        let anchors = next();
        let images = next();
        let svgs = next();
        let classed = next();
        let buttons = next();
        let inputs = next();
        let navigation = next();

        Ok(PageSummary {
            links: links(&anchors, base.as_ref()),
            icons: icons(&images, svgs, &classed, base.as_ref()),
            locators: LocatorGroups {
                buttons: buttons
                    .iter()
                    .map(|button| ButtonLocator {
                        text: button.text.trim().to_string(),
                        locator: locate(button),
                    })
                    .collect(),
                inputs: inputs
                    .iter()
                    .map(|input| InputLocator {
                        input_type: input_type(input),
                        locator: locate(input),
                    })
                    .collect(),
                navigation: navigation
                    .iter()
                    .map(|region| NavigationLocator {
                        locator: locate(region),
                    })
                    .collect(),
            },
        })
    }
}

fn links(anchors: &[ElementDescriptor], base: Option<&Url>) -> Vec<LinkItem> {
    anchors
        .iter()
        .map(|anchor| LinkItem {
            href: resolved_attr(anchor, "href", base),
            text: anchor.text.trim().to_string(),
        })
        .collect()
}

/// Images first, then inline SVG, then anything with an icon-like class.
fn icons(
    images: &[ElementDescriptor],
    svgs: Vec<ElementDescriptor>,
    classed: &[ElementDescriptor],
    base: Option<&Url>,
) -> Vec<IconItem> {
    let mut icons = Vec::with_capacity(images.len() + svgs.len() + classed.len());
    icons.extend(images.iter().map(|img| IconItem::Image {
        src: resolved_attr(img, "src", base),
        alt: img.attr("alt").unwrap_or_default().to_string(),
    }));
    icons.extend(svgs.into_iter().map(|svg| IconItem::Svg {
        content: svg.markup,
    }));
    icons.extend(classed.iter().map(|element| IconItem::Icon {
        class: element.class_attr().to_string(),
    }));
    icons
}

/// URL relative references resolve against: the first `<base href>`,
/// itself resolved against the page, else the page URL.
fn document_base(page_url: &str, bases: &[ElementDescriptor]) -> Option<Url> {
    let page = Url::parse(page_url).ok();
    let declared = bases
        .first()
        .and_then(|base| base.attr("href"))
        .map(str::trim);
    match (page, declared) {
        (Some(page), Some(href)) => page.join(href).ok().or(Some(page)),
        (None, Some(href)) => Url::parse(href).ok(),
        (page, None) => page,
    }
}

/// Declared `type` attribute, else the tag name.
fn input_type(element: &ElementDescriptor) -> String {
    element
        .attr("type")
        .map(str::trim)
        .filter(|declared| !declared.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| element.tag_name.clone())
}

/// URL-valued attribute resolved against the page, the way a browser reports
/// `element.href`: missing attribute gives an empty string, anything the
/// parser cannot resolve is passed through as written.
fn resolved_attr(element: &ElementDescriptor, name: &str, base: Option<&Url>) -> String {
    let Some(raw) = element.attr(name) else {
        return String::new();
    };
    let trimmed = raw.trim();
    let resolved = match base {
        Some(base) => base.join(trimmed),
        None => Url::parse(trimmed),
    };
    resolved.map(String::from).unwrap_or_else(|_| raw.to_string())
}

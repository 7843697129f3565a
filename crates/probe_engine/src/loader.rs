use probe_core::ElementDescriptor;

use crate::{ExtractionError, NavigationError, ReleaseError};

/// A fully loaded page that can be queried with CSS selectors.
///
/// Each handle belongs to exactly one job and is handed back to its loader
/// through [`PageLoader::release`] once the job is done with it.
#[async_trait::async_trait]
pub trait PageHandle: Send + Sync {
    /// URL of the loaded document after redirects; relative links resolve
    /// against it.
    fn url(&self) -> &str;

    /// Every element matching `selector`, in document order, each once.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementDescriptor>, ExtractionError>;

    /// Runs several selectors against the same document, one result list per
    /// selector in the order given.
    async fn query_many(
        &self,
        selectors: &[&str],
    ) -> Result<Vec<Vec<ElementDescriptor>>, ExtractionError> {
        let mut found = Vec::with_capacity(selectors.len());
        for selector in selectors {
            found.push(self.query_all(selector).await?);
        }
        Ok(found)
    }
}

#[async_trait::async_trait]
pub trait PageLoader: Send + Sync {
    /// Navigates to `url` and waits until the document has finished loading.
    async fn load(&self, url: &str) -> Result<Box<dyn PageHandle>, NavigationError>;

    /// Tears down everything associated with `page`.
    async fn release(&self, page: Box<dyn PageHandle>) -> Result<(), ReleaseError>;
}

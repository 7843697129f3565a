//! Page probe core: DOM element descriptors, locator generation, the analysis
//! result shape and the pure job state machine.
mod descriptor;
mod job;
mod locator;
mod result;

pub use descriptor::ElementDescriptor;
pub use job::{JobId, JobState, JobStatus, JobStatusView, ParseJobIdError, TransitionError};
pub use locator::{css_selector, locate, xpath_expression, Locator};
pub use result::{
    AnalysisResult, ButtonLocator, Collection, IconItem, InputLocator, LinkItem, LocatorGroups,
    NavigationLocator,
};

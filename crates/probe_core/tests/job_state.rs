use std::sync::Once;

use probe_core::{
    AnalysisResult, Collection, JobId, JobState, JobStatus, LocatorGroups, TransitionError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn empty_result(url: &str) -> AnalysisResult {
    AnalysisResult {
        url: url.to_string(),
        links: Collection::default(),
        icons: Collection::default(),
        locators: LocatorGroups::default(),
    }
}

#[test]
fn new_jobs_start_processing_without_payload() {
    init_logging();
    let state = JobState::default();

    assert_eq!(state.status(), JobStatus::Processing);
    assert!(!state.is_terminal());
    assert!(state.result().is_none());
    assert!(state.error().is_none());
}

#[test]
fn completing_stores_result_only() {
    init_logging();
    let state = JobState::Processing
        .complete(empty_result("https://example.com"))
        .unwrap();

    assert_eq!(state.status(), JobStatus::Completed);
    assert!(state.is_terminal());
    assert_eq!(state.result().unwrap().url, "https://example.com");
    assert!(state.error().is_none());
}

#[test]
fn failing_stores_error_only() {
    init_logging();
    let state = JobState::Processing.fail("navigation failed").unwrap();

    assert_eq!(state.status(), JobStatus::Failed);
    assert_eq!(state.error(), Some("navigation failed"));
    assert!(state.result().is_none());
}

#[test]
fn terminal_states_reject_further_transitions() {
    init_logging();
    let completed = JobState::Processing
        .complete(empty_result("https://a.example"))
        .unwrap();
    let failed = JobState::Processing.fail("boom").unwrap();

    assert_eq!(
        completed.fail("late").unwrap_err(),
        TransitionError::AlreadyTerminal(JobStatus::Completed)
    );
    assert_eq!(
        failed.complete(empty_result("https://b.example")).unwrap_err(),
        TransitionError::AlreadyTerminal(JobStatus::Failed)
    );
    assert_eq!(
        failed.fail("again").unwrap_err(),
        TransitionError::AlreadyTerminal(JobStatus::Failed)
    );
}

#[test]
fn job_ids_are_unique_and_parse_back() {
    let first = JobId::new();
    let second = JobId::new();
    assert_ne!(first, second);

    let parsed: JobId = first.to_string().parse().unwrap();
    assert_eq!(parsed, first);
    assert!("not-a-job".parse::<JobId>().is_err());
}

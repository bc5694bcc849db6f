//! Integration test to verify the workspace wires together.

#![allow(clippy::no_effect_underscore_binding)]

#[test]
fn domain_crate_compiles() {
    let _method = spoiler_domain::request::HttpMethod::Get;
    let _request = spoiler_domain::request::RequestSpec::get("Test");
    let _draft = spoiler_domain::StoryDraft::new("Title", "Description");
}

#[test]
fn application_crate_compiles() {
    let _error = spoiler_application::HttpClientError::Timeout { timeout_ms: 1 };
}

#[test]
fn infrastructure_crate_compiles() {
    let _runner = spoiler_infrastructure::TestRunner::new();
    let _steps = spoiler_infrastructure::StepKind::ORDER;
}

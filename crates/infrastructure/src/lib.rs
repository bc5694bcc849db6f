//! Spoiler Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest-backed `HttpClient`, configuration
//! loading, and the scenario that drives the Story API end to end.

pub mod adapters;
pub mod config;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use config::{SuiteConfig, SuiteConfigError};
pub use testing::{
    ScenarioContext, ScenarioReport, StepKind, StepOutcome, StoryScenario, TestRunner,
};

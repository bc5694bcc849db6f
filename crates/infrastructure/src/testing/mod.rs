//! Response testing infrastructure.
//!
//! The assertion runner and the composed Story scenario built on it.

mod runner;
mod scenario;

pub use runner::TestRunner;
pub use scenario::{ScenarioContext, ScenarioReport, StepKind, StepOutcome, StoryScenario};

//! The end-to-end Story scenario.
//!
//! One linear procedure: create, edit, list and delete a story, then probe
//! the negative paths. The only state carried between steps is the id of
//! the story created in the first step, held in a [`ScenarioContext`] that
//! is built per run and passed to each step.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use spoiler_application::{ApplicationResult, HttpClient, StoryApi};
use spoiler_domain::response::ResponseSpec;
use spoiler_domain::story::messages;
use spoiler_domain::testing::{Assertion, AssertionResult, TestResults, TestSuite};
use spoiler_domain::{ApiMessage, Credentials, StoryDraft, StoryId};
use tracing::{info, warn};

use super::TestRunner;

/// One step of the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Create a valid story; expects 201.
    CreateStory,
    /// Edit the created story; expects 200.
    EditStory,
    /// List all stories; expects 200 and an array.
    ListStories,
    /// Delete the created story; expects 200.
    DeleteStory,
    /// Delete the same story again; expects the not-found answer.
    DeleteDeletedStory,
    /// Create with empty fields; expects 400.
    CreateInvalidStory,
    /// Edit an id that never existed; expects 404.
    EditMissingStory,
    /// Delete an id that never existed; expects 400.
    DeleteMissingStory,
}

impl StepKind {
    /// Execution order.
    pub const ORDER: [Self; 8] = [
        Self::CreateStory,
        Self::EditStory,
        Self::ListStories,
        Self::DeleteStory,
        Self::DeleteDeletedStory,
        Self::CreateInvalidStory,
        Self::EditMissingStory,
        Self::DeleteMissingStory,
    ];

    /// Short name used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateStory => "create story",
            Self::EditStory => "edit story",
            Self::ListStories => "list stories",
            Self::DeleteStory => "delete story",
            Self::DeleteDeletedStory => "delete already deleted story",
            Self::CreateInvalidStory => "create story without required fields",
            Self::EditMissingStory => "edit non-existing story",
            Self::DeleteMissingStory => "delete non-existing story",
        }
    }

    /// Whether the step targets the story created earlier in the run.
    #[must_use]
    pub const fn needs_story(self) -> bool {
        matches!(
            self,
            Self::EditStory | Self::DeleteStory | Self::DeleteDeletedStory
        )
    }

    /// The response contract of the step.
    #[must_use]
    pub fn suite(self) -> TestSuite {
        let suite = TestSuite::new(self.name());
        match self {
            Self::CreateStory => suite
                .with_assertion(Assertion::status(201))
                .with_assertion(Assertion::not_empty("$.storyId"))
                .with_assertion(Assertion::message(messages::CREATED)),
            Self::EditStory => suite
                .with_assertion(Assertion::status(200))
                .with_assertion(Assertion::message(messages::EDITED)),
            Self::ListStories => suite
                .with_assertion(Assertion::status(200))
                .with_assertion(Assertion::body_contains("["))
                .with_assertion(Assertion::IsJsonArray),
            Self::DeleteStory => suite
                .with_assertion(Assertion::status(200))
                .with_assertion(Assertion::message(messages::DELETED)),
            Self::DeleteDeletedStory | Self::DeleteMissingStory => suite
                .with_assertion(Assertion::status(400))
                .with_assertion(Assertion::message(messages::DELETE_FAILED)),
            Self::CreateInvalidStory => suite.with_assertion(Assertion::status(400)),
            Self::EditMissingStory => suite
                .with_assertion(Assertion::status(404))
                .with_assertion(Assertion::message(messages::NOT_FOUND)),
        }
    }
}

/// State shared between the steps of a single run.
#[derive(Debug, Default)]
pub struct ScenarioContext {
    created_story: Option<StoryId>,
}

impl ScenarioContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the story created in this run, if creation succeeded.
    #[must_use]
    pub const fn created_story(&self) -> Option<&StoryId> {
        self.created_story.as_ref()
    }

    fn remember(&mut self, id: StoryId) {
        self.created_story = Some(id);
    }
}

/// What happened in one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// The step.
    pub step: StepKind,
    /// Assertion results. When the step never got a response every
    /// assertion is recorded as failed.
    pub results: TestResults,
    /// The step did not run because no story id was available.
    pub skipped: bool,
    /// Transport error, if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    fn completed(step: StepKind, results: TestResults) -> Self {
        Self {
            step,
            results,
            skipped: false,
            error: None,
        }
    }

    fn skipped(step: StepKind, suite: &TestSuite, reason: &str) -> Self {
        Self {
            step,
            results: fail_all(suite, &format!("skipped: {reason}")),
            skipped: true,
            error: None,
        }
    }

    fn errored(step: StepKind, suite: &TestSuite, error: String) -> Self {
        Self {
            step,
            results: fail_all(suite, &error),
            skipped: false,
            error: Some(error),
        }
    }

    /// True if the step ran and every assertion passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        !self.skipped && self.error.is_none() && self.results.all_passed()
    }
}

fn fail_all(suite: &TestSuite, reason: &str) -> TestResults {
    let results = suite
        .assertions
        .iter()
        .map(|a| AssertionResult::fail(a.clone(), reason))
        .collect();
    TestResults::new(&suite.name, results, 0)
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of all steps.
    pub duration_ms: u64,
    /// One entry per step, in execution order.
    pub steps: Vec<StepOutcome>,
}

impl ScenarioReport {
    /// True if every step passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.steps.iter().all(StepOutcome::passed)
    }

    /// Number of steps that passed.
    #[must_use]
    pub fn passed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.passed()).count()
    }

    /// Looks up the outcome of a step.
    #[must_use]
    pub fn step(&self, kind: StepKind) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == kind)
    }
}

/// Runs the Story scenario over an authenticated context.
pub struct StoryScenario<C: HttpClient> {
    api: StoryApi<C>,
    runner: TestRunner,
}

impl<C: HttpClient> StoryScenario<C> {
    /// Wraps an authenticated context.
    pub const fn new(api: StoryApi<C>) -> Self {
        Self {
            api,
            runner: TestRunner::new(),
        }
    }

    /// Authenticates and prepares a scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails; no step runs in that case.
    pub async fn connect(client: Arc<C>, credentials: &Credentials) -> ApplicationResult<Self> {
        Ok(Self::new(StoryApi::connect(client, credentials).await?))
    }

    /// Runs every step in order with a fresh context.
    pub async fn run(&self) -> ScenarioReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut context = ScenarioContext::new();
        let mut steps = Vec::with_capacity(StepKind::ORDER.len());

        for step in StepKind::ORDER {
            let outcome = self.run_step(step, &mut context).await;
            log_outcome(&outcome);
            steps.push(outcome);
        }

        ScenarioReport {
            started_at,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            steps,
        }
    }

    /// Runs one step against the given context.
    ///
    /// A successful create stores the returned id in `context`.
    pub async fn run_step(&self, step: StepKind, context: &mut ScenarioContext) -> StepOutcome {
        let suite = step.suite();
        info!(step = step.name(), "running step");

        let story = if step.needs_story() {
            match context.created_story() {
                Some(id) => Some(id.clone()),
                None => return StepOutcome::skipped(step, &suite, "no story was created"),
            }
        } else {
            None
        };

        let response = match self.send(step, story.as_ref()).await {
            Ok(response) => response,
            Err(e) => return StepOutcome::errored(step, &suite, e.to_string()),
        };

        if step == StepKind::CreateStory
            && let Some(id) = response.json::<ApiMessage>().ok().and_then(|b| b.story_id())
        {
            context.remember(id);
        }

        StepOutcome::completed(step, self.runner.run(&suite, &response))
    }

    async fn send(
        &self,
        step: StepKind,
        story: Option<&StoryId>,
    ) -> ApplicationResult<ResponseSpec> {
        let missing = StoryId::non_existing();
        let target = story.unwrap_or(&missing);

        match step {
            StepKind::CreateStory => {
                self.api
                    .create(&StoryDraft::new("New Story", "This is a spoiler"))
                    .await
            }
            StepKind::EditStory => {
                self.api
                    .edit(target, &StoryDraft::new("Updated Story", "Updated spoiler"))
                    .await
            }
            StepKind::ListStories => self.api.list().await,
            StepKind::DeleteStory | StepKind::DeleteDeletedStory | StepKind::DeleteMissingStory => {
                self.api.delete(target).await
            }
            StepKind::CreateInvalidStory => self.api.create(&StoryDraft::empty()).await,
            StepKind::EditMissingStory => {
                self.api
                    .edit(
                        target,
                        &StoryDraft::new("Non-existent Story", "This does not exist"),
                    )
                    .await
            }
        }
    }
}

fn log_outcome(outcome: &StepOutcome) {
    let step = outcome.step.name();
    if outcome.skipped {
        warn!(step, "step skipped");
    } else if let Some(error) = &outcome.error {
        warn!(step, %error, "step failed before a response arrived");
    } else if outcome.passed() {
        info!(step, passed = outcome.results.passed, "step passed");
    } else {
        for failure in outcome.results.failures() {
            warn!(
                step,
                assertion = %failure.assertion.description(),
                actual = failure.actual.as_deref().unwrap_or("-"),
                error = failure.error.as_deref().unwrap_or("-"),
                "assertion failed"
            );
        }
    }
}

//! Story Spoiler API suite - command line runner
//!
//! Authenticates against the configured service, runs the Story scenario
//! once and exits non-zero if any step failed.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use spoiler_infrastructure::{
    ReqwestHttpClient, ScenarioReport, StepOutcome, StoryScenario, SuiteConfig,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Story Spoiler suite v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = SuiteConfig::load().context("failed to load configuration")?;
    tracing::info!(
        base_url = %config.base_url,
        username = %config.username,
        timeout_ms = config.timeout_ms,
        "configuration loaded"
    );

    let report = run(&config).await?;
    print_summary(&report);

    if let Some(path) = &config.report_path {
        write_report(path, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs one scenario. The HTTP client lives only as long as this call.
async fn run(config: &SuiteConfig) -> anyhow::Result<ScenarioReport> {
    let client = Arc::new(ReqwestHttpClient::from_config(config)?);
    let scenario = StoryScenario::connect(client, &config.credentials())
        .await
        .context("suite setup failed")?;
    Ok(scenario.run().await)
}

fn print_summary(report: &ScenarioReport) {
    for outcome in &report.steps {
        println!("{}", summary_line(outcome));
        for failure in outcome.results.failures() {
            println!(
                "      {}: {}",
                failure.assertion.description(),
                failure.error.as_deref().unwrap_or("failed")
            );
        }
    }
    println!(
        "{}/{} steps passed in {} ms",
        report.passed_steps(),
        report.steps.len(),
        report.duration_ms
    );
}

fn summary_line(outcome: &StepOutcome) -> String {
    let label = if outcome.skipped {
        "SKIP"
    } else if outcome.passed() {
        "PASS"
    } else {
        "FAIL"
    };
    format!(
        "{label} {} ({}/{})",
        outcome.step.name(),
        outcome.results.passed,
        outcome.results.total
    )
}

fn write_report(path: &Path, report: &ScenarioReport) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

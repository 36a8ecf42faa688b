//! Branch naming convention enforcement for GitHub repositories
//!
//! Classifies the incoming repository event, validates the affected
//! branch name against the configured rule, and reconciles tracking
//! issues with the result: a violation on branch creation opens one,
//! branch deletion removes it again.

use anyhow::Context;
use gh_branch_warden_config::Settings;
use gh_issue_client::OctocrabIssueClient;
use std::env;
use std::path::Path;

mod event;
mod reconciler;
mod rule;
mod runner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting gh-branch-warden");

    let settings = Settings::load()?;

    let event_name =
        env::var("GITHUB_EVENT_NAME").context("GITHUB_EVENT_NAME is not set")?;
    let event_path =
        env::var("GITHUB_EVENT_PATH").context("GITHUB_EVENT_PATH is not set")?;
    let payload = event::load_event_payload(Path::new(&event_path))?;

    let client = OctocrabIssueClient::from_token(&settings.token)?;

    let report = runner::run(&settings, &event_name, &payload, &client).await?;
    report.emit_workflow_commands();

    if !report.is_success() {
        std::process::exit(1);
    }

    log::info!("Exiting gh-branch-warden");
    Ok(())
}

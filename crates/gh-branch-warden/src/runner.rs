//! Run orchestration and outcome reporting
//!
//! Executes the classified checks strictly in order: branch create,
//! pull request, branch delete. The checks are independent; a failure
//! in one is recorded and the next still runs. The collected outcome
//! is surfaced as GitHub Actions workflow commands plus the process
//! exit code.

use crate::event::{classify, BranchEventKind, EventPayload};
use crate::reconciler::{OpenOutcome, Reconciler};
use crate::rule::CompiledRule;
use gh_branch_warden_config::Settings;
use gh_issue_client::IssueTracker;
use log::{debug, error, info, warn};

/// Accumulated outcome of one invocation
#[derive(Debug, Default)]
pub struct RunReport {
    failures: Vec<String>,
    warnings: Vec<String>,
}

impl RunReport {
    fn fail(&mut self, message: String) {
        error!("{}", message);
        self.failures.push(message);
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Emit `::error::`/`::warning::` workflow commands for the runner log
    pub fn emit_workflow_commands(&self) {
        for warning in &self.warnings {
            println!("::warning::{}", escape_command_data(warning));
        }
        for failure in &self.failures {
            println!("::error::{}", escape_command_data(failure));
        }
    }
}

/// Escape message data for the workflow command syntax
fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Run every check the event envelope calls for
///
/// Configuration problems (uncompilable rule, malformed envelope) are
/// fatal and propagate as errors before any check runs; everything
/// after that is collected into the returned report.
pub async fn run(
    settings: &Settings,
    event_name: &str,
    payload: &EventPayload,
    tracker: &dyn IssueTracker,
) -> anyhow::Result<RunReport> {
    let rule = CompiledRule::compile(&settings.rule)?;
    let events = classify(event_name, payload)?;
    let reconciler = Reconciler::new(tracker, settings.max_scan_pages);
    let mut report = RunReport::default();

    for event in &events {
        if rule.matches(&event.branch) {
            debug!("Branch \"{}\" conforms to the naming rule", event.branch);
            continue;
        }

        match event.kind {
            BranchEventKind::Created => {
                match reconciler
                    .open_violation(event, &rule, settings.assignment)
                    .await
                {
                    Ok(OpenOutcome::OpenedUnassigned) => report.warn(format!(
                        "Opened a tracking issue for branch \"{}\" but {} is not assignable in {}/{}",
                        event.branch, event.actor, event.owner, event.repo
                    )),
                    Ok(_) => {}
                    Err(e) => report.fail(format!(
                        "Failed to open a tracking issue for branch \"{}\": {:#}",
                        event.branch, e
                    )),
                }
            }
            BranchEventKind::PullRequestUpdated => {
                // Warn-only path: no tracking issue is created or touched
                let number = event.pr_number.unwrap_or_default();
                report.fail(format!(
                    "The head branch of pull request {} has an incorrect name. \
                     Please update the branch name to the approved naming convention. \
                     Pattern: {} Flags: {}",
                    number,
                    rule.pattern(),
                    rule.flags()
                ));
            }
            BranchEventKind::Deleted => {
                if let Err(e) = reconciler.close_violation(event).await {
                    report.fail(format!(
                        "Failed to reconcile tracking issues for deleted branch \"{}\": {:#}",
                        event.branch, e
                    ));
                }
            }
        }
    }

    info!(
        "Run finished: {} failure(s), {} warning(s)",
        report.failures.len(),
        report.warnings.len()
    );
    Ok(report)
}

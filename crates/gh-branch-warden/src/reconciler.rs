//! Tracking issue reconciliation
//!
//! Keeps the issue tracker consistent with branch state: a violation on
//! branch creation opens exactly one tracking issue, and the matching
//! issue (plus any duplicates left by earlier runs) is removed when the
//! branch is deleted. Matching is by exact title equality, so the title
//! derivation here is the single source of truth for both sides.

use crate::event::BranchEvent;
use crate::rule::CompiledRule;
use anyhow::bail;
use gh_branch_warden_config::AssignmentMode;
use gh_issue_client::{IssueRef, IssueTracker, NewIssue};
use log::{debug, info};

/// The title of a tracking issue for a non-conforming branch
///
/// Byte-for-byte identical on the create and delete paths; the close
/// scan compares with string equality, not a pattern.
pub fn violation_title(branch: &str) -> String {
    format!("⚠ Branch \"{}\" has an incorrect name", branch)
}

/// Issue body naming the actor and the violated rule
fn violation_body(actor: &str, branch: &str, rule: &CompiledRule) -> String {
    format!(
        "👋 @{}\n\nPlease update the branch `{}` to the approved naming convention.\n\n\
         - Pattern: `{}`\n- Flags: `{}`\n",
        actor,
        branch,
        rule.pattern(),
        rule.flags()
    )
}

/// Outcome of opening a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A tracking issue was created and assigned to the actor
    Opened,
    /// A tracking issue was created, but the actor was not assignable
    OpenedUnassigned,
    /// A tracking issue with this exact title already exists
    AlreadyTracked,
}

/// Reconciles tracking issues through an [`IssueTracker`]
pub struct Reconciler<'a> {
    tracker: &'a dyn IssueTracker,
    max_scan_pages: u32,
}

impl<'a> Reconciler<'a> {
    pub fn new(tracker: &'a dyn IssueTracker, max_scan_pages: u32) -> Self {
        Self {
            tracker,
            max_scan_pages,
        }
    }

    /// Open a tracking issue for a naming violation
    ///
    /// Performs an exact-title existence check first and skips creation
    /// when a record already exists, so repeated create events for the
    /// same branch do not pile up duplicates. A small check-then-create
    /// race window remains; the close-side scan deletes every duplicate
    /// it finds, so the window is self-healing.
    ///
    /// In soft assignment mode the actor's assignability is checked up
    /// front and an unassignable actor gets an unassigned issue instead
    /// of a rejected write.
    pub async fn open_violation(
        &self,
        event: &BranchEvent,
        rule: &CompiledRule,
        assignment: AssignmentMode,
    ) -> anyhow::Result<OpenOutcome> {
        let title = violation_title(&event.branch);

        if let Some(existing) = self
            .find_tracking_issue(&event.owner, &event.repo, &title)
            .await?
        {
            info!(
                "Branch \"{}\" is already tracked by issue {}",
                event.branch, existing.id
            );
            return Ok(OpenOutcome::AlreadyTracked);
        }

        let assignee = match assignment {
            AssignmentMode::Strict => Some(event.actor.clone()),
            AssignmentMode::Soft => {
                if self
                    .tracker
                    .is_assignable(&event.owner, &event.repo, &event.actor)
                    .await?
                {
                    Some(event.actor.clone())
                } else {
                    None
                }
            }
        };
        let unassigned = assignee.is_none();

        let issue = NewIssue {
            title,
            body: violation_body(&event.actor, &event.branch, rule),
            assignee,
        };
        let created = self
            .tracker
            .create_issue(&event.owner, &event.repo, &issue)
            .await?;

        info!(
            "Opened tracking issue {} for branch \"{}\"",
            created.id, event.branch
        );
        Ok(if unassigned {
            OpenOutcome::OpenedUnassigned
        } else {
            OpenOutcome::Opened
        })
    }

    /// Remove the tracking issue(s) for a deleted branch
    ///
    /// Scans every page of open issues, deleting each exact-title match
    /// immediately rather than waiting for the scan to finish. Deletion
    /// failures are collected and reported together once the scan
    /// completes; a page-fetch failure aborts only the remainder of the
    /// scan, leaving earlier deletions in place. Finding no match is
    /// success.
    pub async fn close_violation(&self, event: &BranchEvent) -> anyhow::Result<()> {
        let title = violation_title(&event.branch);
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;
        let mut deleted = 0usize;
        let mut problems: Vec<String> = Vec::new();

        loop {
            let page = match self
                .tracker
                .list_open_issues(&event.owner, &event.repo, cursor.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    problems.push(format!("Listing open issues failed: {:#}", e));
                    break;
                }
            };
            pages += 1;

            for issue in &page.issues {
                if issue.title == title {
                    match self.tracker.delete_issue(&issue.id).await {
                        Ok(()) => deleted += 1,
                        Err(e) => {
                            problems.push(format!("Deleting issue {} failed: {:#}", issue.id, e))
                        }
                    }
                }
            }

            // The store's hasNextPage signal is the termination
            // condition; the page bound only catches a runaway cursor.
            if !page.has_next_page {
                break;
            }
            if pages >= self.max_scan_pages {
                problems.push(format!(
                    "Scan stopped at the {}-page bound with pages remaining",
                    self.max_scan_pages
                ));
                break;
            }
            cursor = page.end_cursor;
        }

        debug!(
            "Deleted {} tracking issue(s) for branch \"{}\" across {} page(s)",
            deleted, event.branch, pages
        );

        if problems.is_empty() {
            Ok(())
        } else {
            bail!(problems.join("; "))
        }
    }

    /// Find an open issue with exactly this title, if one exists
    async fn find_tracking_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
    ) -> anyhow::Result<Option<IssueRef>> {
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self
                .tracker
                .list_open_issues(owner, repo, cursor.as_deref())
                .await?;
            pages += 1;

            if let Some(found) = page.issues.iter().find(|issue| issue.title == title) {
                return Ok(Some(found.clone()));
            }
            if !page.has_next_page {
                return Ok(None);
            }
            if pages >= self.max_scan_pages {
                bail!(
                    "Existence check stopped at the {}-page bound with pages remaining",
                    self.max_scan_pages
                );
            }
            cursor = page.end_cursor;
        }
    }
}

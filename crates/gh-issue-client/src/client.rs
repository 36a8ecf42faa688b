//! Issue tracker trait definition
//!
//! This module defines the core `IssueTracker` trait that all client
//! implementations must satisfy. The enforcement logic only ever talks
//! to this trait, which keeps it testable against an in-memory mock.

use crate::types::{IssuePage, IssueRef, NewIssue};
use async_trait::async_trait;

/// Issue tracker client trait
///
/// Defines the interface for the three issue operations the enforcement
/// run performs. Implementations can be direct (hitting the API) or
/// decorated with rate limiting, retry logic, etc.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create a tracking issue
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `issue` - Title, body and optional assignee
    ///
    /// # Returns
    ///
    /// A reference to the created issue, or an error if the store
    /// rejects the write (permissions, invalid assignee, ...).
    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<IssueRef>;

    /// Fetch one page of open issues for a repository
    ///
    /// Pages hold at most [`crate::ISSUE_PAGE_SIZE`] issues, oldest
    /// first, with only the fields reconciliation needs (title, id).
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `cursor` - `end_cursor` returned with the previous page, or
    ///   `None` for the first page
    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> anyhow::Result<IssuePage>;

    /// Delete an issue by its opaque node id
    ///
    /// # Arguments
    ///
    /// * `issue_id` - The GraphQL node id from [`IssueRef::id`]
    async fn delete_issue(&self, issue_id: &str) -> anyhow::Result<()>;

    /// Check whether a login can be assigned issues in a repository
    ///
    /// Bots and outside collaborators are often not assignable; the
    /// store rejects creates that try. This lets callers find out
    /// beforehand instead of provoking the rejection.
    async fn is_assignable(&self, owner: &str, repo: &str, login: &str)
        -> anyhow::Result<bool>;
}

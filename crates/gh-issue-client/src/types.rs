//! Issue tracker data transfer objects
//!
//! These types represent the data exchanged with the GitHub API.
//! They are intentionally separate from the enforcement domain models
//! to keep this crate pure and reusable.

use serde::{Deserialize, Serialize};

/// Payload for creating a new tracking issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    /// Issue title (the reconciler matches on this later, byte for byte)
    pub title: String,

    /// Issue body in GitHub-flavored markdown
    pub body: String,

    /// Login to assign the issue to, if any
    pub assignee: Option<String>,
}

/// A reference to an existing issue
///
/// The id is the GraphQL node id, the only identifier the
/// `deleteIssue` mutation accepts. It is opaque to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    /// Opaque GraphQL node id
    pub id: String,

    /// Issue title
    pub title: String,
}

/// One page of an open-issue listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuePage {
    /// Issues on this page, oldest first
    pub issues: Vec<IssueRef>,

    /// Cursor to pass as `after` for the next page
    ///
    /// Only meaningful while `has_next_page` is true; callers must not
    /// reuse it once the store reports no further pages.
    pub end_cursor: Option<String>,

    /// Whether the store has more pages after this one
    pub has_next_page: bool,
}

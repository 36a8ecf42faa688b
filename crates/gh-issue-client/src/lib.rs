//! GitHub issue client for branch naming enforcement
//!
//! This crate provides a trait-based client for the three issue-tracker
//! operations the enforcement run needs: creating a tracking issue,
//! listing open issues page by page, and deleting an issue by id.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               IssueTracker trait                 │
//! │  - create_issue()                                │
//! │  - list_open_issues()                            │
//! │  - delete_issue()                                │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────────┐
//!              │ OctocrabIssueClient │
//!              │ (REST + GraphQL)    │
//!              └─────────────────────┘
//! ```
//!
//! Creation goes through the REST API; listing and deletion go through
//! GraphQL, because issue deletion only exists there and the listing
//! needs the GraphQL node id to feed the delete mutation.

pub mod client;
pub mod octocrab_client;
pub mod types;

/// Number of issues requested per pagination page
pub const ISSUE_PAGE_SIZE: u8 = 100;

pub use client::IssueTracker;
pub use octocrab_client::OctocrabIssueClient;
pub use types::{IssuePage, IssueRef, NewIssue};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;

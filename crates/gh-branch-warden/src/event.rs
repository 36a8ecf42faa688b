//! Event envelope parsing and classification
//!
//! The envelope is the webhook payload GitHub writes to the file named
//! by `GITHUB_EVENT_PATH`. Classification is purely structural: it
//! extracts up to three independent branch lifecycle events, with no
//! name validation of its own.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Raw event envelope, limited to the fields we consume
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    /// The ref a create/delete event applies to (a branch or tag name)
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,

    /// "branch" or "tag" for create/delete events
    pub ref_type: Option<String>,

    pub repository: Option<Repository>,
    pub sender: Option<Sender>,
    pub pull_request: Option<PullRequestInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub head: PullRequestHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    /// Head branch name
    #[serde(rename = "ref")]
    pub branch: String,
}

/// Which lifecycle action a classified event represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchEventKind {
    Created,
    Deleted,
    PullRequestUpdated,
}

/// One branch lifecycle event derived from the envelope
///
/// Derived once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEvent {
    pub kind: BranchEventKind,
    pub branch: String,
    pub actor: String,
    pub owner: String,
    pub repo: String,
    pub pr_number: Option<u64>,
}

/// Read and deserialize the event envelope file
pub fn load_event_payload(path: &Path) -> anyhow::Result<EventPayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload at {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse event payload JSON")
}

/// Classify an envelope into branch lifecycle events
///
/// Three independent checks, in the order they are later processed:
/// a branch-create event, a pull request update, a branch-delete
/// event. The same invocation can produce more than one (a `create`
/// delivery can carry a pull_request object too).
///
/// Missing owner/repo/sender is fatal, as is a missing ref on a
/// branch create/delete; downstream actions cannot be addressed
/// without them.
pub fn classify(event_name: &str, payload: &EventPayload) -> anyhow::Result<Vec<BranchEvent>> {
    let repository = payload
        .repository
        .as_ref()
        .context("Event payload has no repository")?;
    let owner = &repository.owner.login;
    let repo = &repository.name;
    let actor = &payload
        .sender
        .as_ref()
        .context("Event payload has no sender")?
        .login;

    let event = |kind, branch: &str, pr_number| BranchEvent {
        kind,
        branch: branch.to_string(),
        actor: actor.clone(),
        owner: owner.clone(),
        repo: repo.clone(),
        pr_number,
    };

    let mut events = Vec::new();

    if event_name == "create" && payload.ref_type.as_deref() == Some("branch") {
        let branch = payload
            .git_ref
            .as_ref()
            .context("Branch create event has no ref")?;
        events.push(event(BranchEventKind::Created, branch, None));
    }

    if let Some(pr) = &payload.pull_request {
        events.push(event(
            BranchEventKind::PullRequestUpdated,
            &pr.head.branch,
            Some(pr.number),
        ));
    }

    if event_name == "delete" && payload.ref_type.as_deref() == Some("branch") {
        let branch = payload
            .git_ref
            .as_ref()
            .context("Branch delete event has no ref")?;
        events.push(event(BranchEventKind::Deleted, branch, None));
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> EventPayload {
        serde_json::from_value(json).unwrap()
    }

    fn base_envelope() -> serde_json::Value {
        serde_json::json!({
            "repository": { "name": "widgets", "owner": { "login": "acme" } },
            "sender": { "login": "octocat" }
        })
    }

    #[test]
    fn test_branch_create_classified() {
        let mut envelope = base_envelope();
        envelope["ref"] = "wip-thing".into();
        envelope["ref_type"] = "branch".into();

        let events = classify("create", &payload(envelope)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, BranchEventKind::Created);
        assert_eq!(events[0].branch, "wip-thing");
        assert_eq!(events[0].actor, "octocat");
        assert_eq!(events[0].owner, "acme");
        assert_eq!(events[0].repo, "widgets");
        assert_eq!(events[0].pr_number, None);
    }

    #[test]
    fn test_tag_create_ignored() {
        let mut envelope = base_envelope();
        envelope["ref"] = "v1.0".into();
        envelope["ref_type"] = "tag".into();

        let events = classify("create", &payload(envelope)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_branch_delete_classified() {
        let mut envelope = base_envelope();
        envelope["ref"] = "wip-thing".into();
        envelope["ref_type"] = "branch".into();

        let events = classify("delete", &payload(envelope)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, BranchEventKind::Deleted);
        assert_eq!(events[0].branch, "wip-thing");
    }

    #[test]
    fn test_pull_request_classified() {
        let mut envelope = base_envelope();
        envelope["pull_request"] =
            serde_json::json!({ "number": 42, "head": { "ref": "WIP-bad" } });

        let events = classify("pull_request", &payload(envelope)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, BranchEventKind::PullRequestUpdated);
        assert_eq!(events[0].branch, "WIP-bad");
        assert_eq!(events[0].pr_number, Some(42));
    }

    #[test]
    fn test_checks_are_independent_not_exclusive() {
        // A create delivery that also carries a pull_request object
        // yields both events, created first.
        let mut envelope = base_envelope();
        envelope["ref"] = "feature/ok".into();
        envelope["ref_type"] = "branch".into();
        envelope["pull_request"] =
            serde_json::json!({ "number": 7, "head": { "ref": "WIP-bad" } });

        let events = classify("create", &payload(envelope)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, BranchEventKind::Created);
        assert_eq!(events[1].kind, BranchEventKind::PullRequestUpdated);
    }

    #[test]
    fn test_missing_repository_is_fatal() {
        let envelope = serde_json::json!({ "sender": { "login": "octocat" } });
        assert!(classify("create", &payload(envelope)).is_err());
    }

    #[test]
    fn test_missing_sender_is_fatal() {
        let envelope = serde_json::json!({
            "repository": { "name": "widgets", "owner": { "login": "acme" } }
        });
        assert!(classify("create", &payload(envelope)).is_err());
    }

    #[test]
    fn test_branch_create_without_ref_is_fatal() {
        let mut envelope = base_envelope();
        envelope["ref_type"] = "branch".into();
        assert!(classify("create", &payload(envelope)).is_err());
    }

    #[test]
    fn test_unrelated_event_yields_nothing() {
        let events = classify("push", &payload(base_envelope())).unwrap();
        assert!(events.is_empty());
    }
}

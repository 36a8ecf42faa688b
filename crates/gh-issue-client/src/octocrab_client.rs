//! Octocrab-based issue tracker client
//!
//! Direct implementation of the `IssueTracker` trait using the octocrab
//! library. Issue creation uses the REST API; listing and deletion use
//! GraphQL, since `deleteIssue` is GraphQL-only and needs the node id.

use crate::client::IssueTracker;
use crate::types::{IssuePage, IssueRef, NewIssue};
use crate::ISSUE_PAGE_SIZE;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::Deserialize;
use std::sync::Arc;

/// Direct GitHub issue client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabIssueClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabIssueClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Create a new client authenticated with a personal/installation token
    pub fn from_token(token: &str) -> anyhow::Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self::new(Arc::new(octocrab)))
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

/// GraphQL wire shape of one issues page
#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Vec<IssueNode>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    title: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
}

#[async_trait]
impl IssueTracker for OctocrabIssueClient {
    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<IssueRef> {
        debug!("Creating issue '{}' in {}/{}", issue.title, owner, repo);

        let issues = self.octocrab.issues(owner, repo);
        let mut request = issues.create(&issue.title).body(&issue.body);
        if let Some(assignee) = &issue.assignee {
            request = request.assignees(vec![assignee.clone()]);
        }
        let created = request.send().await?;

        Ok(IssueRef {
            id: created.node_id,
            title: created.title,
        })
    }

    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> anyhow::Result<IssuePage> {
        debug!(
            "Listing open issues for {}/{} (cursor: {:?})",
            owner, repo, cursor
        );

        let after = match cursor {
            Some(c) => format!(", after: \"{}\"", c),
            None => String::new(),
        };
        let query = format!(
            r#"query {{
                repository(owner: "{}", name: "{}") {{
                    issues(first: {}, states: OPEN{}) {{
                        nodes {{
                            title
                            id
                        }}
                        pageInfo {{
                            endCursor
                            hasNextPage
                        }}
                    }}
                }}
            }}"#,
            owner, repo, ISSUE_PAGE_SIZE, after
        );

        let response: serde_json::Value = self.octocrab.graphql(&query).await?;
        if let Some(errors) = response.get("errors") {
            return Err(anyhow::anyhow!("GraphQL error: {}", errors));
        }

        let connection: IssueConnection =
            serde_json::from_value(response["data"]["repository"]["issues"].clone())?;

        Ok(convert_issue_page(connection))
    }

    async fn delete_issue(&self, issue_id: &str) -> anyhow::Result<()> {
        debug!("Deleting issue {}", issue_id);

        let query = format!(
            r#"mutation {{
                deleteIssue(input: {{ issueId: "{}" }}) {{
                    clientMutationId
                }}
            }}"#,
            issue_id
        );

        let response: serde_json::Value = self.octocrab.graphql(&query).await?;
        if let Some(errors) = response.get("errors") {
            return Err(anyhow::anyhow!("GraphQL error: {}", errors));
        }

        Ok(())
    }

    async fn is_assignable(
        &self,
        owner: &str,
        repo: &str,
        login: &str,
    ) -> anyhow::Result<bool> {
        debug!("Checking assignability of {} in {}/{}", login, owner, repo);

        // 204 means assignable, 404 means not. The raw request avoids a
        // JSON parse of the empty 204 body.
        let route = format!("/repos/{}/{}/assignees/{}", owner, repo, login);
        match self.octocrab._get(route).await {
            Ok(response) => match response.status().as_u16() {
                204 => Ok(true),
                404 => Ok(false),
                status => Err(anyhow::anyhow!(
                    "Unexpected status {} checking assignability of {}",
                    status,
                    login
                )),
            },
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code.as_u16() == 404 =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Convert the GraphQL connection into our page type
fn convert_issue_page(connection: IssueConnection) -> IssuePage {
    IssuePage {
        issues: connection
            .nodes
            .into_iter()
            .map(|node| IssueRef {
                id: node.id,
                title: node.title,
            })
            .collect(),
        end_cursor: connection.page_info.end_cursor,
        has_next_page: connection.page_info.has_next_page,
    }
}

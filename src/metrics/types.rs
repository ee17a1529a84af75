use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub name_with_owner: String,
    pub pushed_at: Option<String>,
    pub default_branch_ref: Option<BranchRef>,
    #[serde(default)]
    pub languages: Languages,
    #[serde(default)]
    pub issues: Activity<Issue>,
    #[serde(default)]
    pub pull_requests: Activity<PullRequest>,
}

impl RepositoryRecord {
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        match self.name_with_owner.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Some((owner, name))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRef {
    pub name: String,
    pub target: Option<HeadCommit>,
}

// Fields stay empty when the target is not a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadCommit {
    pub id: Option<String>,
    pub authored_date: Option<String>,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Languages {
    #[serde(default)]
    pub nodes: Vec<Option<LanguageNode>>,
    #[serde(default)]
    pub edges: Vec<Option<LanguageEdge>>,
}

impl Languages {
    // Null entries keep their position, so nodes and edges stay aligned.
    pub fn sizes(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.nodes
            .iter()
            .zip(&self.edges)
            .filter_map(|pair| match pair {
                (Some(node), Some(edge)) => Some((node.name.as_str(), edge.size)),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEdge {
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

impl<T> Default for Activity<T> {
    fn default() -> Self {
        Activity { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub number: u64,
    pub author: Option<Actor>,
    pub last_edited_at: Option<String>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub author: Option<Actor>,
    pub last_edited_at: Option<String>,
    pub created_at: Option<String>,
    pub merged_at: Option<String>,
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub remaining: u64,
    pub reset_at: String,
}

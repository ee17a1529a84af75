pub const ORGANIZATIONS_PAGE_SIZE: u64 = 100;

// One repository per page keeps each response small.
pub const REPOSITORY_PAGE_SIZE: u64 = 1;

pub const ORGANIZATIONS: &str = r#"
query paginate($cursor: String, $pageSize: Int!) {
  organizations(first: $pageSize, after: $cursor) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      login
    }
  }
}
"#;

pub const ORGANIZATION_METRICS: &str = r#"
query paginate($cursor: String, $login: String!, $pageSize: Int!, $depth: Int!) {
  organization(login: $login) {
    login
    repositories(first: $pageSize, after: $cursor) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        nameWithOwner
        pushedAt
        defaultBranchRef {
          name
          target {
            ... on Commit {
              id
              authoredDate
              author {
                name
                date
              }
            }
          }
        }
        languages(first: $depth) {
          nodes {
            name
          }
          edges {
            size
          }
        }
        issues(last: $depth) {
          nodes {
            number
            author {
              login
            }
            lastEditedAt
            createdAt
            closedAt
          }
        }
        pullRequests(last: $depth) {
          nodes {
            number
            author {
              login
            }
            lastEditedAt
            createdAt
            mergedAt
            closedAt
          }
        }
      }
    }
  }
  rateLimit {
    remaining
    resetAt
  }
}
"#;

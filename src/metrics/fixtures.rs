use serde_json::{json, Value};

pub fn repository_json(name_with_owner: &str) -> Value {
    json!({
        "nameWithOwner": name_with_owner,
        "pushedAt": "2024-03-01T12:00:00Z",
        "defaultBranchRef": {
            "name": "main",
            "target": {
                "id": "C_kwDOAbc",
                "authoredDate": "2024-03-01T11:58:00Z",
                "author": { "name": "Ada", "date": "2024-03-01T11:58:00Z" }
            }
        },
        "languages": {
            "nodes": [{ "name": "Rust" }, { "name": "Shell" }],
            "edges": [{ "size": 12000 }, { "size": 340 }]
        },
        "issues": {
            "nodes": [{
                "number": 7,
                "author": { "login": "ada" },
                "lastEditedAt": null,
                "createdAt": "2024-02-01T09:00:00Z",
                "closedAt": null
            }]
        },
        "pullRequests": {
            "nodes": [{
                "number": 8,
                "author": null,
                "lastEditedAt": null,
                "createdAt": "2024-02-02T09:00:00Z",
                "mergedAt": "2024-02-03T09:00:00Z",
                "closedAt": "2024-02-03T09:00:00Z"
            }]
        }
    })
}

pub fn metrics_page(
    login: &str,
    repositories: Vec<Value>,
    has_next_page: bool,
    cursor: &str,
) -> Value {
    json!({
        "organization": {
            "login": login,
            "repositories": {
                "pageInfo": { "hasNextPage": has_next_page, "endCursor": cursor },
                "nodes": repositories
            }
        },
        "rateLimit": { "remaining": 4999, "resetAt": "2024-03-01T13:00:00Z" }
    })
}

pub fn organizations_page(logins: &[&str], has_next_page: bool, cursor: &str) -> Value {
    let nodes: Vec<Value> = logins.iter().map(|login| json!({ "login": login })).collect();

    json!({
        "organizations": {
            "pageInfo": { "hasNextPage": has_next_page, "endCursor": cursor },
            "nodes": nodes
        }
    })
}

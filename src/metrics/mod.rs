#[cfg(test)]
pub mod fixtures;
mod query;
mod types;

pub use types::{RateLimit, RepositoryRecord};

use crate::graphql::{paginate, Transport, TransportError, Variables};
use query::{ORGANIZATIONS, ORGANIZATIONS_PAGE_SIZE, ORGANIZATION_METRICS, REPOSITORY_PAGE_SIZE};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

pub const DEFAULT_DEPTH: u8 = 10;

#[derive(Debug)]
pub struct OrgMetrics {
    pub organization_login: String,
    pub repositories: Vec<RepositoryRecord>,
    pub malformed: usize,
    pub rate_limit: Option<RateLimit>,
}

#[derive(Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> Vec<T> {
        self.nodes.into_iter().flatten().collect()
    }
}

#[derive(Deserialize)]
struct OrganizationsResponse {
    organizations: Connection<OrganizationNode>,
}

#[derive(Deserialize)]
struct OrganizationNode {
    login: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgMetricsResponse {
    organization: Option<OrganizationRepositories>,
    rate_limit: Option<RateLimit>,
}

#[derive(Deserialize)]
struct OrganizationRepositories {
    login: String,
    repositories: Connection<Value>,
}

/// An empty result means either no visible organization or a failed listing.
pub async fn list_organizations<T>(transport: &T) -> Vec<String>
where
    T: Transport + ?Sized,
{
    let mut variables = Variables::new();
    variables.insert("pageSize".to_owned(), json!(ORGANIZATIONS_PAGE_SIZE));

    let listed = match paginate(transport, ORGANIZATIONS, &variables).await {
        Ok(data) => decode::<OrganizationsResponse>(data),
        Err(err) => Err(err),
    };

    match listed {
        Ok(response) => {
            let logins: Vec<String> = response
                .organizations
                .into_nodes()
                .into_iter()
                .map(|org| org.login)
                .collect();
            log::info!("Found {} organizations", logins.len());
            logins
        }
        Err(err) => {
            log::error!("Cannot list organizations: {}", err);
            Vec::new()
        }
    }
}

pub async fn fetch_org_metrics<T>(
    transport: &T,
    login: &str,
    depth: u8,
) -> Result<OrgMetrics, TransportError>
where
    T: Transport + ?Sized,
{
    let mut variables = Variables::new();
    variables.insert("login".to_owned(), json!(login));
    variables.insert("pageSize".to_owned(), json!(REPOSITORY_PAGE_SIZE));
    variables.insert("depth".to_owned(), json!(depth));

    log::debug!("Fetching metrics for {}", login);

    let fetched = match paginate(transport, ORGANIZATION_METRICS, &variables).await {
        Ok(data) => decode::<OrgMetricsResponse>(data),
        Err(err) => Err(err),
    };

    let response = match fetched {
        Ok(response) => response,
        Err(err) => {
            log::error!("Cannot fetch metrics for {}: {}", login, err);
            return Err(err);
        }
    };

    let Some(organization) = response.organization else {
        log::error!("Organization {} was not found", login);
        return Err(TransportError::Malformed(format!(
            "organization {} not found",
            login
        )));
    };

    if let Some(rate_limit) = &response.rate_limit {
        log::debug!(
            "{}: {} calls remaining, resets at {}",
            login,
            rate_limit.remaining,
            rate_limit.reset_at
        );
    }

    let nodes = organization.repositories.into_nodes();
    let mut repositories = Vec::with_capacity(nodes.len());
    let mut malformed = 0;

    for node in nodes {
        let name = node
            .get("nameWithOwner")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_owned();

        match serde_json::from_value::<RepositoryRecord>(node) {
            Ok(record) => repositories.push(record),
            Err(err) => {
                log::error!("Skipping malformed repository {}: {}", name, err);
                malformed += 1;
            }
        }
    }

    Ok(OrgMetrics {
        organization_login: organization.login,
        repositories,
        malformed,
        rate_limit: response.rate_limit,
    })
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, TransportError> {
    serde_json::from_value(data).map_err(|err| TransportError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::fake::FakeTransport;
    use anyhow::Result;
    use super::fixtures::{metrics_page, organizations_page, repository_json};

    #[tokio::test]
    async fn should_list_organizations_across_pages() {
        let transport = FakeTransport::pages(vec![
            Ok(organizations_page(&["acme", "globex"], true, "o1")),
            Ok(organizations_page(&["initech"], false, "o2")),
        ]);

        let orgs = list_organizations(&transport).await;

        assert_eq!(orgs, vec!["acme", "globex", "initech"]);
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0]["pageSize"], json!(100));
        assert_eq!(calls[1]["cursor"], json!("o1"));
    }

    #[tokio::test]
    async fn should_return_no_organizations_when_listing_fails() {
        let transport = FakeTransport::pages(vec![
            Ok(organizations_page(&["acme"], true, "o1")),
            Err(TransportError::Graphql("boom".to_owned())),
        ]);

        let orgs = list_organizations(&transport).await;

        assert!(orgs.is_empty());
    }

    #[tokio::test]
    async fn should_fetch_every_repository_page() -> Result<()> {
        let transport = FakeTransport::pages(vec![
            Ok(metrics_page("acme", vec![repository_json("acme/one")], true, "r1")),
            Ok(metrics_page("acme", vec![repository_json("acme/two")], false, "r2")),
        ]);

        let metrics = fetch_org_metrics(&transport, "acme", 5).await?;

        assert_eq!(metrics.organization_login, "acme");
        let names: Vec<&str> = metrics
            .repositories
            .iter()
            .map(|repo| repo.name_with_owner.as_str())
            .collect();
        assert_eq!(names, vec!["acme/one", "acme/two"]);
        assert_eq!(metrics.rate_limit.map(|limit| limit.remaining), Some(4999));

        for call in transport.calls() {
            assert_eq!(call["login"], json!("acme"));
            assert_eq!(call["depth"], json!(5));
            assert_eq!(call["pageSize"], json!(1));
        }

        Ok(())
    }

    #[tokio::test]
    async fn should_return_empty_repositories_for_empty_organization() -> Result<()> {
        let transport = FakeTransport::pages(vec![Ok(metrics_page("acme", vec![], false, ""))]);

        let metrics = fetch_org_metrics(&transport, "acme", DEFAULT_DEPTH).await?;

        assert!(metrics.repositories.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn should_report_transport_failure() {
        let transport = FakeTransport::pages(vec![Err(TransportError::Status {
            status: 403,
            message: "forbidden".to_owned(),
        })]);

        let result = fetch_org_metrics(&transport, "acme", DEFAULT_DEPTH).await;

        assert!(matches!(
            result,
            Err(TransportError::Status { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn should_skip_malformed_repository_and_keep_siblings() -> Result<()> {
        let mut broken = repository_json("acme/two");
        broken["issues"]["nodes"] = json!([{ "number": "seven" }]);
        let transport = FakeTransport::pages(vec![Ok(metrics_page(
            "acme",
            vec![
                repository_json("acme/one"),
                broken,
                json!({ "pushedAt": "2024-01-01T00:00:00Z" }),
                repository_json("acme/three"),
            ],
            false,
            "r1",
        ))]);

        let metrics = fetch_org_metrics(&transport, "acme", DEFAULT_DEPTH).await?;

        let names: Vec<&str> = metrics
            .repositories
            .iter()
            .map(|repo| repo.name_with_owner.as_str())
            .collect();
        assert_eq!(names, vec!["acme/one", "acme/three"]);
        assert_eq!(metrics.malformed, 2);

        Ok(())
    }
}

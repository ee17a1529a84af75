use super::{Transport, TransportError, Variables};
use crate::http::{
    response::{AsyncFrom, GraphqlResponse, Response},
    Headers, HttpClient,
};
use async_trait::async_trait;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a Variables,
}

#[derive(Clone)]
pub struct GraphqlClient {
    http: HttpClient,
    endpoint: String,
    token: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        GraphqlClient {
            http: HttpClient::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Transport for GraphqlClient {
    async fn execute(&self, query: &str, variables: &Variables) -> Result<Value, TransportError> {
        let request = GraphqlRequest { query, variables };

        let response = self
            .http
            .post(self.endpoint.as_str())
            .default_headers(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|cause| TransportError::Network { cause })?;

        let body = Response::<GraphqlResponse>::async_from(response)
            .await
            .collect()?;

        if !body.errors.is_empty() {
            let messages = body.errors.iter().map(|error| &error.message).join("; ");
            return Err(TransportError::Graphql(messages));
        }

        body.data
            .ok_or_else(|| TransportError::Malformed("response has no data".to_owned()))
    }
}

mod client;
mod error;
#[cfg(test)]
pub mod fake;
mod paginator;

pub use client::GraphqlClient;
pub use error::TransportError;
pub use paginator::paginate;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub type Variables = Map<String, Value>;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, query: &str, variables: &Variables) -> Result<Value, TransportError>;
}

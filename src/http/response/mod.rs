mod graphql_response;
mod state;

pub use graphql_response::GraphqlResponse;
pub use state::AsyncFrom;
pub use state::Response;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {cause}")]
    Network {
        #[source]
        cause: reqwest::Error,
    },
    #[error("Server answered with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Query failed: {0}")]
    Graphql(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("No pageInfo property found in response")]
    MissingPageInfo,
    #[error("Cursor did not advance past {0:?} while hasNextPage is true")]
    CursorNotAdvanced(Option<String>),
}

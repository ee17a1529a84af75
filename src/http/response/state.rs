use crate::graphql::TransportError;

use serde::de::DeserializeOwned;

pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

pub enum Response<T> {
    Success(T),
    Error(ErrorResponse),
    Unreadable(String),
}

impl<T> Response<T> {
    pub fn collect(self) -> Result<T, TransportError> {
        match self {
            Response::Success(payload) => Ok(payload),
            Response::Error(response) => Err(TransportError::Status {
                status: response.status,
                message: response.message,
            }),
            Response::Unreadable(message) => Err(TransportError::Malformed(message)),
        }
    }
}

pub trait AsyncFrom<T>: Sized {
    async fn async_from(value: T) -> Self;
}

impl<T> AsyncFrom<reqwest::Response> for Response<T>
where
    T: DeserializeOwned,
{
    async fn async_from(value: reqwest::Response) -> Self {
        let status = value.status().as_u16();

        let text = match value.text().await {
            Ok(text) => text,
            Err(err) => {
                return Response::Unreadable(format!("Failed to read response text: {}", err));
            }
        };

        if !(200..300).contains(&status) {
            return Response::Error(ErrorResponse {
                status,
                message: text,
            });
        }

        match serde_json::from_str::<T>(&text) {
            Ok(payload) => Response::Success(payload),
            Err(err) => Response::Unreadable(format!("Failed to parse json: {}", err)),
        }
    }
}

//! Client-side pieces of the catalog: image preparation, form state and the HTTP client.

use derive_more::Display;

pub mod api;
pub mod image_prep;
pub mod review_form;
pub mod upload_form;

/// Fallback shown when the server gives no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Display)]
pub enum ClientError {
    #[display("Image decode failed: {_0}")]
    ImageDecode(String),

    #[display("Image encode failed: {_0}")]
    ImageEncode(String),

    #[display("Server responded with status {status}")]
    Server { status: u16, message: Option<String> },

    #[display("Request failed: {_0}")]
    Transport(String),

    #[display("Invalid base URL: {_0}")]
    InvalidUrl(String),

    #[display("{_0}")]
    Form(String),
}

impl std::error::Error for ClientError {}

impl ClientError {
    /// Server-reported message when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Form(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

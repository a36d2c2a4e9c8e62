// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Creates HTTP clients that identify themselves with a consistent user agent.
#[derive(Clone, Debug)]
pub struct HTTPClientFactory {
    user_agent: String,
}

impl HTTPClientFactory {
    /// Creates a new factory for clients identifying as `name` at `version`.
    pub fn new(name: &str, version: &str) -> Self {
        let user_agent = format!("{name} v{version}");
        Self { user_agent }
    }

    /// An appropriate user agent to use when making HTTP requests.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Creates a new HTTP client.
    ///
    /// Returns an error if a TLS backend cannot be initialized.
    pub fn create(&self) -> HTTPResult<Client> {
        Ok(ClientBuilder::new().user_agent(&self.user_agent).build()?)
    }
}

impl Default for HTTPClientFactory {
    /// A factory for clients identifying as this program.
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request or reading
    /// its response.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// An error that occurred while trying to serialize a POST body.
    #[error("Error serializing POST body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    ///
    /// `message` is the API's explanation of the failure, if it gave one,
    /// or else the (possibly truncated) response body.
    #[error("Request returned HTTP {status}: {message}")]
    Http {
        /// Status code of the response.
        status: StatusCode,

        /// What went wrong, according to the server.
        message: String,
    },

    /// A response body that could not be decoded into the expected type.
    #[error("Error decoding response body: {source} - body: {body}")]
    Decode {
        /// The decoding error.
        #[source]
        source: serde_json::Error,

        /// The (possibly truncated) response body.
        body: String,
    },
}

impl HTTPError {
    /// Builds an error for a non-success `status`, pulling a message out of
    /// the response `body` if the API supplied one.
    ///
    /// # Examples
    ///
    /// ```
    /// use reqwest::StatusCode;
    /// use skypost::http::HTTPError;
    ///
    /// let body = r#"{"error": "AuthenticationRequired", "message": "Invalid identifier or password"}"#;
    /// let err = HTTPError::from_status(StatusCode::UNAUTHORIZED, body);
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Request returned HTTP 401 Unauthorized: AuthenticationRequired: Invalid identifier or password",
    /// );
    /// ```
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                error: Some(error),
                message: Some(message),
            }) => format!("{error}: {message}"),
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorBody {
                error: Some(error), ..
            }) => error,
            _ => truncate_body(body),
        };
        HTTPError::Http { status, message }
    }

    /// Builds an error for a body that could not be decoded.
    pub fn decode(source: serde_json::Error, body: &str) -> Self {
        let body = truncate_body(body);
        HTTPError::Decode { source, body }
    }

    /// The HTTP status of the response that caused this error, if the
    /// server responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HTTPError::Request(err) => err.status(),
            HTTPError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The body of an XRPC error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Maximum length for response bodies quoted in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncates a response body so errors do not dump an entire page.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! XRPC connector for the Bluesky API.
//!
//! Service structures in this module provide a low-level way to call
//! XRPC methods over HTTPS, essentially a specialized HTTPS client for
//! Bluesky. Higher-level clients such as [`Client`](crate::bsky::Client)
//! are built on top of them.

use crate::conf;
use crate::http::{HTTPClientFactory, HTTPError, HTTPResult};
use log::{debug, error};
use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A service for calling XRPC procedures.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Bluesky API, such as an actual connector for production code,
/// and a deterministic connector for testing purposes.
pub trait Service {
    /// Calls the procedure `nsid` with the JSON object `data` as the
    /// request body.
    ///
    /// If `token` is given, it is sent as a bearer token. The response
    /// is deserialized into the JSON object specified by the `R` type
    /// parameter.
    fn post_json<D, R>(
        &self,
        nsid: &str,
        token: Option<&str>,
        data: &D,
    ) -> impl Future<Output = HTTPResult<R>> + Send
    where
        D: Serialize + Sync,
        R: DeserializeOwned;

    /// Calls the procedure `nsid` with raw `bytes` as the request body,
    /// labeled with the given `content_type`.
    ///
    /// `token` is always sent as a bearer token, since every procedure
    /// that accepts raw bytes requires authentication.
    fn post_bytes<R>(
        &self,
        nsid: &str,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = HTTPResult<R>> + Send
    where
        R: DeserializeOwned;
}

/// A service that contacts the Bluesky API directly.
#[derive(Debug)]
pub struct HTTPService {
    client: Client,
    host: String,
}

impl HTTPService {
    /// Creates a new service talking to the API at `host`, using clients
    /// from the given factory.
    pub fn new(host: impl Into<String>, factory: &HTTPClientFactory) -> HTTPResult<Self> {
        let host = host.into();
        let client = factory.create()?;
        Ok(Self { client, host })
    }

    /// The API origin this service talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn request(&self, nsid: &str) -> RequestBuilder {
        let uri = conf::xrpc_uri(&self.host, nsid);
        debug!("POST {uri}");
        self.client.post(uri)
    }

    /// Builds a JSON request. No timeout is set, so the request waits as
    /// long as the server takes.
    fn json_request<D: Serialize>(
        &self,
        nsid: &str,
        token: Option<&str>,
        data: &D,
    ) -> HTTPResult<RequestBuilder> {
        let body = serde_json::to_vec(data).map_err(HTTPError::Serialization)?;
        let request = self
            .request(nsid)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(body);
        Ok(match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Builds a raw upload request, abandoned after [`conf::UPLOAD_TIMEOUT`].
    fn bytes_request(
        &self,
        nsid: &str,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> RequestBuilder {
        self.request(nsid)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .timeout(conf::UPLOAD_TIMEOUT)
            .body(bytes)
    }

    async fn send<R>(nsid: &str, request: RequestBuilder) -> HTTPResult<R>
    where
        R: DeserializeOwned,
    {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            error!("{nsid} failed with HTTP {status}: {body}");
            Err(HTTPError::from_status(status, &body))
        } else {
            serde_json::from_str(&body).map_err(|err| HTTPError::decode(err, &body))
        }
    }
}

impl Service for HTTPService {
    // These are covered by the integration tests under tests/.
    async fn post_json<D, R>(&self, nsid: &str, token: Option<&str>, data: &D) -> HTTPResult<R>
    where
        D: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = self.json_request(nsid, token, data)?;
        Self::send(nsid, request).await
    }

    async fn post_bytes<R>(
        &self,
        nsid: &str,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> HTTPResult<R>
    where
        R: DeserializeOwned,
    {
        let request = self.bytes_request(nsid, token, content_type, bytes);
        Self::send(nsid, request).await
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authenticated sessions.

use crate::auth::Credentials;
use crate::bsky::service::Service;
use crate::clock::{DateTime, Utc};
use crate::http::HTTPResult;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// XRPC procedure that exchanges credentials for a session.
pub const CREATE_SESSION: &str = "com.atproto.server.createSession";

/// An authenticated session with the Bluesky API.
///
/// A session lasts only as long as the process that created it. It is
/// never written to disk.
pub struct Session {
    access_jwt: String,
    refresh_jwt: String,
    handle: String,
    did: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Opens a new session by sending `credentials` to `service`.
    ///
    /// Any failure, whether the server could not be reached, refused the
    /// credentials, or sent back something unexpected, is returned as is.
    /// Nothing is retried.
    pub async fn create<S: Service>(service: &S, credentials: &Credentials) -> HTTPResult<Self> {
        debug!("creating session for {}", credentials.identifier());
        let request = CreateSessionRequest {
            identifier: credentials.identifier(),
            password: credentials.password(),
        };
        let resp: CreateSessionResponse = service.post_json(CREATE_SESSION, None, &request).await?;
        let session = Session::from(resp);
        info!("logged in as {} ({})", session.handle(), session.did());
        Ok(session)
    }

    /// The bearer token used to authenticate further requests.
    pub fn access_jwt(&self) -> &str {
        &self.access_jwt
    }

    /// The token that can be exchanged for a new access token.
    pub fn refresh_jwt(&self) -> &str {
        &self.refresh_jwt
    }

    /// The account's handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// The account's decentralized identifier, which also names the
    /// account's repository.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// When the access token expires, if that could be determined.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session {{ handle = {}, did = {}, expires_at = {:?} }}",
            self.handle, self.did, self.expires_at
        )
    }
}

impl From<CreateSessionResponse> for Session {
    fn from(resp: CreateSessionResponse) -> Self {
        let expires_at = jwt_expiry(&resp.access_jwt);
        Self {
            access_jwt: resp.access_jwt,
            refresh_jwt: resp.refresh_jwt,
            handle: resp.handle,
            did: resp.did,
            expires_at,
        }
    }
}

/// Body of a `com.atproto.server.createSession` request.
#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

/// Body of a `com.atproto.server.createSession` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    refresh_jwt: String,
    handle: String,
    did: String,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Reads the `exp` claim out of a JWT without verifying it.
///
/// The token is only ever handed back to the server that issued it, so
/// the expiry is informational.
fn jwt_expiry(jwt: &str) -> Option<DateTime<Utc>> {
    let payload = jwt.split('.').nth(1)?;
    let payload = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&payload).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

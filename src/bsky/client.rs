// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for writing posts with the Bluesky API.

use crate::auth::{AuthError, Credentials};
use crate::bsky::blob::BlobError;
use crate::bsky::post::Draft;
use crate::bsky::record::{
    CreateRecordRequest, CreateRecordResponse, Embed, Image, PostRecord, Record,
};
use crate::bsky::service::{HTTPService, Service};
use crate::bsky::session::Session;
use crate::clock::{Clock, SystemClock};
use crate::http::{HTTPClientFactory, HTTPError};
use log::info;
use thiserror::Error;

/// XRPC procedure that stores a record in a repository.
pub const CREATE_RECORD: &str = "com.atproto.repo.createRecord";

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials could not be found.
    #[error("Credentials error: {0}")]
    Credentials(#[from] AuthError),

    /// A session could not be opened.
    #[error("Authentication error: {0}")]
    Auth(#[source] HTTPError),

    /// An attached image could not be read or uploaded.
    #[error("Image error: {0}")]
    Image(#[from] BlobError),

    /// The post could not be created.
    #[error("Post error: {0}")]
    Post(#[source] HTTPError),

    /// There was nothing to post.
    #[error("You must provide either text content or an image to post")]
    EmptyPost,
}

/// A post that has been stored by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedPost {
    uri: String,
    cid: String,
}

impl CreatedPost {
    /// Describes a post stored at `uri` whose record hashes to `cid`.
    pub fn new(uri: impl Into<String>, cid: impl Into<String>) -> Self {
        let uri = uri.into();
        let cid = cid.into();
        Self { uri, cid }
    }

    /// The post's `at://` URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The content hash of the post record.
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// The record key, the last segment of the post's URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use skypost::bsky::CreatedPost;
    /// let post = CreatedPost::new("at://did:plc:abc/app.bsky.feed.post/3lpvxhzkmds2c", "bafyrei");
    /// assert_eq!(post.rkey(), "3lpvxhzkmds2c");
    /// ```
    pub fn rkey(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or_default()
    }

    /// A link to the post on the Bluesky website.
    pub fn web_url(&self, handle: &str) -> String {
        format!("https://bsky.app/profile/{handle}/post/{}", self.rkey())
    }
}

impl From<CreateRecordResponse> for CreatedPost {
    fn from(resp: CreateRecordResponse) -> Self {
        Self::new(resp.uri, resp.cid)
    }
}

/// A logged-in Bluesky account.
#[derive(Debug)]
pub struct Client<S: Service = HTTPService> {
    service: S,
    session: Session,
}

impl Client {
    /// Logs in to the API at `host` with the given `credentials`.
    ///
    /// Returns an [`enum@Error`] if the service cannot be reached or
    /// refuses the credentials.
    pub async fn login(host: &str, credentials: &Credentials) -> Result<Self, Error> {
        let service = HTTPService::new(host, &HTTPClientFactory::default()).map_err(Error::Auth)?;
        Self::login_with_service(service, credentials).await
    }
}

impl<S: Service> Client<S> {
    /// Logs in with the given `credentials`, using `service` to talk to the
    /// API.
    pub async fn login_with_service(service: S, credentials: &Credentials) -> Result<Self, Error> {
        let session = Session::create(&service, credentials)
            .await
            .map_err(Error::Auth)?;
        Ok(Self { service, session })
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Writes a new post, timestamped with the current time.
    pub async fn post(&self, draft: &Draft) -> Result<CreatedPost, Error> {
        self.post_at(draft, &SystemClock).await
    }

    /// Writes a new post, timestamped by `clock`.
    ///
    /// If the draft has an image, the image is uploaded first. If the
    /// upload succeeds but the post cannot be created, the uploaded image
    /// is left behind on the server.
    pub async fn post_at<C: Clock>(&self, draft: &Draft, clock: &C) -> Result<CreatedPost, Error> {
        let options = draft.options();
        let mut record = PostRecord::new(options.content(), clock.timestamp());
        if let Some(file) = draft.image() {
            let blob = file.upload(&self.service, &self.session).await?;
            let image = Image::new(options.alt(), blob).aspect_ratio(draft.aspect_ratio());
            record = record.embed(Embed::image(image));
        }
        let record = Record::Post(record);

        let request = CreateRecordRequest::new(self.session.did(), &record);
        let resp: CreateRecordResponse = self
            .service
            .post_json(CREATE_RECORD, Some(self.session.access_jwt()), &request)
            .await
            .map_err(Error::Post)?;

        info!("created post {} ({})", resp.uri, resp.cid);
        Ok(CreatedPost::from(resp))
    }
}

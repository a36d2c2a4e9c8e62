// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Records and blobs, as they are sent to and received from the API.
//!
//! Every field the API requires is a plain field here, and every field it
//! treats as optional is an [`Option`], so that a shape mismatch shows up
//! as a decoding error at the edge rather than as a missing value deep
//! inside the program.

use serde::{Deserialize, Serialize};

/// Collection that holds a user's posts.
pub const POST_COLLECTION: &str = "app.bsky.feed.post";

/// A record stored in a user's repository.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "$type")]
pub enum Record {
    /// A post in the user's feed.
    #[serde(rename = "app.bsky.feed.post")]
    Post(PostRecord),
}

impl Record {
    /// The collection in which this record is stored.
    pub fn collection(&self) -> &'static str {
        match self {
            Record::Post(_) => POST_COLLECTION,
        }
    }
}

/// The body of a post.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    text: String,

    created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    embed: Option<Embed>,
}

impl PostRecord {
    /// Creates a new post containing `text`, created at `created_at`.
    ///
    /// `created_at` should be formatted by [`clock::timestamp()`](crate::clock::timestamp).
    pub fn new(text: impl Into<String>, created_at: impl Into<String>) -> Self {
        let text = text.into();
        let created_at = created_at.into();
        Self {
            text,
            created_at,
            embed: None,
        }
    }

    /// Embeds `embed` in the post and returns the post.
    pub fn embed(self, embed: Embed) -> Self {
        let embed = Some(embed);
        Self { embed, ..self }
    }

    /// The text of the post.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the post was created.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Media embedded in the post, if any.
    pub fn embedded(&self) -> Option<&Embed> {
        self.embed.as_ref()
    }
}

/// Media embedded in a post.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "$type")]
pub enum Embed {
    /// One or more images.
    #[serde(rename = "app.bsky.embed.images")]
    Images {
        /// The embedded images.
        images: Vec<Image>,
    },
}

impl Embed {
    /// An embed consisting of a single image.
    pub fn image(image: Image) -> Self {
        let images = vec![image];
        Embed::Images { images }
    }
}

/// An image embedded in a post.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    alt: String,

    image: BlobRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<AspectRatio>,
}

impl Image {
    /// Creates an image from an uploaded `blob` described by `alt`.
    pub fn new(alt: impl Into<String>, blob: BlobRef) -> Self {
        let alt = alt.into();
        Self {
            alt,
            image: blob,
            aspect_ratio: None,
        }
    }

    /// Sets the image's aspect ratio and returns the image.
    pub fn aspect_ratio(self, aspect_ratio: Option<AspectRatio>) -> Self {
        Self {
            aspect_ratio,
            ..self
        }
    }

    /// Alt text for the image.
    pub fn alt(&self) -> &str {
        &self.alt
    }

    /// The uploaded image data.
    pub fn blob(&self) -> &BlobRef {
        &self.image
    }
}

/// The width and height of an image, used by clients to lay out a post
/// before the image has loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AspectRatio {
    /// Width, in pixels.
    pub width: u32,

    /// Height, in pixels.
    pub height: u32,
}

impl AspectRatio {
    /// Builds an aspect ratio from pixel dimensions.
    ///
    /// Returns `None` if either dimension is zero or too large to
    /// represent, since the API rejects such ratios.
    pub fn from_dimensions(width: usize, height: usize) -> Option<Self> {
        let width = u32::try_from(width).ok().filter(|w| *w > 0)?;
        let height = u32::try_from(height).ok().filter(|h| *h > 0)?;
        Some(Self { width, height })
    }
}

/// A reference to a blob stored by the service.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobRef {
    #[serde(rename = "$type", default)]
    kind: BlobKind,

    #[serde(rename = "ref")]
    link: CidLink,

    mime_type: String,

    size: u64,
}

impl BlobRef {
    /// Creates a reference to the blob with content hash `cid`.
    pub fn new(cid: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        let link = CidLink { link: cid.into() };
        let mime_type = mime_type.into();
        Self {
            kind: BlobKind::Blob,
            link,
            mime_type,
            size,
        }
    }

    /// The content hash of the blob.
    pub fn cid(&self) -> &str {
        &self.link.link
    }

    /// The blob's MIME type, as recorded by the service.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The blob's size in bytes, as recorded by the service.
    pub fn size(&self) -> u64 {
        self.size
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
enum BlobKind {
    #[default]
    #[serde(rename = "blob")]
    Blob,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
struct CidLink {
    #[serde(rename = "$link")]
    link: String,
}

/// Body of a `com.atproto.repo.createRecord` request.
#[derive(Debug, Serialize)]
pub struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'static str,
    record: &'a Record,
}

impl<'a> CreateRecordRequest<'a> {
    /// A request to store `record` in the repository belonging to `did`.
    pub fn new(did: &'a str, record: &'a Record) -> Self {
        let collection = record.collection();
        Self {
            repo: did,
            collection,
            record,
        }
    }
}

/// Body of a `com.atproto.repo.createRecord` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CreateRecordResponse {
    /// The `at://` URI of the new record.
    pub uri: String,

    /// The content hash of the new record.
    pub cid: String,
}

/// Body of a `com.atproto.repo.uploadBlob` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadBlobResponse {
    /// The stored blob.
    pub blob: BlobRef,
}

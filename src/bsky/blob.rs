// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Image uploads.
//!
//! Images are stored by the service as _blobs_, opaque binary data
//! referenced by content hash. A post refers to an image by embedding the
//! [`BlobRef`] returned when the image is uploaded.

use crate::bsky::record::{AspectRatio, BlobRef, UploadBlobResponse};
use crate::bsky::service::Service;
use crate::bsky::session::Session;
use crate::conf;
use crate::http::HTTPError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// XRPC procedure that stores a blob.
pub const UPLOAD_BLOB: &str = "com.atproto.repo.uploadBlob";

/// MIME type assumed for files whose extension is not recognized.
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Indicates an error reading or uploading an image.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The image does not exist.
    #[error("image file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The image exists but could not be read.
    #[error("cannot read image file {}: {source}", .path.display())]
    Unreadable {
        /// Location of the image.
        path: PathBuf,

        /// Why the image could not be read.
        #[source]
        source: io::Error,
    },

    /// The image is bigger than the service allows.
    #[error("image file size too large: {size} bytes ({max} bytes maximum)", max = conf::MAX_BLOB_SIZE)]
    TooLarge {
        /// Location of the image.
        path: PathBuf,

        /// Size of the image, in bytes.
        size: u64,
    },

    /// The service could not be reached or refused the upload.
    #[error("failed to upload image: {0}")]
    Upload(#[from] HTTPError),

    /// The service accepted the upload but did not say where it put it.
    #[error("invalid response: missing blob reference link")]
    MissingLink,
}

/// An image read from disk, ready to upload.
#[derive(Debug)]
pub struct ImageFile {
    path: PathBuf,
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl ImageFile {
    /// Reads the image at `path`.
    ///
    /// Returns an error if the file does not exist, cannot be read, or is
    /// larger than [`conf::MAX_BLOB_SIZE`]. The size is checked before the
    /// file is read, so an oversized file is never loaded into memory.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, BlobError> {
        let path = path.as_ref().to_path_buf();

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(BlobError::NotFound(path));
            }
            Err(source) => return Err(BlobError::Unreadable { path, source }),
        };
        check_size(&path, metadata.len())?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) => return Err(BlobError::Unreadable { path, source }),
        };
        // The file may have grown since we looked at it.
        check_size(&path, bytes.len() as u64)?;

        let mime_type = mime_type(&path);
        Ok(Self {
            path,
            bytes,
            mime_type,
        })
    }

    /// Where the image was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The image's size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The image's MIME type, as determined by its file extension.
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// The image's width and height in pixels, if they can be read from
    /// the image header.
    pub fn dimensions(&self) -> Result<AspectRatio, imagesize::ImageError> {
        let size = imagesize::blob_size(&self.bytes)?;
        AspectRatio::from_dimensions(size.width, size.height).ok_or(imagesize::ImageError::CorruptedImage)
    }

    /// Uploads the image using `service`, authenticated by `session`.
    ///
    /// Returns a reference to the stored blob, which can then be embedded
    /// in a post.
    pub async fn upload<S: Service>(&self, service: &S, session: &Session) -> Result<BlobRef, BlobError> {
        info!(
            "uploading {} ({} bytes, {})",
            self.path.display(),
            self.size(),
            self.mime_type
        );

        let resp: UploadBlobResponse = service
            .post_bytes(UPLOAD_BLOB, session.access_jwt(), self.mime_type, self.bytes.clone())
            .await?;

        if resp.blob.cid().is_empty() {
            return Err(BlobError::MissingLink);
        }

        info!("uploaded {} as {}", self.path.display(), resp.blob.cid());
        Ok(resp.blob)
    }
}

fn check_size(path: &Path, size: u64) -> Result<(), BlobError> {
    if size > conf::MAX_BLOB_SIZE {
        let path = path.to_path_buf();
        Err(BlobError::TooLarge { path, size })
    } else {
        Ok(())
    }
}

/// Determines the MIME type of an image from its file extension.
///
/// The extension is matched case-insensitively. Files with an unrecognized
/// extension, or none at all, are assumed to be [JPEGs](FALLBACK_MIME_TYPE).
///
/// # Examples
///
/// ```
/// use skypost::bsky::blob::mime_type;
/// assert_eq!(mime_type("cat.PNG"), "image/png");
/// assert_eq!(mime_type("cat.tiff"), "image/jpeg");
/// ```
pub fn mime_type(path: impl AsRef<Path>) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => FALLBACK_MIME_TYPE,
    }
}

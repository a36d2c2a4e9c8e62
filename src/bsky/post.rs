// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Composing posts.

use crate::bsky::blob::ImageFile;
use crate::bsky::client::Error;
use crate::bsky::record::AspectRatio;
use crate::conf;
use itertools::Itertools;
use log::warn;
use std::path::{Path, PathBuf};

/// Everything needed to write a post.
#[derive(Clone, Debug, PartialEq)]
pub struct PostOptions {
    text: String,
    hashtags: Vec<String>,
    image: Option<PathBuf>,
    alt: String,
}

impl PostOptions {
    /// Incrementally builds a new set of post options.
    ///
    /// # Examples
    ///
    /// ```
    /// use skypost::bsky::PostOptions;
    /// let opts = PostOptions::build()
    ///     .text("Hello")
    ///     .hashtags(["rust", "bluesky"])
    ///     .build();
    /// assert_eq!(opts.content(), "Hello #rust #bluesky");
    /// ```
    pub fn build() -> PostOptionsBuilder {
        PostOptionsBuilder::default()
    }

    /// The text of the post, as written by the user.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hashtags to append to the post.
    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// Path to an image to attach to the post.
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Alt text describing the attached image.
    pub fn alt(&self) -> &str {
        &self.alt
    }

    /// True if there is nothing to post: no text and no image.
    ///
    /// Hashtags alone do not make a post.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }

    /// The full text of the post, with hashtags appended.
    pub fn content(&self) -> String {
        compose(&self.text, &self.hashtags)
    }
}

/// A builder for post options.
///
/// You probably don't want to use this directly; call [`PostOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct PostOptionsBuilder {
    text: String,
    hashtags: Vec<String>,
    image: Option<PathBuf>,
    alt: Option<String>,
}

impl PostOptionsBuilder {
    /// Sets the text of the post.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the hashtags appended to the post.
    pub fn hashtags<I, S>(mut self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = hashtags.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches the image at `path`.
    ///
    /// An empty path is the same as no image at all.
    pub fn image(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.image = path
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty());
        self
    }

    /// Sets the alt text for the attached image.
    ///
    /// Defaults to [`conf::DEFAULT_ALT_TEXT`].
    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Builds the post options.
    pub fn build(self) -> PostOptions {
        let alt = self
            .alt
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or_else(|| conf::DEFAULT_ALT_TEXT.to_string());
        PostOptions {
            text: self.text,
            hashtags: self.hashtags,
            image: self.image,
            alt,
        }
    }
}

/// A post that is ready to send.
///
/// Everything that can be checked without talking to the service has been:
/// the post is not empty, and its image, if any, exists, is small enough,
/// and has been read into memory.
#[derive(Debug)]
pub struct Draft {
    options: PostOptions,
    image: Option<ImageFile>,
    aspect_ratio: Option<AspectRatio>,
}

impl Draft {
    /// Checks `options` and reads the attached image.
    ///
    /// Returns [`Error::EmptyPost`] if there is neither text nor an image,
    /// or an [`Error::Image`] if the image cannot be used. The image's
    /// dimensions are read on a best-effort basis; if they cannot be
    /// determined, the image is still posted, just without an aspect ratio.
    pub async fn prepare(options: PostOptions) -> Result<Self, Error> {
        if options.is_empty() {
            return Err(Error::EmptyPost);
        }

        let image = match options.image() {
            Some(path) => Some(ImageFile::open(path).await?),
            None => None,
        };

        let aspect_ratio = image.as_ref().and_then(|image| match image.dimensions() {
            Ok(aspect_ratio) => Some(aspect_ratio),
            Err(err) => {
                warn!(
                    "could not determine dimensions of {}, aspect ratio won't be specified: {err}",
                    image.path().display()
                );
                None
            }
        });

        Ok(Self {
            options,
            image,
            aspect_ratio,
        })
    }

    /// The options the draft was prepared from.
    pub fn options(&self) -> &PostOptions {
        &self.options
    }

    /// The attached image, read from disk.
    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    /// The attached image's width and height, if known.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    /// True if an image is attached but its dimensions could not be read.
    pub fn lacks_dimensions(&self) -> bool {
        self.image.is_some() && self.aspect_ratio.is_none()
    }
}

/// Appends each of `hashtags` to `text` as `#tag`, in order, separated by
/// spaces.
///
/// A leading `#` on a tag is not doubled, and blank tags are skipped. If
/// `text` is blank, the result is just the hashtags.
///
/// # Examples
///
/// ```
/// use skypost::bsky::post::compose;
/// assert_eq!(compose("Hello", &["a", "b"]), "Hello #a #b");
/// assert_eq!(compose("Hello", &["#a", " "]), "Hello #a");
/// assert_eq!(compose("", &["a"]), "#a");
/// ```
pub fn compose<S: AsRef<str>>(text: &str, hashtags: &[S]) -> String {
    let tags = hashtags
        .iter()
        .map(|tag| tag.as_ref().trim().trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{tag}"));

    let text = (!text.trim().is_empty()).then(|| text.to_string());
    text.into_iter().chain(tags).join(" ")
}

#[cfg(test)]
mod tests {
    mod compose {
        use super::super::*;

        #[test]
        fn it_appends_hashtags_in_order() {
            assert_eq!(compose("Hello", &["a", "b"]), "Hello #a #b");
        }

        #[test]
        fn it_leaves_text_alone_without_hashtags() {
            let none: [&str; 0] = [];
            assert_eq!(compose("Hello, world!", &none), "Hello, world!");
        }

        #[test]
        fn it_does_not_double_hash_signs() {
            assert_eq!(compose("Hello", &["#rust", "##tokio"]), "Hello #rust #tokio");
        }

        #[test]
        fn it_skips_blank_hashtags() {
            assert_eq!(compose("Hello", &["", "  ", "#", "a"]), "Hello #a");
        }

        #[test]
        fn it_trims_hashtags() {
            assert_eq!(compose("Hello", &[" a", "b "]), "Hello #a #b");
        }

        #[test]
        fn it_composes_hashtags_without_text() {
            assert_eq!(compose("", &["a", "b"]), "#a #b");
            assert_eq!(compose("  ", &["a", "b"]), "#a #b");
        }

        #[test]
        fn it_keeps_duplicate_hashtags() {
            assert_eq!(compose("x", &["a", "a"]), "x #a #a");
        }
    }

    mod options {
        use super::super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_builds_options() {
            let opts = PostOptions::build()
                .text("Hello")
                .hashtags(vec!["a".to_string(), "b".to_string()])
                .image(Some("cat.png"))
                .alt("A cat")
                .build();
            assert_eq!(opts.text(), "Hello");
            assert_eq!(opts.hashtags(), &["a".to_string(), "b".to_string()]);
            assert_eq!(opts.image(), Some(Path::new("cat.png")));
            assert_eq!(opts.alt(), "A cat");
            assert_eq!(opts.content(), "Hello #a #b");
        }

        #[test]
        fn it_uses_default_alt_text() {
            let opts = PostOptions::build().image(Some("cat.png")).build();
            assert_eq!(opts.alt(), "Attached image");
        }

        #[test]
        fn it_replaces_blank_alt_text() {
            let opts = PostOptions::build().alt("   ").build();
            assert_eq!(opts.alt(), conf::DEFAULT_ALT_TEXT);
        }

        #[test]
        fn it_treats_an_empty_image_path_as_no_image() {
            let opts = PostOptions::build().text("hi").image(Some("")).build();
            assert_eq!(opts.image(), None);
        }

        #[test]
        fn it_is_empty_without_text_or_image() {
            let opts = PostOptions::build().build();
            assert!(opts.is_empty());

            let opts = PostOptions::build().image(Some("")).build();
            assert!(opts.is_empty());
        }

        #[test]
        fn it_is_empty_with_only_whitespace() {
            let opts = PostOptions::build().text(" \n\t").build();
            assert!(opts.is_empty());
        }

        #[test]
        fn it_is_empty_with_only_hashtags() {
            let opts = PostOptions::build().hashtags(["a", "b"]).build();
            assert!(opts.is_empty());
        }

        #[test]
        fn it_is_not_empty_with_text() {
            let opts = PostOptions::build().text("hi").build();
            assert!(!opts.is_empty());
        }

        #[test]
        fn it_is_not_empty_with_an_image() {
            let opts = PostOptions::build().image(Some("cat.png")).build();
            assert!(!opts.is_empty());
        }
    }

    mod draft {
        use super::super::*;
        use crate::bsky::blob::BlobError;
        use crate::test_utils::png;
        use tempfile::TempDir;

        #[tokio::test]
        async fn it_prepares_a_text_post() {
            let opts = PostOptions::build().text("Hello").build();
            let draft = Draft::prepare(opts.clone()).await.unwrap();
            assert_eq!(draft.options(), &opts);
            assert!(draft.image().is_none());
            assert_eq!(draft.aspect_ratio(), None);
            assert!(!draft.lacks_dimensions());
        }

        #[tokio::test]
        async fn it_reads_the_image() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("cat.png");
            std::fs::write(&path, png(1200, 800)).unwrap();

            let opts = PostOptions::build().image(Some(&path)).build();
            let draft = Draft::prepare(opts).await.unwrap();
            let image = draft.image().unwrap();
            assert_eq!(image.path(), path.as_path());
            assert_eq!(image.size(), 33);
            assert_eq!(
                draft.aspect_ratio(),
                Some(AspectRatio {
                    width: 1200,
                    height: 800
                })
            );
        }

        #[tokio::test]
        async fn it_keeps_an_image_without_dimensions() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("cat.webp");
            std::fs::write(&path, b"not really a webp").unwrap();

            let opts = PostOptions::build().text("Blurry").image(Some(&path)).build();
            let draft = Draft::prepare(opts).await.unwrap();
            assert!(draft.image().is_some());
            assert_eq!(draft.aspect_ratio(), None);
            assert!(draft.lacks_dimensions());
        }

        #[tokio::test]
        async fn it_refuses_an_empty_post() {
            let opts = PostOptions::build().hashtags(["lonely"]).build();
            let err = Draft::prepare(opts).await.unwrap_err();
            assert!(matches!(err, Error::EmptyPost));
        }

        #[tokio::test]
        async fn it_refuses_an_oversized_image() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("huge.jpg");
            std::fs::write(&path, vec![0; 1_000_001]).unwrap();

            let opts = PostOptions::build().text("Big").image(Some(&path)).build();
            let err = Draft::prepare(opts).await.unwrap_err();
            assert!(matches!(
                err,
                Error::Image(BlobError::TooLarge {
                    size: 1_000_001,
                    ..
                })
            ));
        }

        #[tokio::test]
        async fn it_refuses_a_missing_image() {
            let opts = PostOptions::build()
                .text("Gone")
                .image(Some("/definitely/not/here.png"))
                .build();
            let err = Draft::prepare(opts).await.unwrap_err();
            assert!(matches!(err, Error::Image(BlobError::NotFound(_))));
        }
    }
}

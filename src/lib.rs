// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! skypost is a command-line tool for posting to [Bluesky]. It logs in with
//! an app password, optionally uploads an image, and creates a post with
//! whatever text and hashtags you give it.
//!
//! # Examples
//!
//! Post some text:
//!
//! ```bash
//! skypost posts create --text "Hello, Bluesky!"
//! ```
//!
//! Append hashtags to the post. Each tag becomes `#tag` at the end of the
//! text:
//!
//! ```bash
//! skypost posts create --text "Shipped it" --hashtags rust,bluesky
//! ```
//!
//! Attach an image, with alt text describing it:
//!
//! ```bash
//! skypost posts create -t "My cat" -i cat.jpg --alt "A cat asleep on a keyboard"
//! ```
//!
//! Run `skypost posts create` without any text or image and skypost will
//! ask for each interactively.
//!
//! Post to a self-hosted PDS instead of `bsky.social`:
//!
//! ```bash
//! skypost --host https://pds.example.com posts create -t "Hello"
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! skypost --help
//! ```
//!
//! # Bluesky Setup
//!
//! skypost reads your credentials from the environment. To set them up:
//!
//! 1. Create an [app password] for your account.
//! 2. Store your handle in `$BLUESKY_IDENTIFIER` and the app password in
//!    `$BLUESKY_PASSWORD`. Generally this involves running
//!
//!    ```bash
//!    $ export BLUESKY_IDENTIFIER='you.bsky.social'
//!    $ export BLUESKY_PASSWORD='xxxx-xxxx-xxxx-xxxx'
//!    ```
//!
//!    In your shell session or in your shell's configuration ("rc") file
//!    (e.g., `~/.bashrc` or `~/.zshrc`).
//!
//! Images must be no larger than 1,000,000 bytes; larger files are refused
//! before anything is uploaded.
//!
//! # License
//!
//! skypost is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [Bluesky]: https://bsky.app/
//! [app password]: https://bsky.app/settings/app-passwords

pub mod auth;
pub mod bsky;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod http;
pub mod prompt;

#[cfg(test)]
mod test_utils;

// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.

use std::time::Duration;

/// Environment variable holding the account identifier (a handle such as
/// `alice.bsky.social`, or an email address).
pub const IDENTIFIER_VAR: &str = "BLUESKY_IDENTIFIER";

/// Environment variable holding the account password.
///
/// This should really be an [app password], not the password used to log
/// in to the Bluesky website.
///
/// [app password]: https://bsky.app/settings/app-passwords
pub const PASSWORD_VAR: &str = "BLUESKY_PASSWORD";

/// Environment variable that overrides the API origin.
pub const HOST_VAR: &str = "SKYPOST_HOST";

/// The API origin used when none is given.
pub const DEFAULT_HOST: &str = "https://bsky.social";

/// Alt text attached to images when the user does not provide any.
pub const DEFAULT_ALT_TEXT: &str = "Attached image";

/// Largest blob the service will accept, in bytes.
pub const MAX_BLOB_SIZE: u64 = 1_000_000;

/// How long an image upload may take before it is abandoned.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the XRPC endpoint for the method `nsid` on the given `host`.
///
/// A trailing slash on `host` is ignored.
///
/// # Examples
///
/// ```
/// use skypost::conf::xrpc_uri;
/// let uri = xrpc_uri("https://bsky.social/", "com.atproto.server.createSession");
/// assert_eq!(uri, "https://bsky.social/xrpc/com.atproto.server.createSession");
/// ```
pub fn xrpc_uri(host: &str, nsid: &str) -> String {
    let host = host.trim_end_matches('/');
    format!("{host}/xrpc/{nsid}")
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Bluesky API clients and services for communicating with Bluesky over
//! XRPC.

pub mod blob;
pub mod client;
pub mod post;
pub mod record;
pub mod service;
pub mod session;

pub use client::{Client, CreatedPost, Error};
pub use post::{Draft, PostOptions};

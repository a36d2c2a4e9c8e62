// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Asks the user what to post when nothing was given on the command line.

use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Answers collected from an interactive session.
#[derive(Debug, Default, PartialEq)]
pub struct Answers {
    pub text: String,
    pub hashtags: Vec<String>,
    pub image: Option<PathBuf>,
}

/// True if standard input is attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompts for post text, hashtags, and an image path, in that order.
///
/// Every answer may be left blank.
pub fn ask() -> io::Result<Answers> {
    let text = input("Enter your post text")?;
    let hashtags = split_hashtags(&input("Enter hashtags (comma-separated)")?);
    let image = input("Enter image path (optional)")?;
    let image = (!image.trim().is_empty()).then(|| PathBuf::from(image.trim()));
    Ok(Answers {
        text,
        hashtags,
        image,
    })
}

fn input(prompt: &str) -> io::Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Splits a comma-separated list of hashtags, dropping blank entries.
pub fn split_hashtags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

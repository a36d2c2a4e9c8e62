// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::auth::Credentials;
pub use crate::bsky::Error;
use crate::bsky::{Client, Draft, PostOptions};
use crate::conf;
use crate::prompt::{self, Answers};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colored::Colorize;
use log::error;
use std::path::PathBuf;
use std::process;

pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Posts to Bluesky from the command line", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Base URL of the Bluesky service
    #[arg(long, global = true, env = conf::HOST_VAR, default_value = conf::DEFAULT_HOST)]
    host: String,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity<WarnLevel> {
        self.verbosity
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Work with posts
    Posts(PostCommandConfig),
}

#[derive(Args, Debug)]
struct PostCommandConfig {
    #[command(subcommand)]
    command: PostSubcommand,
}

#[derive(Debug, Subcommand)]
enum PostSubcommand {
    /// Create a new post
    Create(CreateConfig),
}

#[derive(Args, Debug)]
struct CreateConfig {
    /// Text of the post
    #[arg(short, long)]
    text: Option<String>,

    /// Comma-separated hashtags to append to the post
    #[arg(short = 'a', long, value_delimiter = ',')]
    hashtags: Vec<String>,

    /// Path to an image to attach
    #[arg(short, long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Alt text for the attached image
    #[arg(long, value_name = "TEXT")]
    alt: Option<String>,
}

impl CreateConfig {
    /// Nothing to post was given on the command line.
    fn needs_prompt(&self) -> bool {
        self.text.is_none() && self.image.is_none()
    }

    /// Builds post options from the command line, filling in anything
    /// answered interactively.
    fn options(&self, answers: Option<Answers>) -> PostOptions {
        let answers = answers.unwrap_or_default();
        let text = self.text.clone().unwrap_or(answers.text);
        let hashtags = self.hashtags.iter().cloned().chain(answers.hashtags);
        let image = self.image.clone().or(answers.image);

        let builder = PostOptions::build()
            .text(text)
            .hashtags(hashtags)
            .image(image);
        match &self.alt {
            Some(alt) => builder.alt(alt).build(),
            None => builder.build(),
        }
    }
}

/// Runs the command-line program.
pub async fn run(config: Config) -> Result<(), Error> {
    match &config.command {
        Command::Posts(PostCommandConfig {
            command: PostSubcommand::Create(create),
        }) => run_posts_create(config.host(), create).await,
    }
}

async fn run_posts_create(host: &str, config: &CreateConfig) -> Result<(), Error> {
    let answers = if config.needs_prompt() && prompt::is_interactive() {
        match prompt::ask() {
            Ok(answers) => Some(answers),
            Err(err) => die(1, &format!("{} could not read input: {err}", "Error:".red())),
        }
    } else {
        None
    };

    let draft = Draft::prepare(config.options(answers)).await?;
    if let Some(warning) = dimension_warning(&draft) {
        println!("{} {warning}", "Warning:".yellow());
    }

    let credentials = Credentials::from_env()?;
    let client = Client::login(host, &credentials).await?;
    let post = client.post(&draft).await?;

    println!("{}", "Post created successfully!".green());
    println!("{}", post.uri());
    println!("{}", post.web_url(client.session().handle()));
    Ok(())
}

/// A note for the user if the draft's image will be posted without an
/// aspect ratio.
fn dimension_warning(draft: &Draft) -> Option<String> {
    let image = draft.image().filter(|_| draft.lacks_dimensions())?;
    Some(format!(
        "Could not determine dimensions of {}; posting without an aspect ratio",
        image.path().display()
    ))
}

/// The process exit status for a failed run.
///
/// Every failure, including a refused login or post, exits non-zero so
/// that scripts can tell a post was not made.
pub fn exit_status(err: &Error) -> u8 {
    match err {
        Error::Credentials(_)
        | Error::Auth(_)
        | Error::Image(_)
        | Error::Post(_)
        | Error::EmptyPost => 1,
    }
}

/// A short description of `err` suitable for showing to the user.
pub fn summary(err: &Error) -> String {
    match err {
        Error::Credentials(_) | Error::Auth(_) => {
            String::from("Failed to authenticate with Bluesky")
        }
        Error::Image(_) | Error::Post(_) => String::from("Failed to create post"),
        Error::EmptyPost => err.to_string(),
    }
}

/// Logs the details of `err` and prints a short summary to standard error.
pub fn report(err: &Error) {
    error!("{err}");
    eprintln!("{} {}", "Error:".red(), summary(err));
}

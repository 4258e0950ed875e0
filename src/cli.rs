// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The tool is interactive: run it with no arguments and it asks for a
// username, an API token and which repositories to include. Every question
// can also be answered up front with a flag, which is handy for scripts.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Generic readers/writers: prompts work on stdin or on a test buffer
// =============================================================================

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use url::Url;

use crate::github::{RepoType, DEFAULT_BASE_URL};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "gh-extract",
    version,
    about = "Export a GitHub user's repositories and commits to CSV",
    long_about = "gh-extract lists a GitHub user's repositories, collects every commit the user \
                  authored in them (with line additions and deletions), and writes both to \
                  CSV files named {user}-Repos-{MM-DD-YYYY}.csv and {user}-Commits-{MM-DD-YYYY}.csv."
)]
pub struct Cli {
    /// GitHub username to export (prompted for when omitted)
    #[arg(long)]
    pub user: Option<String>,

    /// API token; pass an empty string to run unauthenticated without a prompt
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Which repositories to list: owner, all or member (prompted for when omitted)
    #[arg(long)]
    pub repo_type: Option<RepoType>,

    /// Base URL of the GitHub REST API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub api_url: Url,

    /// Directory the CSV files are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

// The answers we need before any request can be made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInput {
    pub user: String,
    pub token: Option<String>,
    pub repo_type: RepoType,
}

impl Cli {
    // Fills in anything not given on the command line by asking the user
    //
    // Generic over the reader/writer so tests can script the answers.
    pub fn resolve_input<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<RunInput> {
        let user = match &self.user {
            Some(user) => user.trim().to_string(),
            None => prompt(input, output, "Enter GitHub username: ")?,
        };
        if user.is_empty() {
            bail!("a GitHub username is required");
        }

        let token = match &self.token {
            Some(token) => token.clone(),
            None => prompt(input, output, "Enter API token, or press Enter if no token: ")?,
        };
        let token = Some(token).filter(|t| !t.trim().is_empty());

        let repo_type = match self.repo_type {
            Some(repo_type) => repo_type,
            None => {
                let answer = prompt(
                    input,
                    output,
                    "Type 'owner' to only get data for repositories owned by the user, \
                     or 'all' for all repositories the user has contributed to [owner]: ",
                )?;
                if answer.is_empty() {
                    RepoType::default()
                } else {
                    answer.parse::<RepoType>().map_err(anyhow::Error::msg)?
                }
            }
        };

        Ok(RunInput {
            user,
            token,
            repo_type,
        })
    }
}

// Prints a question and reads one line back, without the trailing newline
//
// End of input counts as an empty answer.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> for every flag?
//    - None means "not given", so we know to ask interactively
//    - Some("") for --token is different from None: it means "no token,
//      and don't ask"
//
// 2. How does clap parse RepoType and Url?
//    - Both implement FromStr, and clap uses FromStr for any type that has it
//    - A bad value is reported by clap with our error message
//
// 3. What is impl BufRead?
//    - BufRead is a trait for readers that can read line by line
//    - stdin().lock() implements it, and so does io::Cursor over a string
// -----------------------------------------------------------------------------

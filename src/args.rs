use clap::{Parser, Subcommand};
use repo_miner::api::{RepoId, StateFilter};
use secrecy::SecretString;
use std::path::PathBuf;

/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// API OAuth access token
    #[clap(long, env = TOKEN_VAR, global = true, hide_env_values = true)]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, global = true, default_value = "https://api.github.com")]
    pub api_url: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch commits and save them to CSV
    FetchCommits {
        /// Repository in owner/repo format
        #[clap(long)]
        repo: RepoId,

        /// Max number of commits to fetch
        #[clap(long = "max")]
        max_commits: Option<usize>,

        /// Path to output commits CSV
        #[clap(long)]
        out: PathBuf,
    },
    /// Fetch issues and save them to CSV
    FetchIssues {
        /// Repository in owner/repo format
        #[clap(long)]
        repo: RepoId,

        /// Filter issues by state: all, open or closed
        #[clap(long, default_value = "all")]
        state: StateFilter,

        /// Max number of issues to fetch, pull requests excluded
        #[clap(long = "max")]
        max_issues: Option<usize>,

        /// Path to output issues CSV
        #[clap(long)]
        out: PathBuf,
    },
    /// Summarize previously fetched commits and issues
    Summarize {
        /// Path to commits CSV file
        #[clap(long)]
        commits: PathBuf,

        /// Path to issues CSV file
        #[clap(long)]
        issues: PathBuf,
    },
}

mod args;

pub use args::{Args, Command, TOKEN_VAR};

use github_client::{GithubClient, GithubClientBuilder};
use log::debug;
use repo_miner::{summarize, table, CommitRecord, Error, IssueRecord, RepoMiner, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;

/// Runs a single command. Fetch commands write a CSV table, `summarize` prints to standard output.
pub async fn run(args: Args) -> Result<()> {
    run_with_output(args, &mut std::io::stdout()).await
}

/// Runs a single command, writing confirmations and the summary to `output`.
pub async fn run_with_output<W: Write>(args: Args, output: &mut W) -> Result<()> {
    debug!("Running {:?}", args.command);
    match args.command {
        Command::FetchCommits { repo, max_commits, out } => {
            let miner = RepoMiner::new(github_client(args.api_token, &args.api_url)?);
            let commits = miner.commits(&repo, max_commits).await?;
            table::save(&out, &commits)?;
            writeln!(output, "Saved {} commits to {}", commits.len(), out.display())?;
        }
        Command::FetchIssues {
            repo,
            state,
            max_issues,
            out,
        } => {
            let miner = RepoMiner::new(github_client(args.api_token, &args.api_url)?);
            let issues = miner.issues(&repo, state, max_issues).await?;
            table::save(&out, &issues)?;
            writeln!(output, "Saved {} issues to {}", issues.len(), out.display())?;
        }
        Command::Summarize { commits, issues } => {
            let commits = table::load::<CommitRecord>(&commits)?;
            let issues = table::load::<IssueRecord>(&issues)?;
            writeln!(output, "{}", summarize(&commits, &issues)?)?;
        }
    }
    Ok(())
}

/// Builds an authenticated client, failing before any request if no token is configured.
/// An empty token counts as not configured.
pub fn github_client(api_token: Option<SecretString>, api_url: &str) -> Result<GithubClient> {
    let token = api_token
        .filter(|token| !token.expose_secret().trim().is_empty())
        .ok_or(Error::MissingToken(TOKEN_VAR))?;
    GithubClientBuilder::default()
        .with_github_url(api_url)
        .try_with_token(token)?
        .build()
}

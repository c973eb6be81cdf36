use crate::{CommitRecord, Error, IssueRecord, Result};
use anyhow::Context;
use derive_more::Constructor;
use log::debug;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::time::Duration;

pub const TOP_COMMITTERS: usize = 5;

#[derive(Debug, PartialEq, Eq, Constructor)]
pub struct Committer {
    pub name: String,
    pub commits: usize,
}

#[derive(Debug, PartialEq)]
pub struct Summary {
    /// Most frequent authors, by commit count in desc order.
    pub top_committers: Vec<Committer>,
    /// Ratio of closed issues to all issues, in [0.0, 1.0].
    pub close_rate: f64,
    /// Mean time between creation and closure of closed issues.
    pub average_close_duration: Duration,
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top {} committers:", TOP_COMMITTERS)?;
        for committer in &self.top_committers {
            writeln!(f, "{}: {} commits", committer.name, committer.commits)?;
        }
        writeln!(f, "Issue close rate: {:.2}", self.close_rate)?;
        write!(
            f,
            "Avg. issue open duration: {}",
            humantime::format_duration(self.average_close_duration)
        )
    }
}

/// Aggregates previously fetched commits and issues.
///
/// # Errors
/// * `Error::DivisionByZero` if there are no issues, or no closed issues.
/// * `Error::MissingField` if a closed issue has no closure date.
pub fn summarize(commits: &[CommitRecord], issues: &[IssueRecord]) -> Result<Summary> {
    let summary = Summary {
        top_committers: top_committers(commits, TOP_COMMITTERS),
        close_rate: close_rate(issues)?,
        average_close_duration: average_close_duration(issues)?,
    };
    debug!("Summarized {} commits and {} issues", commits.len(), issues.len());
    Ok(summary)
}

/// Counts commits per author. Commits without author are skipped, ties keep first appearance order.
fn top_committers(commits: &[CommitRecord], count: usize) -> Vec<Committer> {
    let mut committers: Vec<Committer> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for author in commits.iter().filter_map(|commit| commit.author.as_deref()) {
        match positions.get(author) {
            Some(&position) => committers[position].commits += 1,
            None => {
                positions.insert(author, committers.len());
                committers.push(Committer::new(author.to_string(), 1));
            }
        }
    }
    committers.sort_by(|a, b| b.commits.cmp(&a.commits));
    committers.truncate(count);
    committers
}

fn close_rate(issues: &[IssueRecord]) -> Result<f64> {
    if issues.is_empty() {
        return Err(Error::DivisionByZero {
            statistic: "issue close rate",
            population: "issues",
        });
    }
    let closed = issues.iter().filter(|issue| issue.is_closed()).count();
    Ok(closed as f64 / issues.len() as f64)
}

fn average_close_duration(issues: &[IssueRecord]) -> Result<Duration> {
    let mut closed = 0i64;
    let mut total_secs = 0i64;
    for issue in issues.iter().filter(|issue| issue.is_closed()) {
        let closed_at = issue.closed_at.ok_or_else(|| Error::MissingField {
            record: format!("Issue #{}", issue.number),
            field: "closure date",
        })?;
        total_secs += (closed_at - issue.created_at).num_seconds();
        closed += 1;
    }
    if closed == 0 {
        return Err(Error::DivisionByZero {
            statistic: "average issue open duration",
            population: "closed issues",
        });
    }
    let average_secs =
        u64::try_from(total_secs / closed).context("Closed issues report closure before creation")?;
    Ok(Duration::from_secs(average_secs))
}

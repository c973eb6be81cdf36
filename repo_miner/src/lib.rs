//! Repository history mining
//!
//! # Overview
//!
//! Library mines the commit and issue history of a hosted source repository through a remote API client.
//! Raw API items are normalized into flat records (`CommitRecord`, `IssueRecord`) which can be persisted as comma-delimited tables.
//! Pull requests, which the issue listing intermixes with true issues, are never materialized as issue records.
//! Given previously saved tables, the `summary` module reports the five most frequent commit authors,
//! the fraction of closed issues, and the average time it took to close an issue.
//!
//! The remote API is abstracted by the `api::Client` trait (feature `api`), and fetching is done by `RepoMiner` (feature `miner`)
//! which receives its client explicitly and pulls pages lazily, one at a time, until the requested cap is reached.

mod error;
pub mod record;
pub mod summary;
pub mod table;

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "miner")]
mod fetcher;

pub use error::{Error, Result};
pub use record::{CommitRecord, IssueRecord, IssueState};
pub use summary::{summarize, Committer, Summary};

#[cfg(feature = "miner")]
pub use fetcher::RepoMiner;

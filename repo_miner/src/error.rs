use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication token not configured, set the {0} environment variable")]
    MissingToken(&'static str),
    #[error("Invalid repository identifier {0:?}, expected owner/name")]
    InvalidRepository(String),
    #[error("{record} has no {field}")]
    MissingField { record: String, field: &'static str },
    #[error("Cannot compute {statistic}: there are no {population}")]
    DivisionByZero {
        statistic: &'static str,
        population: &'static str,
    },
    #[error("Table error: {0}")]
    Table(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

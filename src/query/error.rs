use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid status filter: {0}")]
    InvalidStatus(String),

    #[error("Too many ids requested: {got} (limit {limit})")]
    TooManyIds { got: usize, limit: usize },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

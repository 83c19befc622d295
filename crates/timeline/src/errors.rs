use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlError {
    #[error("invalid timeline layout: {0}")]
    InvalidLayout(String),
}

pub type TlResult<T> = Result<T, TlError>;

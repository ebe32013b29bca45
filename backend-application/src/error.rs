use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// A failure while scoring one merchant. Isolated per merchant in
    /// batch mode; a definite failure for single-merchant requests.
    #[error("computation failed: {0}")]
    Computation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Common error type for coaddition operations.
///
/// Every dimensional or positional precondition failure is reported as
/// `InvalidParameter` with a message naming the check that failed. Checks run
/// before any pixel is touched, so a returned error guarantees the coadd and
/// weight map are unchanged.
#[derive(thiserror::Error, Debug)]
pub enum CoaddError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type CoaddResult<T> = Result<T, CoaddError>;

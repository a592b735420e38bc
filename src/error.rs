use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config: {0} must be >= 1")]
    BelowMinimum(&'static str),

    #[error("config: {0} is out of range")]
    OutOfRange(&'static str),

    #[error("config: line_a_pct must be strictly below line_b_pct")]
    LineOrder,
}

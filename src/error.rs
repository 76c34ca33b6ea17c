use crate::types::Side;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LadderError {
    #[error("No {side} levels to aggregate")]
    EmptyInput { side: Side },

    #[error("Invalid aggregation step: {0}")]
    InvalidStep(Decimal),

    #[error("Aggregation step {0} is too fine for the price range")]
    StepOverflow(Decimal),

    #[error("Depth request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Depth request returned status {0}")]
    Status(u16),

    #[error("Malformed depth payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LadderError>;

use alloy::primitives::Bytes;

use crate::{return_data::DecodedReturnData, revert_data::NotARevert};

/// Return data that carries a known selector but whose body does not decode.
#[derive(Debug, thiserror::Error)]
#[error("return data looks like {expected_type} but failed to decode: 0x{}", hex::encode(.data))]
pub struct DecodingError {
    pub expected_type: &'static str,
    pub data: Bytes,
    #[source]
    pub source: alloy::sol_types::Error,
}

/// An expectation about the revert outcome did not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
    /// Decoded return data of the revert, if the call reverted at all.
    pub actual: Option<DecodedReturnData>,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            actual: None,
        }
    }

    pub fn with_actual(mut self, actual: DecodedReturnData) -> Self {
        self.actual = Some(actual);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RevertAssertionError {
    #[error(transparent)]
    Failed(#[from] AssertionFailure),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// The checked call failed, but not by reverting.
    #[error(transparent)]
    NotARevert(#[from] NotARevert),
}

impl RevertAssertionError {
    pub fn as_failure(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Decoding(_) | Self::NotARevert(_) => None,
        }
    }
}

//! Classification of the return data a reverted call leaves behind.

use std::fmt;

use alloy::{
    primitives::{Bytes, U256},
    sol_types::{Panic, Revert, SolError, SolType, sol_data},
};

use crate::error::DecodingError;

const UNKNOWN_PANIC_CODE: &str = "unknown panic code";

/// What a revert payload turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedReturnData {
    /// The revert carried no data.
    Empty,
    /// `Error(string)`, i.e. `require(cond, "reason")` or `revert("reason")`.
    Error { reason: String },
    /// `Panic(uint256)` raised by the compiler-inserted checks.
    Panic { code: U256, description: String },
    /// Anything else, usually a custom error. Kept as is.
    Custom { data: Bytes },
}

impl DecodedReturnData {
    /// Four-byte selector of a custom error, if the payload is long enough to have one.
    pub fn custom_selector(&self) -> Option<[u8; 4]> {
        match self {
            Self::Custom { data } => data.get(..4)?.try_into().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedReturnData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no return data"),
            Self::Error { reason } => write!(f, "reason '{reason}'"),
            Self::Panic { code, description } => {
                write!(f, "panic code {} ({description})", format_panic_code(*code))
            }
            Self::Custom { data } => write!(f, "custom error 0x{}", hex::encode(data)),
        }
    }
}

/// Classifies raw revert data.
///
/// Data that starts with the `Error(string)` or `Panic(uint256)` selector
/// must decode as such; a failure to do so is reported rather than
/// treated as a custom error.
pub fn classify(data: &[u8]) -> Result<DecodedReturnData, DecodingError> {
    if data.is_empty() {
        return Ok(DecodedReturnData::Empty);
    }

    if data.starts_with(&Revert::SELECTOR) {
        let reason = decode_reason(data).map_err(|source| DecodingError {
            expected_type: "Error(string)",
            data: Bytes::copy_from_slice(data),
            source,
        })?;
        return Ok(DecodedReturnData::Error { reason });
    }

    if data.starts_with(&Panic::SELECTOR) {
        let panic = Panic::abi_decode(data, false).map_err(|source| DecodingError {
            expected_type: "Panic(uint256)",
            data: Bytes::copy_from_slice(data),
            source,
        })?;
        let description = panic_description(panic.code)
            .unwrap_or(UNKNOWN_PANIC_CODE)
            .to_string();
        return Ok(DecodedReturnData::Panic {
            code: panic.code,
            description,
        });
    }

    Ok(DecodedReturnData::Custom {
        data: Bytes::copy_from_slice(data),
    })
}

/// Decodes the `Error(string)` body as raw bytes so that invalid UTF-8 is
/// rejected instead of replaced.
fn decode_reason(data: &[u8]) -> Result<String, alloy::sol_types::Error> {
    let body = &data[Revert::SELECTOR.len()..];
    let (reason,) = <(sol_data::Bytes,)>::abi_decode_params(body, false)?;
    String::from_utf8(reason.to_vec()).map_err(|err| {
        alloy::sol_types::Error::custom(format!("revert reason is not valid UTF-8: {err}"))
    })
}

/// Human readable meaning of a Solidity panic code.
pub fn panic_description(code: U256) -> Option<&'static str> {
    let code = u64::try_from(code).ok()?;
    let description = match code {
        0x01 => "Assertion error",
        0x11 => "Arithmetic operation underflowed or overflowed outside of an unchecked block",
        0x12 => "Division or modulo division by zero",
        0x21 => "Tried to convert a value into an enum, but the value was too big or negative",
        0x22 => "Incorrectly encoded storage byte array",
        0x31 => ".pop() was called on an empty array",
        0x32 => "Array accessed at an out-of-bounds or negative index",
        0x41 => "Too much memory was allocated, or an array was created that is too large",
        0x51 => "Called a zero-initialized variable of internal function type",
        _ => return None,
    };
    Some(description)
}

/// `0x`-prefixed lower-case hex, padded to whole bytes (`1` -> `0x01`).
pub fn format_panic_code(code: U256) -> String {
    let digits = format!("{code:x}");
    if digits.len() % 2 == 0 {
        format!("0x{digits}")
    } else {
        format!("0x0{digits}")
    }
}

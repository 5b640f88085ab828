//! Expectations about why a contract call or transaction reverted.
//!
//! [`return_data::classify`] turns raw revert data into a
//! [`DecodedReturnData`]. The [`matchers`] build on it to check a call that
//! may still be in flight, and [`assertions`] plug the same checks into a
//! transaction submission pipeline.

pub mod assertions;
pub mod error;
pub mod matchers;
pub mod return_data;
pub mod revert_data;
pub mod utils;

pub use error::{AssertionFailure, DecodingError, RevertAssertionError};
pub use matchers::{Check, Expect, PendingAssertion, RevertMatcher, Settlement, evaluate, expect};
pub use return_data::{DecodedReturnData, classify};
pub use revert_data::{NotARevert, RevertData};

use alloy::primitives::U256;

use crate::{
    matchers::{Check, RevertMatcher},
    return_data::{DecodedReturnData, format_panic_code, panic_description},
};

/// The call reverted with a `Panic(uint256)`, optionally with a specific code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertedWithPanic {
    code: Option<U256>,
}

impl RevertedWithPanic {
    pub fn new(code: impl Into<Option<U256>>) -> Self {
        Self { code: code.into() }
    }

    fn formatted(&self) -> String {
        match self.code {
            Some(code) => format!(
                "panic code {} ({})",
                format_panic_code(code),
                panic_description(code).unwrap_or("unknown panic code")
            ),
            None => "some panic code".to_string(),
        }
    }
}

impl RevertMatcher for RevertedWithPanic {
    fn on_success(&self) -> Check {
        Check::unmet(format!(
            "Expected transaction to be reverted with {}, but it didn't revert",
            self.formatted()
        ))
    }

    fn on_revert(&self, decoded: &DecodedReturnData) -> Check {
        let expectation = format!("Expected transaction to be reverted with {}", self.formatted());
        match decoded {
            DecodedReturnData::Empty => {
                Check::unmet(format!("{expectation}, but it reverted without a reason"))
            }
            DecodedReturnData::Error { reason } => Check::unmet(format!(
                "{expectation}, but it reverted with reason '{reason}'"
            )),
            DecodedReturnData::Panic { code, description } => {
                let actual = format!("panic code {} ({description})", format_panic_code(*code));
                match self.code {
                    Some(expected) => Check::compare(
                        *code == expected,
                        format!("{expectation}, but it reverted with {actual}"),
                        format!(
                            "Expected transaction NOT to be reverted with {}, but it was",
                            self.formatted()
                        ),
                    ),
                    None => Check::met(format!(
                        "Expected transaction NOT to be reverted with some panic code, but it reverted with {actual}"
                    )),
                }
            }
            DecodedReturnData::Custom { .. } => {
                Check::unmet(format!("{expectation}, but it reverted with a custom error"))
            }
        }
    }
}

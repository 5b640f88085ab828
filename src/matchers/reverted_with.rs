use crate::{
    matchers::{Check, RevertMatcher},
    return_data::{DecodedReturnData, format_panic_code},
};

/// The call reverted with exactly this `Error(string)` reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertedWith {
    expected: String,
}

impl RevertedWith {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    fn expectation(&self) -> String {
        format!(
            "Expected transaction to be reverted with reason '{}'",
            self.expected
        )
    }
}

impl RevertMatcher for RevertedWith {
    fn on_success(&self) -> Check {
        Check::unmet(format!("{}, but it didn't revert", self.expectation()))
    }

    fn on_revert(&self, decoded: &DecodedReturnData) -> Check {
        match decoded {
            DecodedReturnData::Empty => Check::unmet(format!(
                "{}, but it reverted without a reason",
                self.expectation()
            )),
            DecodedReturnData::Error { reason } => Check::compare(
                *reason == self.expected,
                format!(
                    "{}, but it reverted with reason '{reason}'",
                    self.expectation()
                ),
                format!(
                    "Expected transaction NOT to be reverted with reason '{}', but it was",
                    self.expected
                ),
            ),
            DecodedReturnData::Panic { code, description } => Check::unmet(format!(
                "{}, but it reverted with panic code {} ({description})",
                self.expectation(),
                format_panic_code(*code)
            )),
            DecodedReturnData::Custom { .. } => Check::unmet(format!(
                "{}, but it reverted with a custom error",
                self.expectation()
            )),
        }
    }
}

use crate::{
    matchers::{Check, RevertMatcher},
    return_data::{DecodedReturnData, format_panic_code},
};

const EXPECTATION: &str = "Expected transaction to be reverted without reason";

/// The call reverted with no return data at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertedWithoutReason;

impl RevertMatcher for RevertedWithoutReason {
    fn on_success(&self) -> Check {
        Check::unmet(format!("{EXPECTATION}, but it didn't revert"))
    }

    fn on_revert(&self, decoded: &DecodedReturnData) -> Check {
        match decoded {
            DecodedReturnData::Empty => Check::met(
                "Expected transaction NOT to be reverted without reason, but it was",
            ),
            DecodedReturnData::Error { reason } => Check::unmet(format!(
                "{EXPECTATION}, but it reverted with reason '{reason}'"
            )),
            DecodedReturnData::Panic { code, description } => Check::unmet(format!(
                "{EXPECTATION}, but it reverted with panic code {} ({description})",
                format_panic_code(*code)
            )),
            DecodedReturnData::Custom { .. } => {
                Check::unmet(format!("{EXPECTATION}, but it reverted with a custom error"))
            }
        }
    }
}

use alloy::{
    network::Ethereum,
    primitives::{Bytes, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
    transports::{RpcError, TransportErrorKind},
};

use crate::{
    assertions::{Assertion, TxAssertion},
    matchers::{
        RevertMatcher, RevertedWith, RevertedWithPanic, RevertedWithoutReason, Settlement, judge,
    },
    revert_data::RevertData as _,
};

/// Runs a [`RevertMatcher`] against a submitted transaction.
///
/// A revert reported by the node at submission and a mined transaction with
/// a failed status are both treated as a revert. A submission that fails for
/// any other reason is an error whatever the matcher expects.
#[derive(Debug)]
pub struct ShouldRevertWith {
    matcher: Box<dyn RevertMatcher>,
    negated: bool,
}

impl ShouldRevertWith {
    pub fn new(matcher: impl RevertMatcher + 'static, negated: bool) -> Self {
        Self {
            matcher: Box::new(matcher),
            negated,
        }
    }

    fn check(&self, settlement: Settlement) -> anyhow::Result<()> {
        judge(self.matcher.as_ref(), settlement, self.negated)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Assertion for ShouldRevertWith {
    async fn on_failed_send(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        err: &RpcError<TransportErrorKind>,
    ) -> anyhow::Result<()> {
        self.check(Settlement::Reverted(err.revert_data()?))
    }

    async fn on_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        receipt: TransactionReceipt,
    ) -> anyhow::Result<()> {
        // `send_with_assertions` only hands over successful receipts; a failed
        // one reaches here from callers driving the hook directly.
        if receipt.status() {
            self.check(Settlement::Succeeded)
        } else {
            self.check(Settlement::Reverted(None))
        }
    }

    async fn on_reverted_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        _receipt: TransactionReceipt,
        revert_data: Option<Bytes>,
    ) -> anyhow::Result<()> {
        self.check(Settlement::Reverted(revert_data))
    }
}

impl TxAssertion {
    pub fn should_revert_with(reason: impl Into<String>) -> Self {
        Self::new(ShouldRevertWith::new(RevertedWith::new(reason), false))
    }

    pub fn should_not_revert_with(reason: impl Into<String>) -> Self {
        Self::new(ShouldRevertWith::new(RevertedWith::new(reason), true))
    }

    pub fn should_revert_without_reason() -> Self {
        Self::new(ShouldRevertWith::new(RevertedWithoutReason, false))
    }

    /// `None` accepts any panic code.
    pub fn should_revert_with_panic(code: impl Into<Option<U256>>) -> Self {
        Self::new(ShouldRevertWith::new(RevertedWithPanic::new(code), false))
    }
}

use alloy::{
    network::Ethereum,
    primitives::Bytes,
    providers::Provider,
    rpc::types::TransactionReceipt,
    transports::{RpcError, TransportErrorKind},
};

use crate::{
    assertions::{Assertion, TxAssertion},
    revert_data::RevertData as _,
};

/// The transaction reverts, for any reason.
#[derive(Debug, Clone, Copy)]
pub struct ShouldRevert;

#[async_trait::async_trait]
impl Assertion for ShouldRevert {
    async fn on_failed_send(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        err: &RpcError<TransportErrorKind>,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            err.revert_data().is_ok(),
            "Transaction should have reverted, but submission failed: {err}"
        );
        tracing::debug!(%err, "Transaction reverted on submission");
        Ok(())
    }

    async fn on_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        receipt: TransactionReceipt,
    ) -> anyhow::Result<()> {
        if receipt.status() {
            return Err(anyhow::anyhow!(
                "Transaction should have reverted, but succeeded"
            ));
        }
        Ok(())
    }

    async fn on_reverted_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        _receipt: TransactionReceipt,
        _revert_data: Option<Bytes>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

impl TxAssertion {
    pub fn should_revert() -> Self {
        Self(Box::new(ShouldRevert))
    }
}

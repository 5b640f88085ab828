use alloy::{
    network::Ethereum,
    primitives::Bytes,
    providers::Provider,
    rpc::types::TransactionReceipt,
    transports::{RpcError, TransportErrorKind},
};

use crate::{
    assertions::{Assertion, TxAssertion},
    return_data::classify,
    revert_data::RevertData as _,
};

#[derive(Debug, Clone, Copy)]
pub struct ShouldSucceed;

fn describe_revert(revert_data: Option<&Bytes>) -> String {
    match revert_data.map(|data| classify(data)) {
        Some(Ok(decoded)) => decoded.to_string(),
        Some(Err(err)) => err.to_string(),
        None => "no return data".to_string(),
    }
}

#[async_trait::async_trait]
impl Assertion for ShouldSucceed {
    async fn on_failed_send(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        err: &RpcError<TransportErrorKind>,
    ) -> anyhow::Result<()> {
        match err.revert_data() {
            Ok(data) => anyhow::bail!(
                "Transaction should have succeeded, but reverted on submission with {}",
                describe_revert(data.as_ref())
            ),
            Err(_) => anyhow::bail!("Transaction submission failed: {err}"),
        }
    }

    async fn on_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        receipt: TransactionReceipt,
    ) -> anyhow::Result<()> {
        if !receipt.status() {
            return Err(anyhow::anyhow!(
                "Transaction should have succeeded, but failed"
            ));
        }
        Ok(())
    }

    async fn on_reverted_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        receipt: TransactionReceipt,
        revert_data: Option<Bytes>,
    ) -> anyhow::Result<()> {
        anyhow::bail!(
            "Transaction {} should have succeeded, but reverted with {}",
            receipt.transaction_hash,
            describe_revert(revert_data.as_ref())
        )
    }
}

impl TxAssertion {
    pub fn should_succeed() -> Self {
        Self(Box::new(ShouldSucceed))
    }
}

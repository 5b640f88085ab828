use alloy::{
    eips::BlockNumberOrTag,
    network::Ethereum,
    primitives::Bytes,
    providers::{PendingTransactionError, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
    transports::{RpcError, TransportErrorKind},
};
use anyhow::Context as _;

use crate::revert_data::RevertData as _;

mod should_revert;
mod should_revert_with;
mod should_succeed;

pub use should_revert_with::ShouldRevertWith;

#[derive(Debug)]
pub struct TxAssertion(Box<dyn Assertion>);

impl TxAssertion {
    pub fn new(assertion: impl Assertion) -> Self {
        Self(Box::new(assertion))
    }
}

#[async_trait::async_trait]
pub trait Assertion: Send + Sync + 'static + std::fmt::Debug {
    async fn before_submission(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_failed_send(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        err: &RpcError<TransportErrorKind>,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Transaction submission failed: {}", err.to_string());
    }

    async fn on_get_receipt_failure(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        err: &PendingTransactionError,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Failed to get transaction receipt: {}", err.to_string());
    }

    async fn on_receipt(
        &mut self,
        _provider: &dyn Provider<Ethereum>,
        _receipt: TransactionReceipt,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called instead of [`Assertion::on_receipt`] for a mined transaction
    /// that reverted. `revert_data` is recovered by replaying the request.
    async fn on_reverted_receipt(
        &mut self,
        provider: &dyn Provider<Ethereum>,
        receipt: TransactionReceipt,
        _revert_data: Option<Bytes>,
    ) -> anyhow::Result<()> {
        self.on_receipt(provider, receipt).await
    }
}

/// Re-executes a reverted transaction on top of the parent block to get its return data.
async fn replay_revert(
    provider: &dyn Provider<Ethereum>,
    request: TransactionRequest,
    receipt: &TransactionReceipt,
) -> anyhow::Result<Option<Bytes>> {
    let mut call = provider.call(request);
    if let Some(number) = receipt.block_number {
        call = call.block(BlockNumberOrTag::Number(number.saturating_sub(1)).into());
    }
    match call.await {
        Ok(output) => {
            tracing::warn!(
                tx_hash = ?receipt.transaction_hash,
                ?output,
                "Replay of a reverted transaction succeeded, revert data is unavailable"
            );
            Ok(None)
        }
        Err(err) => err.revert_data().with_context(|| {
            format!(
                "Failed to replay reverted transaction {}",
                receipt.transaction_hash
            )
        }),
    }
}

async fn dispatch_failed_send(
    provider: &dyn Provider<Ethereum>,
    assertions: &mut [TxAssertion],
    err: &RpcError<TransportErrorKind>,
) -> anyhow::Result<()> {
    for assertion in assertions {
        assertion
            .0
            .on_failed_send(provider, err)
            .await
            .with_context(|| format!("{assertion:?}::on_failed_send"))?;
    }
    Ok(())
}

async fn dispatch_receipt_failure(
    provider: &dyn Provider<Ethereum>,
    assertions: &mut [TxAssertion],
    err: &PendingTransactionError,
) -> anyhow::Result<()> {
    for assertion in assertions {
        assertion
            .0
            .on_get_receipt_failure(provider, err)
            .await
            .with_context(|| format!("{assertion:?}::on_get_receipt_failure"))?;
    }
    Ok(())
}

/// Successful receipts go to `on_receipt`; reverted ones are replayed first
/// and go to `on_reverted_receipt`.
async fn dispatch_receipt(
    provider: &dyn Provider<Ethereum>,
    request: TransactionRequest,
    receipt: TransactionReceipt,
    assertions: &mut [TxAssertion],
) -> anyhow::Result<()> {
    if receipt.status() {
        for assertion in assertions {
            assertion
                .0
                .on_receipt(provider, receipt.clone())
                .await
                .with_context(|| format!("{assertion:?}::on_receipt"))?;
        }
        return Ok(());
    }

    let revert_data = replay_revert(provider, request, &receipt).await?;
    tracing::debug!(?revert_data, "Transaction reverted");
    for assertion in assertions {
        assertion
            .0
            .on_reverted_receipt(provider, receipt.clone(), revert_data.clone())
            .await
            .with_context(|| format!("{assertion:?}::on_reverted_receipt"))?;
    }
    Ok(())
}

#[async_trait::async_trait]
pub trait AssertingProvider: Provider<Ethereum> + Sized {
    async fn send_with_assertions(
        &self,
        request: impl Into<TransactionRequest> + Send + Sync + 'static,
        assertions: impl IntoIterator<Item = TxAssertion> + Send + Sync + 'static,
    ) -> anyhow::Result<()> {
        let provider = self;
        let request = request.into();
        let mut assertions = assertions.into_iter().collect::<Vec<_>>();
        for assertion in &mut assertions {
            assertion
                .0
                .before_submission(provider)
                .await
                .with_context(|| format!("{assertion:?}::before_submission"))?;
        }

        let pending_tx = match provider.send_transaction(request.clone()).await {
            Ok(hash) => hash,
            Err(err) => return dispatch_failed_send(provider, &mut assertions, &err).await,
        };
        tracing::info!("Submitted tx: {:?}", pending_tx.tx_hash());

        let receipt = match pending_tx.get_receipt().await {
            Ok(receipt) => receipt,
            Err(err) => return dispatch_receipt_failure(provider, &mut assertions, &err).await,
        };
        tracing::debug!(?receipt, "Transaction receipt received");

        dispatch_receipt(provider, request, receipt, &mut assertions).await
    }
}

#[async_trait::async_trait]
impl<P: Provider<Ethereum> + Send + Sync + 'static> AssertingProvider for P {}

//! Extraction of raw revert payloads from the errors a call can fail with.

use alloy::{
    primitives::Bytes,
    transports::{RpcError, TransportErrorKind},
};

/// JSON-RPC error code nodes use for `execution reverted`.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// The call failed for a reason other than a revert, e.g. an unreachable
/// node or a rejected nonce.
#[derive(Debug, thiserror::Error)]
#[error("call failed without reverting: {message}")]
pub struct NotARevert {
    pub message: String,
}

impl NotARevert {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// A failure that may stand for a reverted call.
///
/// `Ok(None)` is a revert that carried no return data and is judged like
/// empty return data. Failures that are not reverts at all are handed back
/// as [`NotARevert`].
pub trait RevertData {
    fn revert_data(&self) -> Result<Option<Bytes>, NotARevert>;
}

impl RevertData for RpcError<TransportErrorKind> {
    fn revert_data(&self) -> Result<Option<Bytes>, NotARevert> {
        let Some(payload) = self.as_error_resp() else {
            return Err(NotARevert::new(self));
        };
        let is_revert = payload.code == EXECUTION_REVERTED_CODE
            || payload.message.to_lowercase().contains("revert");
        if !is_revert {
            return Err(NotARevert::new(self));
        }
        Ok(payload.as_revert_data())
    }
}

impl RevertData for alloy::contract::Error {
    fn revert_data(&self) -> Result<Option<Bytes>, NotARevert> {
        match self {
            alloy::contract::Error::TransportError(err) => err.revert_data(),
            _ => Err(NotARevert::new(self)),
        }
    }
}

impl RevertData for Bytes {
    fn revert_data(&self) -> Result<Option<Bytes>, NotARevert> {
        Ok(Some(self.clone()))
    }
}

impl RevertData for Option<Bytes> {
    fn revert_data(&self) -> Result<Option<Bytes>, NotARevert> {
        Ok(self.clone())
    }
}

impl<T: RevertData + ?Sized> RevertData for &T {
    fn revert_data(&self) -> Result<Option<Bytes>, NotARevert> {
        (**self).revert_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_response(json: &str) -> RpcError<TransportErrorKind> {
        RpcError::ErrorResp(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn revert_payload_is_taken_from_error_response() {
        let err = error_response(
            r#"{"code":3,"message":"execution reverted","data":"0xdeadbeef"}"#,
        );
        assert_eq!(
            err.revert_data().unwrap(),
            Some(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]))
        );
    }

    #[test]
    fn revert_without_data_has_no_payload() {
        let err = error_response(r#"{"code":3,"message":"execution reverted"}"#);
        assert_eq!(err.revert_data().unwrap(), None);

        let err = error_response(
            r#"{"code":-32603,"message":"VM Exception while processing transaction: revert"}"#,
        );
        assert_eq!(err.revert_data().unwrap(), None);
    }

    #[test]
    fn node_errors_are_not_reverts() {
        let err = error_response(r#"{"code":-32000,"message":"nonce too low","data":"0x01"}"#);
        let not_a_revert = err.revert_data().unwrap_err();
        assert!(not_a_revert.message.contains("nonce too low"), "{not_a_revert}");
    }

    #[test]
    fn transport_failures_are_not_reverts() {
        assert!(RpcError::<TransportErrorKind>::NullResp.revert_data().is_err());
        assert!(TransportErrorKind::backend_gone().revert_data().is_err());
    }

    #[test]
    fn contract_errors_forward_transport_payload() {
        let err = alloy::contract::Error::TransportError(error_response(
            r#"{"code":3,"message":"execution reverted","data":"0x4e487b71"}"#,
        ));
        assert_eq!(
            err.revert_data().unwrap(),
            Some(Bytes::from_static(&[0x4e, 0x48, 0x7b, 0x71]))
        );
        assert!(
            alloy::contract::Error::NotADeploymentTransaction
                .revert_data()
                .is_err()
        );
    }
}

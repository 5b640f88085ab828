//! Deferred, negation-aware expectations about how a call settles.
//!
//! A matcher only describes the condition and the messages for each way a
//! call can settle; [`Check`] applies the negation flag, so the `not` form
//! of every matcher comes for free.

use std::{
    fmt,
    future::{Future, IntoFuture},
    pin::Pin,
    task::{Context, Poll},
};

use alloy::primitives::{Bytes, U256};

use crate::{
    error::{AssertionFailure, RevertAssertionError},
    return_data::{DecodedReturnData, classify},
    revert_data::{NotARevert, RevertData},
};

mod reverted_with;
mod reverted_with_panic;
mod reverted_without_reason;

pub use reverted_with::RevertedWith;
pub use reverted_with_panic::RevertedWithPanic;
pub use reverted_without_reason::RevertedWithoutReason;

/// Outcome of a single check before negation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// The expected condition does not hold.
    Unmet { message: String },
    /// The expected condition holds. Without a negated message the `not`
    /// form of the check is never reported.
    Met { negated_message: Option<String> },
}

impl Check {
    pub fn unmet(message: impl Into<String>) -> Self {
        Self::Unmet {
            message: message.into(),
        }
    }

    pub fn met(negated_message: impl Into<String>) -> Self {
        Self::Met {
            negated_message: Some(negated_message.into()),
        }
    }

    pub fn compare(
        condition: bool,
        message: impl Into<String>,
        negated_message: impl Into<String>,
    ) -> Self {
        if condition {
            Self::met(negated_message)
        } else {
            Self::unmet(message)
        }
    }

    pub fn resolve(self, negated: bool) -> Result<(), AssertionFailure> {
        match (self, negated) {
            (Self::Unmet { message }, false) => Err(AssertionFailure::new(message)),
            (
                Self::Met {
                    negated_message: Some(message),
                },
                true,
            ) => Err(AssertionFailure::new(message)),
            _ => Ok(()),
        }
    }
}

/// An expectation about the way a call reverted.
pub trait RevertMatcher: fmt::Debug + Send + Sync {
    /// The call went through without reverting.
    fn on_success(&self) -> Check;

    /// The call reverted with the given return data.
    fn on_revert(&self, decoded: &DecodedReturnData) -> Check;
}

/// How the checked call settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Succeeded,
    /// `None` when the failure carried no return data at all.
    Reverted(Option<Bytes>),
}

impl Settlement {
    /// Fails with [`NotARevert`] when the call failed without reverting.
    pub fn from_result<T, E: RevertData>(result: &Result<T, E>) -> Result<Self, NotARevert> {
        match result {
            Ok(_) => Ok(Self::Succeeded),
            Err(err) => Ok(Self::Reverted(err.revert_data()?)),
        }
    }
}

/// Decides whether `settlement` satisfies `matcher`.
pub fn judge<M: RevertMatcher + ?Sized>(
    matcher: &M,
    settlement: Settlement,
    negated: bool,
) -> Result<(), RevertAssertionError> {
    let data = match settlement {
        Settlement::Succeeded => {
            tracing::debug!(?matcher, negated, "Call did not revert");
            return matcher.on_success().resolve(negated).map_err(Into::into);
        }
        Settlement::Reverted(data) => data,
    };

    let decoded = match data {
        Some(data) => classify(&data)?,
        None => DecodedReturnData::Empty,
    };
    tracing::debug!(?matcher, negated, %decoded, "Call reverted");

    matcher
        .on_revert(&decoded)
        .resolve(negated)
        .map_err(|failure| failure.with_actual(decoded).into())
}

/// Waits for `pending` and checks that it reverted with `expected_reason`.
///
/// With `negated` set, fails only if it reverted with exactly that reason.
/// A failure that is not a revert is returned as
/// [`RevertAssertionError::NotARevert`] either way.
pub async fn evaluate<F, T, E>(
    pending: F,
    expected_reason: impl Into<String>,
    negated: bool,
) -> Result<(), RevertAssertionError>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: RevertData,
{
    let matcher = RevertedWith::new(expected_reason);
    let result = pending.await;
    judge(&matcher, Settlement::from_result(&result)?, negated)
}

/// Starts an expectation about a call that has not settled yet.
///
/// ```ignore
/// expect(token.transfer(bob, amount).call())
///     .reverted_with("insufficient balance")
///     .await?;
/// expect(token.transfer(bob, amount).call())
///     .not()
///     .reverted_with_panic(None)
///     .await?;
/// ```
pub fn expect<F: IntoFuture>(pending: F) -> Expect<F::IntoFuture> {
    Expect {
        pending: pending.into_future(),
        negated: false,
    }
}

#[derive(Debug)]
pub struct Expect<F> {
    pending: F,
    negated: bool,
}

impl<F> Expect<F> {
    /// Inverts the expectation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl<'a, F, T, E> Expect<F>
where
    F: Future<Output = Result<T, E>> + Send + 'a,
    T: Send + 'a,
    E: RevertData + Send + 'a,
{
    pub fn reverted_with(self, reason: impl Into<String>) -> PendingAssertion<'a> {
        self.with_matcher(RevertedWith::new(reason))
    }

    pub fn reverted_without_reason(self) -> PendingAssertion<'a> {
        self.with_matcher(RevertedWithoutReason)
    }

    /// `None` accepts any panic code.
    pub fn reverted_with_panic(self, code: impl Into<Option<U256>>) -> PendingAssertion<'a> {
        self.with_matcher(RevertedWithPanic::new(code))
    }

    pub fn with_matcher<M: RevertMatcher + 'a>(self, matcher: M) -> PendingAssertion<'a> {
        let Self { pending, negated } = self;
        PendingAssertion {
            inner: Box::pin(async move {
                let result = pending.await;
                Settlement::from_result(&result)
                    .map_err(RevertAssertionError::from)
                    .and_then(|settlement| judge(&matcher, settlement, negated))
            }),
        }
    }
}

/// An expectation waiting for its call to settle. Resolves to `Ok(())`
/// when the expectation holds.
pub struct PendingAssertion<'a> {
    inner: Pin<Box<dyn Future<Output = Result<(), RevertAssertionError>> + Send + 'a>>,
}

impl fmt::Debug for PendingAssertion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAssertion").finish()
    }
}

impl Future for PendingAssertion<'_> {
    type Output = Result<(), RevertAssertionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmet_check_fails_only_when_not_negated() {
        let check = Check::unmet("nope");
        assert_eq!(
            check.clone().resolve(false),
            Err(AssertionFailure::new("nope"))
        );
        assert_eq!(check.resolve(true), Ok(()));
    }

    #[test]
    fn met_check_fails_only_when_negated() {
        let check = Check::met("was");
        assert_eq!(check.clone().resolve(false), Ok(()));
        assert_eq!(check.resolve(true), Err(AssertionFailure::new("was")));
    }

    #[test]
    fn met_check_without_negated_message_never_fails() {
        let check = Check::Met {
            negated_message: None,
        };
        assert_eq!(check.clone().resolve(false), Ok(()));
        assert_eq!(check.resolve(true), Ok(()));
    }

    #[test]
    fn compare_picks_message_by_condition() {
        assert_eq!(Check::compare(false, "a", "b"), Check::unmet("a"));
        assert_eq!(Check::compare(true, "a", "b"), Check::met("b"));
    }

    #[test]
    fn missing_revert_data_is_judged_as_empty() {
        let err = judge(&RevertedWith::new("x"), Settlement::Reverted(None), false).unwrap_err();
        let failure = err.as_failure().unwrap();
        assert_eq!(failure.actual, Some(DecodedReturnData::Empty));
        assert!(failure.message.ends_with("but it reverted without a reason"));
    }

    #[test]
    fn success_failures_carry_no_actual_data() {
        let err = judge(&RevertedWith::new("x"), Settlement::Succeeded, false).unwrap_err();
        assert_eq!(err.as_failure().unwrap().actual, None);
    }

    #[test]
    fn failures_that_are_not_reverts_are_surfaced() {
        let result: Result<(), _> = Err(alloy::transports::TransportErrorKind::backend_gone());
        let err = Settlement::from_result(&result).unwrap_err();
        assert!(err.message.contains("backend connection task has stopped"), "{err}");
    }

    #[test]
    fn decoding_errors_are_not_assertion_failures() {
        let data = Bytes::from_static(&[0x08, 0xc3, 0x79, 0xa0, 0x00]);
        for negated in [false, true] {
            let err = judge(
                &RevertedWith::new("x"),
                Settlement::Reverted(Some(data.clone())),
                negated,
            )
            .unwrap_err();
            assert!(matches!(err, RevertAssertionError::Decoding(_)));
        }
    }
}

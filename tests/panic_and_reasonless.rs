use alloy::{
    primitives::{Bytes, U256},
    sol_types::{Panic, Revert, SolError},
};
use revert_expectations::{RevertAssertionError, expect};

async fn settle(data: Option<Vec<u8>>) -> Result<(), Option<Bytes>> {
    Err(data.map(Bytes::from))
}

async fn succeed() -> Result<(), Option<Bytes>> {
    Ok(())
}

fn reason(reason: &str) -> Option<Vec<u8>> {
    Some(
        Revert {
            reason: reason.to_string(),
        }
        .abi_encode(),
    )
}

fn panic_code(code: u64) -> Option<Vec<u8>> {
    Some(
        Panic {
            code: U256::from(code),
        }
        .abi_encode(),
    )
}

fn failure_message(result: Result<(), RevertAssertionError>) -> String {
    match result {
        Err(RevertAssertionError::Failed(failure)) => failure.message,
        other => panic!("expected an assertion failure, got {other:?}"),
    }
}

#[tokio::test]
async fn reasonless_revert_matches_empty_data() {
    expect(settle(None)).reverted_without_reason().await.unwrap();
    expect(settle(Some(Vec::new())))
        .reverted_without_reason()
        .await
        .unwrap();

    let message = failure_message(expect(settle(None)).not().reverted_without_reason().await);
    assert_eq!(
        message,
        "Expected transaction NOT to be reverted without reason, but it was"
    );
}

#[tokio::test]
async fn reasonless_revert_rejects_other_outcomes() {
    let cases = [
        (
            succeed().await,
            "Expected transaction to be reverted without reason, but it didn't revert",
        ),
        (
            settle(reason("boom")).await,
            "Expected transaction to be reverted without reason, but it reverted with reason 'boom'",
        ),
        (
            settle(panic_code(0x12)).await,
            "Expected transaction to be reverted without reason, but it reverted with panic code 0x12 (Division or modulo division by zero)",
        ),
        (
            settle(Some(vec![1, 2, 3, 4])).await,
            "Expected transaction to be reverted without reason, but it reverted with a custom error",
        ),
    ];
    for (outcome, expected) in cases {
        let negated = expect(std::future::ready(outcome.clone()))
            .not()
            .reverted_without_reason()
            .await;
        assert!(negated.is_ok(), "{expected}");

        let message =
            failure_message(expect(std::future::ready(outcome)).reverted_without_reason().await);
        assert_eq!(message, expected);
    }
}

#[tokio::test]
async fn any_panic_code_is_accepted_without_expected_code() {
    expect(settle(panic_code(0x32)))
        .reverted_with_panic(None)
        .await
        .unwrap();

    let message = failure_message(expect(settle(panic_code(0x32))).not().reverted_with_panic(None).await);
    assert_eq!(
        message,
        "Expected transaction NOT to be reverted with some panic code, but it reverted with panic code 0x32 (Array accessed at an out-of-bounds or negative index)"
    );
}

#[tokio::test]
async fn expected_panic_code_must_match() {
    expect(settle(panic_code(0x11)))
        .reverted_with_panic(U256::from(0x11))
        .await
        .unwrap();

    let message = failure_message(
        expect(settle(panic_code(0x12)))
            .reverted_with_panic(U256::from(0x11))
            .await,
    );
    assert_eq!(
        message,
        "Expected transaction to be reverted with panic code 0x11 (Arithmetic operation underflowed or overflowed outside of an unchecked block), but it reverted with panic code 0x12 (Division or modulo division by zero)"
    );

    let message = failure_message(
        expect(settle(panic_code(0x11)))
            .not()
            .reverted_with_panic(U256::from(0x11))
            .await,
    );
    assert_eq!(
        message,
        "Expected transaction NOT to be reverted with panic code 0x11 (Arithmetic operation underflowed or overflowed outside of an unchecked block), but it was"
    );
}

#[tokio::test]
async fn panic_expectation_rejects_non_panics() {
    let message = failure_message(expect(succeed()).reverted_with_panic(U256::from(0x99)).await);
    assert_eq!(
        message,
        "Expected transaction to be reverted with panic code 0x99 (unknown panic code), but it didn't revert"
    );

    let message = failure_message(expect(settle(None)).reverted_with_panic(None).await);
    assert_eq!(
        message,
        "Expected transaction to be reverted with some panic code, but it reverted without a reason"
    );

    let message = failure_message(expect(settle(reason("boom"))).reverted_with_panic(None).await);
    assert_eq!(
        message,
        "Expected transaction to be reverted with some panic code, but it reverted with reason 'boom'"
    );

    expect(settle(reason("boom")))
        .not()
        .reverted_with_panic(None)
        .await
        .unwrap();
}

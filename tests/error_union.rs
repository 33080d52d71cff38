//! Integration tests for error set tracking through combinators
//!
//! Most assertions here are the type annotations themselves: each `let`
//! pins the exact error set a combinator must produce.

use tideline::{
    assert_err, assert_ok, combine, err, from_result, ok, AsyncResult, Errors, Never, OneOf,
};

#[derive(Debug, PartialEq)]
struct NotFound;

#[derive(Debug, PartialEq)]
struct Timeout;

#[derive(Debug, PartialEq)]
struct Denied;

#[derive(Debug, PartialEq)]
struct HttpNotFound;

#[derive(Debug, PartialEq)]
struct TooLarge;

type Lookup = AsyncResult<u32, Errors![NotFound, Timeout, Denied]>;

fn lookup(kind: u8) -> Lookup {
    match kind {
        0 => AsyncResult::ok(7),
        1 => AsyncResult::err(NotFound),
        2 => AsyncResult::err(Timeout),
        _ => AsyncResult::err(Denied),
    }
}

#[tokio::test]
async fn test_ok_has_empty_error_set() {
    let result: AsyncResult<i32, Never> = ok(1);
    assert_ok!(result, 1);
}

#[tokio::test]
async fn test_map_keeps_error_set() {
    let result: AsyncResult<String, Errors![NotFound, Timeout, Denied]> =
        lookup(0).map(|n| n.to_string());
    assert_ok!(result, "7".to_string());
}

#[tokio::test]
async fn test_map_err_removes_exactly_the_handled_kind() {
    let result: AsyncResult<u32, Errors![NotFound, Denied]> =
        lookup(2).map_err(|_: Timeout| ok(0));
    assert_ok!(result, 0);

    let result: AsyncResult<u32, Errors![NotFound, Denied]> =
        lookup(3).map_err(|_: Timeout| ok(0));
    assert_eq!(assert_err!(result, Denied), Denied);
}

#[tokio::test]
async fn test_map_err_handler_errors_join_the_remainder() {
    let result: AsyncResult<u32, Errors![NotFound, Denied, HttpNotFound]> =
        lookup(2).map_err(|_: Timeout| Err::<u32, _>(HttpNotFound));
    assert_eq!(assert_err!(result, HttpNotFound), HttpNotFound);
}

#[tokio::test]
async fn test_map_err_translates_into_a_new_kind() {
    let result: AsyncResult<i32, Errors![HttpNotFound]> =
        err::<i32, _>(NotFound).map_err(|_: NotFound| Err::<i32, _>(HttpNotFound));
    let error: OneOf<HttpNotFound, Never> = assert_err!(result);
    assert_eq!(error, OneOf::Here(HttpNotFound));
}

#[tokio::test]
async fn test_map_err_handler_repeating_a_kind_is_folded_by_widen() {
    let repeated: AsyncResult<u32, Errors![NotFound, Denied, Denied]> =
        lookup(2).map_err(|_: Timeout| Err::<u32, _>(Denied));
    let folded: AsyncResult<u32, Errors![NotFound, Denied]> = repeated.widen();
    assert_eq!(assert_err!(folded, Denied), Denied);
}

#[tokio::test]
async fn test_map_err_within_keeps_the_remainder() {
    let result: AsyncResult<u32, Errors![NotFound, Denied]> =
        lookup(2).map_err_within(|_: Timeout| Err::<u32, _>(Denied));
    assert_eq!(assert_err!(result, Denied), Denied);
}

#[tokio::test]
async fn test_and_then_on_infallible_result_takes_mapper_errors() {
    let result: AsyncResult<i32, Errors![TooLarge]> =
        ok(5).and_then(|v| if v > 6 { Err(TooLarge) } else { Ok(v) });
    assert_ok!(result, 5);

    let result: AsyncResult<i32, Errors![TooLarge]> =
        ok(8).and_then(|v| if v > 6 { Err(TooLarge) } else { Ok(v) });
    assert_eq!(assert_err!(result, TooLarge), TooLarge);
}

#[tokio::test]
async fn test_handling_every_kind_reaches_never() {
    let result: AsyncResult<u32, Never> = lookup(1)
        .map_err(|_: Denied| ok(3))
        .map_err(|_: NotFound| ok(1))
        .map_err(|_: Timeout| ok(2));
    assert_eq!(result.promise().await.ok(), Some(1));
}

#[tokio::test]
async fn test_map_any_err_replaces_error_set() {
    let result: AsyncResult<u32, Errors![Denied]> = lookup(1).map_any_err(|fault| {
        if fault.kind::<NotFound, _>().is_some() {
            Err(Denied)
        } else {
            Ok(0)
        }
    });
    assert_eq!(assert_err!(result, Denied), Denied);
}

#[tokio::test]
async fn test_nested_result_errors_append_to_the_set() {
    let inner = || AsyncResult::<u32, Errors![TooLarge]>::err(TooLarge);
    let result: AsyncResult<u32, Errors![NotFound, Timeout, Denied, TooLarge]> =
        lookup(0).and_then(move |_| inner());
    assert_eq!(assert_err!(result, TooLarge), TooLarge);
}

#[tokio::test]
async fn test_and_then_within_folds_into_the_set() {
    let inner = || AsyncResult::<u32, Errors![Timeout]>::err(Timeout);
    let result: AsyncResult<u32, Errors![NotFound, Timeout, Denied]> =
        lookup(0).and_then_within(move |_| inner());
    assert_eq!(assert_err!(result, Timeout), Timeout);
}

#[tokio::test]
async fn test_from_result_single_kind() {
    let result: AsyncResult<u32, Errors![NotFound]> = from_result(|| Err(NotFound));
    let error: OneOf<NotFound, Never> = assert_err!(result);
    assert_eq!(error, OneOf::Here(NotFound));
}

#[tokio::test]
async fn test_tuple_combine_concatenates_and_widen_folds() {
    let combined: AsyncResult<(u32, u32), Errors![NotFound, Timeout, Denied, NotFound, Timeout, Denied]> =
        combine((lookup(0), lookup(2)));

    let folded: AsyncResult<(u32, u32), Errors![Denied, Timeout, NotFound]> =
        combined.widen();
    assert_eq!(assert_err!(folded, Timeout), Timeout);
}

#[tokio::test]
async fn test_err_kind_is_not_inspected() {
    let nested: AsyncResult<u32, Errors![AsyncResult<u32, Never>]> = err(ok(5));
    let inner = assert_err!(nested, AsyncResult<u32, Never>);
    assert_ok!(inner, 5);
}

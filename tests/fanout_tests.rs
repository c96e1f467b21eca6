//! End-to-end tests for the fan-out orchestrator over scripted ports.

mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use volley::error::{Error, InvocationError, NetworkErrorKind};
use volley::testkit::ScriptedTransport;
use volley::{ErrorStrategy, InvocationOptions, InvocationTarget};

use support::harness;

fn collect() -> InvocationOptions {
    InvocationOptions::default().with_error_strategy(ErrorStrategy::Collect)
}

fn target(id: &str) -> InvocationTarget {
    InvocationTarget::new(id, json!({}))
}

#[tokio::test]
async fn empty_target_list_resolves_empty() {
    let h = harness(&ScriptedTransport::new());
    let responses = h
        .engine
        .invoke(Vec::new(), None, InvocationOptions::default())
        .await
        .unwrap();
    assert!(responses.is_empty());
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test]
async fn sequential_abort_never_attempts_later_targets() {
    let transport = ScriptedTransport::new()
        .with_reply(200, "{}".into())
        .with_reply(404, "no such function".into());
    let h = harness(&transport);

    let err = h
        .engine
        .invoke(
            vec![target("a"), target("b"), target("c")],
            Some(Duration::from_secs(9)),
            InvocationOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.code(), "invocation-status");
    // Target c was never dispatched.
    assert_eq!(h.transport.call_count(), 2);
}

#[tokio::test]
async fn collect_returns_one_response_per_target_in_order() {
    let transport = ScriptedTransport::new()
        .with_reply(200, r#"{"ok": true}"#.into())
        .with_reply(404, "missing".into())
        .with_reply(503, "unavailable".into());
    let h = harness(&transport);

    let responses = h
        .engine
        .invoke(
            vec![target("a"), target("b"), target("c")],
            Some(Duration::from_secs(9)),
            collect(),
        )
        .await
        .unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(
        responses.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
    assert!(responses[0].is_success());
    assert_eq!(responses[0].body, Some(json!({"ok": true})));
    assert_eq!(responses[1].status_code, Some(404));
    assert_eq!(
        responses[1].error.as_ref().map(|f| f.code.as_str()),
        Some("invocation-status")
    );
    assert_eq!(responses[2].status_code, Some(503));
    assert!(!responses[2].is_success());
}

#[tokio::test(start_paused = true)]
async fn absurd_deadline_is_clamped_to_the_ceiling() {
    let transport = ScriptedTransport::new().with_delay(Duration::from_secs(30));
    let h = harness(&transport);
    let started = tokio::time::Instant::now();

    let err = h
        .engine
        .invoke(
            vec![target("a")],
            Some(Duration::from_millis(999_999_999)),
            InvocationOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Invocation(InvocationError::BatchTimeout { budget_ms: 25_000 })
    ));
    assert_eq!(started.elapsed(), Duration::from_millis(25_000));
}

#[tokio::test(start_paused = true)]
async fn deadline_is_split_evenly_across_targets() {
    // Target a answers after 4 s, which overruns its 3 s share of the
    // 9 s deadline; b and c answer immediately.
    let transport = ScriptedTransport::new()
        .with_delayed_reply(200, "{}".into(), Duration::from_secs(4))
        .with_reply(200, "{}".into())
        .with_reply(200, "{}".into());
    let h = harness(&transport);

    let responses = h
        .engine
        .invoke(
            vec![target("a").with_max_attempts(1), target("b"), target("c")],
            Some(Duration::from_secs(9)),
            collect(),
        )
        .await
        .unwrap();

    let fault = responses[0].error.as_ref().expect("a overran its budget");
    assert_eq!(fault.code, "per-call-timeout");
    assert!(fault.message.contains("3000 ms"), "{}", fault.message);
    assert!(responses[1].is_success());
    assert!(responses[2].is_success());
}

#[tokio::test(start_paused = true)]
async fn oversubscribed_per_call_timeout_is_downgraded() {
    // 20 s x 3 targets cannot fit a 9 s deadline; the fair 3 s share
    // applies instead.
    let transport = ScriptedTransport::new()
        .with_delayed_reply(200, "{}".into(), Duration::from_secs(4));
    let h = harness(&transport);

    let responses = h
        .engine
        .invoke(
            vec![target("a").with_max_attempts(1), target("b"), target("c")],
            Some(Duration::from_secs(9)),
            collect().with_per_call_timeout(Duration::from_secs(20)),
        )
        .await
        .unwrap();

    let fault = responses[0].error.as_ref().expect("a overran its budget");
    assert!(fault.message.contains("3000 ms"), "{}", fault.message);
}

#[tokio::test(start_paused = true)]
async fn always_failing_target_backs_off_linearly() {
    let transport = ScriptedTransport::new()
        .with_reply(500, "boom".into())
        .with_reply(500, "boom".into())
        .with_reply(500, "boom".into());
    let h = harness(&transport);
    let started = tokio::time::Instant::now();

    let responses = h
        .engine
        .invoke(vec![target("a")], Some(Duration::from_secs(5)), collect())
        .await
        .unwrap();

    // Three attempts separated by the 100 ms and 200 ms backoff gaps.
    assert_eq!(h.transport.call_count(), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(300));
    assert_eq!(responses[0].status_code, Some(500));
    assert_eq!(
        responses[0].error.as_ref().map(|f| f.code.as_str()),
        Some("invocation-status")
    );
}

#[tokio::test]
async fn max_attempts_override_caps_the_attempts() {
    let transport = ScriptedTransport::new()
        .with_network_error(NetworkErrorKind::ConnectionReset, "reset")
        .with_network_error(NetworkErrorKind::ConnectionReset, "reset")
        .with_network_error(NetworkErrorKind::ConnectionReset, "reset");
    let h = harness(&transport);

    let responses = h
        .engine
        .invoke(
            vec![target("a").with_max_attempts(2)],
            Some(Duration::from_secs(5)),
            collect(),
        )
        .await
        .unwrap();

    assert_eq!(h.transport.call_count(), 2);
    assert_eq!(
        responses[0].error.as_ref().map(|f| f.code.as_str()),
        Some("network")
    );
}

#[tokio::test(start_paused = true)]
async fn transient_network_failure_is_retried_to_success() {
    let transport = ScriptedTransport::new()
        .with_network_error(NetworkErrorKind::ConnectionReset, "reset")
        .with_reply(200, r#"{"ok": true}"#.into());
    let h = harness(&transport);
    let started = tokio::time::Instant::now();

    let responses = h
        .engine
        .invoke(vec![target("a")], Some(Duration::from_secs(5)), collect())
        .await
        .unwrap();

    assert!(responses[0].is_success());
    assert_eq!(h.transport.call_count(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(100));
}

#[tokio::test]
async fn caller_predicate_overrides_default_retriability() {
    // 404 is terminal by default; the predicate retries it.
    let transport = ScriptedTransport::new()
        .with_reply(404, "missing".into())
        .with_reply(200, "{}".into());
    let h = harness(&transport);

    let retry_404 = target("a")
        .with_retry_predicate(Arc::new(|status, _| status == Some(404)));
    let responses = h
        .engine
        .invoke(vec![retry_404], Some(Duration::from_secs(5)), collect())
        .await
        .unwrap();

    assert!(responses[0].is_success());
    assert_eq!(h.transport.call_count(), 2);

    // 500 is retriable by default; the predicate refuses it.
    let transport = ScriptedTransport::new().with_reply(500, "boom".into());
    let h = harness(&transport);

    let never_retry = target("b").with_retry_predicate(Arc::new(|_, _| false));
    let responses = h
        .engine
        .invoke(vec![never_retry], Some(Duration::from_secs(5)), collect())
        .await
        .unwrap();

    assert!(!responses[0].is_success());
    assert_eq!(h.transport.call_count(), 1);
}

#[tokio::test]
async fn parallel_abort_discards_the_successful_sibling() {
    let transport = ScriptedTransport::new()
        .with_reply(200, "{}".into())
        .with_reply(404, "missing".into());
    let h = harness(&transport);

    let err = h
        .engine
        .invoke(
            vec![target("a"), target("b")],
            Some(Duration::from_secs(9)),
            InvocationOptions::default().parallel(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.component(), "invocation");
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn parallel_collect_settles_everything_in_input_order() {
    let transport = ScriptedTransport::new()
        .with_reply(200, "a-body".into())
        .with_reply(503, "unavailable".into())
        .with_reply(200, "c-body".into());
    let h = harness(&transport);

    let responses = h
        .engine
        .invoke(
            vec![target("a"), target("b"), target("c")],
            Some(Duration::from_secs(9)),
            collect().parallel(),
        )
        .await
        .unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].body, Some(Value::String("a-body".into())));
    assert_eq!(responses[1].status_code, Some(503));
    assert!(!responses[1].is_success());
    assert_eq!(responses[2].body, Some(Value::String("c-body".into())));
}

#[tokio::test(start_paused = true)]
async fn parallel_mode_is_unlimited_by_default() {
    let transport = ScriptedTransport::new().with_delay(Duration::from_millis(100));
    let h = harness(&transport);
    let started = tokio::time::Instant::now();

    let responses = h
        .engine
        .invoke(
            vec![target("a"), target("b"), target("c"), target("d")],
            None,
            collect().parallel(),
        )
        .await
        .unwrap();

    assert_eq!(responses.len(), 4);
    // All four calls ran concurrently.
    assert_eq!(started.elapsed(), Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn max_concurrency_caps_outstanding_requests() {
    let transport = ScriptedTransport::new().with_delay(Duration::from_millis(100));
    let h = harness(&transport);
    let started = tokio::time::Instant::now();

    let responses = h
        .engine
        .invoke(
            vec![target("a"), target("b"), target("c"), target("d")],
            None,
            collect().parallel().with_max_concurrency(2),
        )
        .await
        .unwrap();

    assert_eq!(responses.len(), 4);
    // Two waves of two.
    assert_eq!(started.elapsed(), Duration::from_millis(200));
}

#[tokio::test]
async fn invoke_call_matches_the_wire_contract() {
    let transport = ScriptedTransport::new().with_reply(200, "{}".into());
    let calls = transport.calls_handle();
    let h = harness(&transport);

    h.engine
        .invoke(
            vec![InvocationTarget::new("fn-1", json!({"q": 1}))
                .with_header("x-tenant", "acme")],
            Some(Duration::from_secs(5)),
            InvocationOptions::default(),
        )
        .await
        .unwrap();

    let recorded = calls.lock().clone();
    assert_eq!(recorded.len(), 1);
    let call = &recorded[0];

    assert_eq!(
        call.url,
        "https://faas.example.com/api/account/acct-1/lambdas/fn-1/invoke\
         ?v=1&externalSystem=fn-1_acct-1"
    );
    assert_eq!(call.method.as_str(), "POST");

    let header = |name: &str| {
        call.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    };
    assert_eq!(header("Authorization"), Some("Bearer scripted-token".into()));
    assert_eq!(header("Content-Type"), Some("application/json".into()));
    assert!(!header("X-Request-Id").unwrap().is_empty());

    let body: Value = serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
    assert!(body["timestamp"].is_i64());
    assert_eq!(body["payload"], json!({"q": 1}));
    assert_eq!(body["headers"], json!([{"key": "x-tenant", "value": "acme"}]));
}

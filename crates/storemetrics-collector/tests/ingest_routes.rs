//! End-to-end behavior of the ingest and exposition routes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use axum::http::StatusCode;
use futures_util::future::join_all;
use storemetrics_core::{Aggregate, LabelTuple};

use common::{app, get, post_json, samples};

#[tokio::test]
async fn interaction_counter_scenario() {
    let (_, router) = app();
    for _ in 0..3 {
        let (status, body) = post_json(&router, "/metric/interaction", r#"{"action":"click"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    let (status, text) = get(&router, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<_> = samples(&text)
        .into_iter()
        .filter(|l| l.starts_with("frontend_user_interactions_total"))
        .collect();
    assert_eq!(lines, vec![r#"frontend_user_interactions_total{action="click"} 3"#]);
}

#[tokio::test]
async fn availability_gauge_last_write_wins() {
    let (_, router) = app();
    post_json(
        &router,
        "/collect",
        r#"{"name":"frontend_product_availability","value":0,"labels":{"product_id":"4"},"timestamp":1700000000000}"#,
    )
    .await;
    post_json(
        &router,
        "/collect",
        r#"{"name":"frontend_product_availability","value":1,"labels":{"product_id":"4"}}"#,
    )
    .await;

    let (_, text) = get(&router, "/metrics").await;
    assert!(
        samples(&text).contains(&r#"frontend_product_availability{product_id="4"} 1"#),
        "{text}"
    );
}

#[tokio::test]
async fn unknown_metric_is_accepted_without_state_change() {
    let (state, router) = app();
    let (_, before) = get(&router, "/metrics").await;

    let (status, body) = post_json(
        &router,
        "/collect",
        r#"{"name":"frontend_does_not_exist","value":1,"labels":{}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (_, after) = get(&router, "/metrics").await;
    assert_eq!(before, after);
    assert!(!after.contains("frontend_does_not_exist"));

    let (_, internal) = get(&router, "/internal/metrics").await;
    assert!(internal.contains(
        r#"storemetrics_ingest_rejected_total{route="/collect",reason="unknown_metric"} 1"#
    ));
    assert!(state.registry().snapshot().families.iter().all(|f| f.series.is_empty()));
}

#[tokio::test]
async fn missing_label_key_creates_no_series() {
    let (state, router) = app();
    let (status, _) = post_json(
        &router,
        "/collect",
        r#"{"name":"frontend_purchase_attempt","value":1,"labels":{"product_id":"2"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let snap = state.registry().snapshot();
    assert!(snap.family("frontend_purchase_attempt").unwrap().series.is_empty());

    let (_, internal) = get(&router, "/internal/metrics").await;
    assert!(internal.contains(r#"reason="label_arity_mismatch"} 1"#), "{internal}");
}

#[tokio::test]
async fn generic_form_dispatches_on_registered_kind() {
    let (state, router) = app();
    post_json(
        &router,
        "/collect",
        r#"{"name":"frontend_api_result","value":1,"labels":{"status":"success","endpoint":"/products"}}"#,
    )
    .await;
    post_json(
        &router,
        "/collect",
        r#"{"name":"frontend_api_latency","value":42.5,"labels":{"endpoint":"/products"}}"#,
    )
    .await;

    let snap = state.registry().snapshot();
    assert_eq!(
        snap.get("frontend_api_result", &LabelTuple::from(["/products", "success"])),
        Some(&Aggregate::Counter(1.0))
    );
    let h = snap
        .get("frontend_api_latency", &LabelTuple::from(["/products"]))
        .and_then(Aggregate::as_histogram)
        .unwrap();
    assert_eq!(h.count, 1);
    assert_eq!(h.sum, 42.5);

    let (_, text) = get(&router, "/metrics").await;
    assert!(text.contains(r#"frontend_api_result{endpoint="/products",status="success"} 1"#));
    assert!(text.contains(r#"frontend_api_latency_bucket{endpoint="/products",le="+Inf"} 1"#));
    assert!(text.contains(r#"frontend_api_latency_count{endpoint="/products"} 1"#));
}

#[tokio::test]
async fn bad_updates_still_answer_ok() {
    let (state, router) = app();
    let cases = [
        ("/collect", "not json"),
        ("/collect", r#"{"name":"frontend_api_result"}"#),
        ("/collect", r#"{"name":"frontend_api_result","value":-1,"labels":{"endpoint":"/","status":"error"}}"#),
        ("/collect", r#"{"name":"frontend_product_availability","value":1,"labels":{"product_id":4}}"#),
        ("/metric/pageload", r#"{"page":"/home"}"#),
        ("/metric/interaction", r#"{}"#),
        ("/metric/error", r#"{"kind":"typo"}"#),
    ];
    for (path, body) in cases {
        let (status, text) = post_json(&router, path, body).await;
        assert_eq!(status, StatusCode::OK, "{path} {body}");
        assert_eq!(text, "ok");
    }
    assert!(state.registry().snapshot().families.iter().all(|f| f.series.is_empty()));

    let (_, internal) = get(&router, "/internal/metrics").await;
    assert!(internal.contains(r#"storemetrics_ingest_rejected_total{route="/collect",reason="invalid_value"} 1"#));
    assert!(internal.contains(r#"storemetrics_ingest_rejected_total{route="/collect",reason="malformed_body"} 3"#));
    assert!(internal.contains(r#"storemetrics_ingest_rejected_total{route="/metric/pageload",reason="malformed_body"} 1"#));
}

#[tokio::test]
async fn pageload_and_error_forms() {
    let (state, router) = app();
    post_json(&router, "/metric/pageload", r#"{"page":"/home","duration":0.3}"#).await;
    post_json(&router, "/metric/pageload", r#"{"page":"/home","duration":1.2}"#).await;
    post_json(&router, "/metric/error", r#"{"type":"fetch"}"#).await;

    let snap = state.registry().snapshot();
    let h = snap
        .get("frontend_page_load_time_seconds", &LabelTuple::from(["/home"]))
        .and_then(Aggregate::as_histogram)
        .unwrap();
    assert_eq!(h.count, 2);
    assert!((h.sum - 1.5).abs() < 1e-9);

    let (_, text) = get(&router, "/metrics").await;
    assert!(text.contains(r#"frontend_page_load_time_seconds_bucket{page="/home",le="0.5"} 1"#));
    assert!(text.contains(r#"frontend_page_load_time_seconds_bucket{page="/home",le="2.5"} 2"#));
    assert!(text.contains(r#"frontend_errors_total{type="fetch"} 1"#));

    let (_, internal) = get(&router, "/internal/metrics").await;
    assert!(internal.contains(r#"storemetrics_ingest_updates_total{route="/metric/pageload"} 2"#));
}

#[tokio::test]
async fn concurrent_posts_do_not_lose_increments() {
    let (_, router) = app();
    let sends = (0..1000).map(|_| {
        let router = router.clone();
        async move { post_json(&router, "/metric/interaction", r#"{"action":"scroll"}"#).await }
    });
    let handles: Vec<_> = sends.map(tokio::spawn).collect();
    for res in join_all(handles).await {
        assert_eq!(res.unwrap().0, StatusCode::OK);
    }

    let (_, text) = get(&router, "/metrics").await;
    assert!(text.contains(r#"frontend_user_interactions_total{action="scroll"} 1000"#), "{text}");
}

#[tokio::test]
async fn exposition_headers_and_health() {
    let (_, router) = app();
    let (status, text) = get(&router, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("# TYPE frontend_product_availability gauge"));
    assert!(text.contains("# HELP frontend_api_latency API request latency in milliseconds"));

    let (status, body) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

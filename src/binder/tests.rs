//! Tests for the binder

use super::*;
use crate::auth::{AuthConfig, StaticAuth};
use crate::cache::MemoryCache;
use crate::decode::PayloadKind;
use crate::types::Method;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn binder_for(server: &MockServer) -> Binder {
    Binder::with_config(BinderConfig::builder().host(server.uri()).build()).unwrap()
}

fn timeline() -> EndpointDescriptor {
    EndpointDescriptor::builder("user_timeline", "/statuses/user_timeline.json")
        .allowed_params(&["user_id", "count", "since_id"])
        .payload(PayloadKind::Model("status"))
        .payload_list()
        .build()
}

#[test]
fn test_config_defaults() {
    let config = BinderConfig::default();
    assert_eq!(config.retry_count, 0);
    assert_eq!(config.retry_delay, Duration::ZERO);
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert!(config.retry_errors.contains(&429));
    assert!(config.retry_errors.contains(&503));
    assert!(!config.wait_on_rate_limit);
    assert!(!config.compression);
    assert_eq!(config.rate_limit_margin, Duration::from_secs(5));
}

#[test]
fn test_config_builder() {
    let config = BinderConfig::builder()
        .host("https://api.example.com")
        .api_root("/1.1")
        .retry_count(3)
        .retry_delay(Duration::from_millis(250))
        .retry_errors([500, 503])
        .timeout(Duration::from_secs(10))
        .compression()
        .wait_on_rate_limit()
        .wait_on_rate_limit_notify()
        .rate_limit_margin(Duration::from_secs(1))
        .proxy("http://proxy.internal:3128")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.host, Some("https://api.example.com".to_string()));
    assert_eq!(config.api_root, "/1.1");
    assert_eq!(config.retry_count, 3);
    assert_eq!(config.retry_errors.len(), 2);
    assert!(config.compression);
    assert!(config.wait_on_rate_limit);
    assert!(config.wait_on_rate_limit_notify);
    assert_eq!(config.proxy, Some("http://proxy.internal:3128".to_string()));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_invalid_proxy_is_a_config_error() {
    let result = Binder::with_config(BinderConfig::builder().proxy("not a url").build());
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_invalid_host_is_rejected_at_construction() {
    let result = Binder::with_config(BinderConfig::builder().host("not a url").build());
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[tokio::test]
async fn test_execute_decodes_model_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .and(query_param("user_id", "12"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])),
        )
        .mount(&server)
        .await;

    let binder = binder_for(&server);
    let decoded = binder
        .execute(&timeline(), &CallArgs::new().arg("user_id", 12u64))
        .await
        .unwrap();

    assert_eq!(decoded, Decoded::List(vec![json!({"id": 1}), json!({"id": 2})]));
}

#[tokio::test]
async fn test_unknown_argument_issues_no_network_call() {
    let server = MockServer::start().await;
    // No mock mounted: any request would 404 and be recorded.

    let binder = binder_for(&server);
    let err = binder
        .execute(&timeline(), &CallArgs::new().arg("bogus", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownArgument { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_auth_required_without_authenticator_fails_before_io() {
    let server = MockServer::start().await;
    let descriptor = EndpointDescriptor::builder("home_timeline", "/statuses/home_timeline.json")
        .allowed_params(&["count"])
        .require_auth()
        .build();

    let binder = binder_for(&server);
    let err = binder.execute(&descriptor, &CallArgs::new()).await.unwrap_err();

    assert!(matches!(err, Error::Auth { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_auth_signs_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/home_timeline.json"))
        .and(header("Authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::builder("home_timeline", "/statuses/home_timeline.json")
        .allowed_params(&["count"])
        .require_auth()
        .payload(PayloadKind::Model("status"))
        .payload_list()
        .build();

    let binder = binder_for(&server)
        .with_authenticator(Arc::new(StaticAuth::new(AuthConfig::bearer("tok123"))));
    let decoded = binder.execute(&descriptor, &CallArgs::new()).await.unwrap();

    assert_eq!(decoded, Decoded::List(vec![]));
}

#[tokio::test]
async fn test_list_argument_transmitted_comma_joined() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/lookup.json"))
        .and(query_param("id", "3,1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::builder("statuses_lookup", "/statuses/lookup.json")
        .allowed_params(&["id"])
        .payload(PayloadKind::Model("status"))
        .payload_list()
        .build();

    let binder = binder_for(&server);
    binder
        .execute(&descriptor, &CallArgs::new().arg("id", vec![3u64, 1, 2]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_sends_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/statuses/update.json"))
        .and(body_string_contains("status=hello+world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::builder("update_status", "/statuses/update.json")
        .method(Method::POST)
        .allowed_params(&["status"])
        .payload(PayloadKind::Model("status"))
        .build();

    let binder = binder_for(&server);
    let decoded = binder
        .execute(&descriptor, &CallArgs::new().arg("status", "hello world"))
        .await
        .unwrap();

    assert_eq!(decoded, Decoded::Single(json!({"id": 9})));
}

#[tokio::test]
async fn test_api_root_prefixes_the_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .api_root("/1.1")
            .build(),
    )
    .unwrap();

    binder.execute(&timeline(), &CallArgs::new()).await.unwrap();
}

#[tokio::test]
async fn test_retry_count_bounds_attempts_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(3) // retry_count = 2 means exactly 3 attempts
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(2)
            .retry_delay(Duration::from_millis(10))
            .build(),
    )
    .unwrap();

    let err = binder.execute(&timeline(), &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 503, .. }));
}

#[tokio::test]
async fn test_retry_recovers_after_transient_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(3)
            .retry_delay(Duration::from_millis(10))
            .build(),
    )
    .unwrap();

    let decoded = binder.execute(&timeline(), &CallArgs::new()).await.unwrap();
    assert_eq!(decoded.len(), 1);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(5)
            .build(),
    )
    .unwrap();

    let err = binder.execute(&timeline(), &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::Client { status: 404, .. }));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .expect(1)
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(5)
            .build(),
    )
    .unwrap();

    let err = binder.execute(&timeline(), &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
}

#[tokio::test]
async fn test_decode_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(5)
            .build(),
    )
    .unwrap();

    let err = binder.execute(&timeline(), &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_rate_limited_without_wait_consumes_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(2)
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(1)
            .retry_delay(Duration::from_millis(10))
            .build(),
    )
    .unwrap();

    let err = binder.execute(&timeline(), &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { .. }));
}

#[tokio::test]
async fn test_wait_on_rate_limit_sleeps_until_reset() {
    let server = MockServer::start().await;
    let reset_at = Utc::now().timestamp() + 2;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-remaining", "0")
                .insert_header("x-rate-limit-reset", reset_at.to_string().as_str()),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // retry_count = 0: the rate-limit wait must not consume the retry budget.
    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .wait_on_rate_limit()
            .rate_limit_margin(Duration::ZERO)
            .build(),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let decoded = binder.execute(&timeline(), &CallArgs::new()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(decoded, Decoded::List(vec![]));
    assert!(elapsed >= Duration::from_secs(1), "slept only {elapsed:?}");
    assert!(elapsed < Duration::from_secs(10));
}

#[tokio::test]
async fn test_rate_limit_headers_update_tracker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-rate-limit-remaining", "14")
                .insert_header("x-rate-limit-reset", "1700000000")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let binder = binder_for(&server);
    binder.execute(&timeline(), &CallArgs::new()).await.unwrap();

    let state = binder.rate_limits().snapshot("user_timeline");
    assert_eq!(state.remaining, Some(14));
    assert_eq!(state.reset_at, Some(1_700_000_000));
}

#[tokio::test]
async fn test_cache_hit_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/show.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::builder("get_status", "/statuses/show.json")
        .allowed_params(&["id"])
        .payload(PayloadKind::Model("status"))
        .use_cache()
        .build();

    let binder = binder_for(&server).with_cache(Arc::new(MemoryCache::default()));
    let args = CallArgs::new().arg("id", 42u64);

    let first = binder.execute(&descriptor, &args).await.unwrap();
    let second = binder.execute(&descriptor, &args).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_ignored_for_non_cacheable_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    // timeline() does not declare use_cache
    let binder = binder_for(&server).with_cache(Arc::new(MemoryCache::default()));
    binder.execute(&timeline(), &CallArgs::new()).await.unwrap();
    binder.execute(&timeline(), &CallArgs::new()).await.unwrap();
}

#[tokio::test]
async fn test_verify_downgrades_401_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/verify_credentials.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid"))
        .mount(&server)
        .await;

    let descriptor =
        EndpointDescriptor::builder("verify_credentials", "/account/verify_credentials.json")
            .allowed_params(&["include_entities", "skip_status"])
            .require_auth()
            .payload(PayloadKind::Model("user"))
            .build();

    let binder = binder_for(&server)
        .with_authenticator(Arc::new(StaticAuth::new(AuthConfig::bearer("stale"))));

    let result = binder.verify(&descriptor, &CallArgs::new()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_verify_passes_other_errors_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/verify_credentials.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let descriptor =
        EndpointDescriptor::builder("verify_credentials", "/account/verify_credentials.json")
            .payload(PayloadKind::Model("user"))
            .build();

    let binder = binder_for(&server);
    let err = binder.verify(&descriptor, &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 500, .. }));
}

#[tokio::test]
async fn test_verify_returns_decoded_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/verify_credentials.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"screen_name": "alice"})))
        .mount(&server)
        .await;

    let descriptor =
        EndpointDescriptor::builder("verify_credentials", "/account/verify_credentials.json")
            .payload(PayloadKind::Model("user"))
            .build();

    let binder = binder_for(&server);
    let result = binder.verify(&descriptor, &CallArgs::new()).await.unwrap();
    assert_eq!(result, Some(Decoded::Single(json!({"screen_name": "alice"}))));
}

#[tokio::test]
async fn test_placeholder_resolved_on_each_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/statuses/retweet/777.json"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/statuses/retweet/777.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 777})))
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::builder("retweet", "/statuses/retweet/{id}.json")
        .method(Method::POST)
        .allowed_params(&["id"])
        .payload(PayloadKind::Model("status"))
        .build();

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .retry_count(1)
            .retry_delay(Duration::from_millis(10))
            .build(),
    )
    .unwrap();

    let decoded = binder
        .execute(&descriptor, &CallArgs::new().arg("id", 777u64))
        .await
        .unwrap();
    assert_eq!(decoded, Decoded::Single(json!({"id": 777})));
}

#[tokio::test]
async fn test_timeout_classified_and_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses/user_timeline.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!([])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let binder = Binder::with_config(
        BinderConfig::builder()
            .host(server.uri())
            .timeout(Duration::from_millis(100))
            .retry_count(1)
            .retry_delay(Duration::from_millis(10))
            .build(),
    )
    .unwrap();

    let err = binder.execute(&timeline(), &CallArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
}

#[tokio::test]
async fn test_full_url_path_bypasses_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let binder = Binder::with_config(BinderConfig::builder().host("https://unused.invalid").build())
        .unwrap();
    let url = format!("{}/absolute", server.uri());
    assert_eq!(binder.build_url(&url), url);
}

#[test]
fn test_binder_debug_does_not_leak_collaborators() {
    let binder = Binder::new().unwrap();
    let debug = format!("{binder:?}");
    assert!(debug.contains("Binder"));
    assert!(debug.contains("has_authenticator"));
}

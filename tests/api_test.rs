//! End-to-end tests against a running service.

use std::collections::HashSet;
use std::time::Duration;

use no_as_a_service::http::{LanguagesResponse, RejectionResponse};
use no_as_a_service::reasons::LANGUAGES;
use reqwest::StatusCode;

mod common;

fn bundled(code: &str) -> Vec<String> {
    let path = format!("{}/reasons/{}.json", env!("CARGO_MANIFEST_DIR"), code);
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_every_language_serves_its_own_reasons() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    for lang in LANGUAGES {
        let expected = bundled(lang.code);
        let res = client
            .get(server.url(&format!("/no?lang={}", lang.code)))
            .send()
            .await
            .expect("service unreachable");
        assert_eq!(res.status(), StatusCode::OK);

        let body: RejectionResponse = res.json().await.unwrap();
        assert_eq!(body.lang, lang.code);
        assert!(expected.contains(&body.reason), "{} not in {}", body.reason, lang.code);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_missing_or_unknown_lang_falls_back_to_english() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();
    let english = bundled("en");

    for path in ["/no", "/no?lang=tlh", "/no?lang=", "/no?other=1"] {
        let body: RejectionResponse = client
            .get(server.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body.lang, "en", "{path}");
        assert!(english.contains(&body.reason));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_region_subtag_resolves_to_base_language() {
    let server = common::spawn_server(common::test_config()).await;
    let body: RejectionResponse = common::client()
        .get(server.url("/no?lang=PT-br"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.lang, "pt");
    server.stop().await;
}

#[tokio::test]
async fn test_repeated_draws_cover_every_reason() {
    let mut config = common::test_config();
    config.rate_limit.enabled = false;
    let server = common::spawn_server(config).await;
    let client = common::client();

    let english: HashSet<String> = bundled("en").into_iter().collect();
    let mut seen = HashSet::new();
    for _ in 0..600 {
        let body: RejectionResponse = client
            .get(server.url("/no"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        seen.insert(body.reason);
        if seen.len() == english.len() {
            break;
        }
    }
    assert_eq!(seen, english);

    server.stop().await;
}

#[tokio::test]
async fn test_languages_endpoint_matches_directory() {
    let server = common::spawn_server(common::test_config()).await;
    let body: LanguagesResponse = common::client()
        .get(server.url("/languages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let codes: Vec<&str> = LANGUAGES.iter().map(|l| l.code).collect();
    assert_eq!(body.languages, codes);
    for lang in LANGUAGES {
        assert_eq!(body.names.get(lang.code).map(String::as_str), Some(lang.name));
    }
    assert_eq!(body.names.len(), LANGUAGES.len());

    server.stop().await;
}

#[tokio::test]
async fn test_rate_limit_blocks_then_recovers() {
    let mut config = common::test_config();
    config.rate_limit.max_requests = 3;
    config.rate_limit.window_ms = 500;
    let server = common::spawn_server(config).await;
    let client = common::client();

    for _ in 0..3 {
        let res = client.get(server.url("/no")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client.get(server.url("/no")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Too many requests, please try again later. (3 reqs/500ms/IP)"
    );

    tokio::time::sleep(Duration::from_millis(600)).await;

    let res = client.get(server.url("/no")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK, "window should have reset");

    server.stop().await;
}

#[tokio::test]
async fn test_rate_limit_is_per_forwarded_client() {
    let mut config = common::test_config();
    config.rate_limit.max_requests = 1;
    let server = common::spawn_server(config).await;
    let client = common::client();

    let send = |ip: &'static str| {
        client
            .get(server.url("/no"))
            .header("x-forwarded-for", format!("{ip}, 10.0.0.1"))
            .send()
    };

    assert_eq!(send("198.51.100.10").await.unwrap().status(), StatusCode::OK);
    assert_eq!(
        send("198.51.100.10").await.unwrap().status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(send("198.51.100.11").await.unwrap().status(), StatusCode::OK);

    server.stop().await;
}

#[tokio::test]
async fn test_static_assets() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("No as a Service"));

    let res = client.get(server.url("/nope.css")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_health_and_request_id() {
    let server = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let res = client
        .get(server.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "abc-123");

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["languages"], LANGUAGES.len());

    server.stop().await;
}

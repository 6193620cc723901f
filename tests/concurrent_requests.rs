//! Concurrency and idempotence tests for the gateway.

use std::sync::atomic::Ordering;
use std::time::Duration;

use reqwest::StatusCode;

mod common;

use common::{
    client, parse_url, start_gateway, start_programmable_upstream, start_upstream, test_config,
    RSS_FEED, SECRET,
};

#[tokio::test]
async fn test_repeated_requests_are_byte_identical() {
    let (upstream, hits) = start_upstream(200, RSS_FEED).await;
    let (gateway, shutdown) = start_gateway(test_config()).await;
    let client = client();
    let url = parse_url(gateway, upstream, "/feed");

    let first = client
        .get(&url)
        .header("X-Auth-Key", SECRET)
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    let second = client
        .get(&url)
        .header("X-Auth-Key", SECRET)
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();

    assert_eq!(first, second);
    // Nothing is cached: each request reaches the upstream.
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_does_not_block_other_requests() {
    let (slow, _) = start_programmable_upstream(|| async {
        tokio::time::sleep(Duration::from_millis(800)).await;
        (200, RSS_FEED.to_string())
    })
    .await;
    let (fast, _) = start_upstream(200, RSS_FEED).await;
    let (gateway, shutdown) = start_gateway(test_config()).await;
    let client = client();

    let slow_request = {
        let client = client.clone();
        let url = parse_url(gateway, slow, "/slow");
        tokio::spawn(async move {
            client
                .get(url)
                .header("X-Auth-Key", SECRET)
                .send()
                .await
                .unwrap()
                .status()
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    let started = std::time::Instant::now();
    let fast_status = client
        .get(parse_url(gateway, fast, "/fast"))
        .header("X-Auth-Key", SECRET)
        .send()
        .await
        .unwrap()
        .status();
    let fast_elapsed = started.elapsed();

    assert_eq!(fast_status, StatusCode::OK);
    assert!(
        fast_elapsed < Duration::from_millis(600),
        "fast request waited on slow upstream: {fast_elapsed:?}"
    );
    assert_eq!(slow_request.await.unwrap(), StatusCode::OK);

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_burst_all_succeed() {
    let (upstream, hits) = start_upstream(200, RSS_FEED).await;
    let (gateway, shutdown) = start_gateway(test_config()).await;
    let client = client();

    let concurrency = 16;
    let mut tasks = Vec::new();
    for i in 0..concurrency {
        let client = client.clone();
        let url = parse_url(gateway, upstream, &format!("/feed/{i}"));
        tasks.push(tokio::spawn(async move {
            client
                .get(url)
                .query(&[("jq", "$.items[1].title")])
                .header("X-Auth-Key", SECRET)
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap(), "\"Second post\"");
    }
    assert_eq!(hits.load(Ordering::SeqCst), concurrency);

    shutdown.trigger();
}

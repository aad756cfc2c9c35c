//! Integration tests for vembed Core

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};
use vembed_core::{
    build_mux_url, Error, LoaderConfig, MemoryDocument, MemoryGlobals, ResourceKind,
    ResourceLoader, VideoProvider,
};

type MemoryLoader = ResourceLoader<MemoryDocument, MemoryGlobals>;

fn browser_loader() -> Arc<MemoryLoader> {
    Arc::new(ResourceLoader::in_memory(LoaderConfig::default()))
}

/// Fire the load event for `key` as soon as the element shows up
fn auto_fire(loader: &Arc<MemoryLoader>, key: &'static str) -> tokio::task::JoinHandle<()> {
    let loader = loader.clone();
    tokio::spawn(async move {
        while !loader.dom().fire_load(key) {
            tokio::task::yield_now().await;
        }
    })
}

// =============================================================================
// Loading Tests
// =============================================================================

#[tokio::test]
async fn test_sequential_loads_append_once() {
    let loader = browser_loader();
    let firer = auto_fire(&loader, "p1");

    loader
        .load_script("https://cdn.example/a.js", Some("p1"))
        .await
        .unwrap();
    firer.await.unwrap();

    loader
        .load_script("https://cdn.example/a.js", Some("p1"))
        .await
        .unwrap();

    assert_eq!(loader.dom().append_count(), 1);
    assert_eq!(
        loader
            .dom()
            .elements()
            .iter()
            .filter(|el| el.id.as_deref() == Some("p1"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_loads_without_id_always_append() {
    let loader = browser_loader();
    let firer = {
        let loader = loader.clone();
        tokio::spawn(async move {
            let mut fired = 0;
            while fired < 2 {
                if loader.dom().fire_load("https://cdn.example/a.css") {
                    fired += 1;
                }
                tokio::task::yield_now().await;
            }
        })
    };

    loader.load_stylesheet("https://cdn.example/a.css", None).await.unwrap();
    loader.load_stylesheet("https://cdn.example/a.css", None).await.unwrap();
    firer.await.unwrap();

    assert_eq!(loader.dom().append_count(), 2);
}

#[tokio::test]
async fn test_stylesheet_failure_names_url() {
    let loader = browser_loader();
    let task = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.load_stylesheet("https://cdn.example/x.css", Some("x")).await })
    };
    tokio::task::yield_now().await;

    let element = loader.dom().element("x").unwrap();
    assert_eq!(element.rel.as_deref(), Some("stylesheet"));
    loader.dom().fire_error("x");

    let err = task.await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "Failed to load stylesheet: https://cdn.example/x.css");
}

#[tokio::test]
async fn test_remove_missing_resource_is_noop() {
    let loader = browser_loader();
    loader.remove_resource("missing", ResourceKind::Script);
    loader.remove_resource("missing", ResourceKind::Stylesheet);
    assert!(loader.dom().elements().is_empty());
}

#[tokio::test]
async fn test_remove_then_reload_appends_again() {
    let loader = browser_loader();
    let firer = auto_fire(&loader, "p1");
    loader.load_script("a.js", Some("p1")).await.unwrap();
    firer.await.unwrap();

    loader.remove_resource("p1", ResourceKind::Script);
    assert!(loader.dom().element("p1").is_none());

    let firer = auto_fire(&loader, "p1");
    loader.load_script("a.js", Some("p1")).await.unwrap();
    firer.await.unwrap();
    assert_eq!(loader.dom().append_count(), 2);
}

// =============================================================================
// Environment Tests
// =============================================================================

#[tokio::test]
async fn test_server_loads_are_noops() {
    let loader = ResourceLoader::in_memory(LoaderConfig::server());

    assert_ok!(loader.load_script("a.js", Some("p1")).await);
    assert_ok!(loader.load_stylesheet("a.css", Some("c1")).await);

    assert_eq!(loader.dom().append_count(), 0);
    assert!(matches!(
        loader.wait_for_global("Hls", Some(Duration::from_secs(1))).await,
        Err(Error::Environment)
    ));
}

// =============================================================================
// Global Readiness Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_for_global_times_out_within_one_interval() {
    let loader = browser_loader();
    let start = Instant::now();

    let err = loader
        .wait_for_global("g", Some(Duration::from_millis(50)))
        .await
        .unwrap_err();

    let elapsed = start.elapsed();
    assert!(matches!(err, Error::Timeout { ref symbol } if symbol == "g"));
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed <= Duration::from_millis(150));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_global_uses_configured_default_timeout() {
    let config = LoaderConfig {
        global_timeout_ms: 300,
        ..Default::default()
    };
    let loader = ResourceLoader::in_memory(config);
    let start = Instant::now();

    assert_err!(loader.wait_for_global("g", None).await);
    assert_eq!(start.elapsed(), Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_global_zero_timeout_rejects_on_first_tick() {
    let loader = browser_loader();
    let start = Instant::now();

    let err = loader
        .wait_for_global("g", Some(Duration::ZERO))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
    assert_eq!(start.elapsed(), Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_global_zero_timeout_resolves_when_defined() {
    let loader = browser_loader();
    loader.globals().define("g", json!(1));

    assert_eq!(loader.wait_for_global("g", Some(Duration::ZERO)).await.unwrap(), json!(1));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_equal_to_elapsed_keeps_polling() {
    let loader = browser_loader();
    let publisher = loader.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        publisher.globals().define("g", json!("late"));
    });
    let start = Instant::now();

    // Tick at 100ms has elapsed == timeout, which is not past the deadline
    let value = loader
        .wait_for_global("g", Some(Duration::from_millis(100)))
        .await
        .unwrap();

    assert_eq!(value, json!("late"));
    assert_eq!(start.elapsed(), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_global_defined_on_tick_boundary_resolves() {
    let loader = browser_loader();
    let publisher = loader.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        publisher.globals().define("g", json!(true));
    });
    let start = Instant::now();

    let value = loader
        .wait_for_global("g", Some(Duration::from_millis(200)))
        .await
        .unwrap();

    assert_eq!(value, json!(true));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed <= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waits_are_independent() {
    let loader = browser_loader();
    let publisher = loader.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        publisher.globals().define("dashjs", json!({ "MediaPlayer": {} }));
    });

    let (dash, missing) = tokio::join!(
        loader.wait_for_global("dashjs", Some(Duration::from_secs(1))),
        loader.wait_for_global("never", Some(Duration::from_millis(250))),
    );

    assert!(dash.unwrap()["MediaPlayer"].is_object());
    assert!(matches!(missing, Err(Error::Timeout { .. })));
}

// =============================================================================
// Provider Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_prepare_video_js_bundle() {
    let loader = browser_loader();
    let bundle = VideoProvider::VideoJs.sdk().unwrap();

    let driver = {
        let loader = loader.clone();
        tokio::spawn(async move {
            while !loader.dom().fire_load("videojs-css") {
                tokio::task::yield_now().await;
            }
            while !loader.dom().fire_load("videojs-js") {
                tokio::task::yield_now().await;
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
            loader.globals().define("videojs", json!("player-factory"));
        })
    };

    let value = loader.prepare(&bundle).await.unwrap();
    driver.await.unwrap();

    assert_eq!(value, json!("player-factory"));
    let ids: Vec<_> = loader
        .dom()
        .elements()
        .into_iter()
        .filter_map(|el| el.id)
        .collect();
    assert_eq!(ids, vec!["videojs-css", "videojs-js"]);
}

#[tokio::test]
async fn test_prepare_stops_on_script_failure() {
    let loader = browser_loader();
    let bundle = VideoProvider::Dash.sdk().unwrap();

    let driver = {
        let loader = loader.clone();
        tokio::spawn(async move {
            while !loader.dom().fire_error("dashjs-js") {
                tokio::task::yield_now().await;
            }
        })
    };

    let err = loader.prepare(&bundle).await.unwrap_err();
    driver.await.unwrap();
    assert!(matches!(err, Error::LoadFailure { kind: ResourceKind::Script, .. }));
}

// =============================================================================
// URL Tests
// =============================================================================

#[test]
fn test_mux_url_defaults() {
    let url = build_mux_url("playback", None).unwrap();
    assert_eq!(url.host_str(), Some("stream.mux.com"));
    assert_eq!(url.path(), "/playback.m3u8");
    assert_eq!(url.query(), None);
}

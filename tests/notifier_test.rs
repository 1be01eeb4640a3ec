/// Integration tests for subscriber notification

mod common;

use common::{FakeHttp, Reply};
use rocketwatch::notifier::Notifier;
use rocketwatch::upstream::retry::Backoff;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

fn notifier(http: &Arc<FakeHttp>) -> Arc<Notifier> {
    Arc::new(Notifier::new(http.clone(), Backoff::new(3, Duration::from_millis(1))))
}

#[tokio::test]
async fn test_notify_each_subscriber_once() {
    let http = Arc::new(FakeHttp::new());
    http.script("http://a.test/hook", vec![Reply::Status(200)]);
    http.script("http://b.test/hook", vec![Reply::Status(200)]);

    notifier(&http)
        .notify(vec!["http://a.test/hook".to_string(), "http://b.test/hook".to_string()])
        .await;

    assert_eq!(http.calls_to("POST", "http://a.test/hook"), 1);
    assert_eq!(http.calls_to("POST", "http://b.test/hook"), 1);
    assert_eq!(
        http.bodies_to("http://a.test/hook"),
        vec![json!({ "message": "New data is available!" })]
    );
}

#[tokio::test]
async fn test_notify_retries_until_ok() {
    let http = Arc::new(FakeHttp::new());
    http.script(
        "http://a.test/hook",
        vec![Reply::Status(500), Reply::Fail, Reply::Status(200)],
    );

    notifier(&http).notify(vec!["http://a.test/hook".to_string()]).await;

    assert_eq!(http.calls_to("POST", "http://a.test/hook"), 3);
}

#[tokio::test]
async fn test_non_200_success_is_not_accepted() {
    let http = Arc::new(FakeHttp::new());
    http.script("http://a.test/hook", vec![Reply::Status(204), Reply::Status(200)]);

    notifier(&http).notify(vec!["http://a.test/hook".to_string()]).await;

    assert_eq!(http.calls_to("POST", "http://a.test/hook"), 2);
}

#[tokio::test]
async fn test_failing_subscriber_does_not_affect_others() {
    let http = Arc::new(FakeHttp::new());
    http.script("http://down.test/hook", vec![Reply::Fail]);
    http.script("http://up.test/hook", vec![Reply::Status(200)]);

    notifier(&http)
        .notify(vec![
            "http://down.test/hook".to_string(),
            "http://up.test/hook".to_string(),
        ])
        .await;

    assert_eq!(http.calls_to("POST", "http://down.test/hook"), 3);
    assert_eq!(http.calls_to("POST", "http://up.test/hook"), 1);
}

#[tokio::test]
async fn test_dispatch_runs_in_background() {
    let http = Arc::new(FakeHttp::new());
    http.script("http://a.test/hook", vec![Reply::Status(200)]);

    // returns immediately; delivery happens on a detached task
    notifier(&http).dispatch(vec!["http://a.test/hook".to_string()]);

    let delivered = timeout(Duration::from_secs(2), async {
        while http.calls_to("POST", "http://a.test/hook") == 0 {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(delivered.is_ok());
}

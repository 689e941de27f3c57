use std::sync::mpsc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use game::motion_api::router;

fn motion_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/motion")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

#[tokio::test]
async fn health_answers_ok() {
    let (tx, _rx) = mpsc::channel();
    let app = router(tx);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn motion_events_are_forwarded_into_the_game_channel() {
    let (tx, rx) = mpsc::channel();
    let app = router(tx);

    let response = app
        .oneshot(motion_request(
            r#"{"message":"Motion detected in this Level!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        rx.try_recv().unwrap().message,
        "Motion detected in this Level!"
    );
}

#[tokio::test]
async fn motion_without_json_content_type_is_rejected() {
    let (tx, rx) = mpsc::channel();
    let app = router(tx);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/motion")
                .body(Body::from(r#"{"message":"x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn malformed_payloads_never_reach_the_game() {
    let (tx, rx) = mpsc::channel();
    let app = router(tx);

    let response = app.oneshot(motion_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn a_gone_game_loop_reports_unavailable() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let app = router(tx);

    let response = app
        .oneshot(motion_request(r#"{"message":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

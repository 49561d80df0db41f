use axum::{body::Body, response::Response};
use axum_test::TestResponse;
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

pub(crate) async fn parse_json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

#[track_caller]
pub(crate) fn assert_json_message(response: &TestResponse, want: &str) {
    let body = response.json::<Value>();
    assert_eq!(body["message"], want, "unexpected error body {body}");
}

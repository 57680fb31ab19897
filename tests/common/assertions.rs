//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is an image download of the given type
pub fn assert_image(response: &TestResponse, content_type: &str, extension: &str) {
    assert_ok(response);
    let magic_ok = match extension {
        "png" => response.is_png(),
        "jpg" => response.is_jpeg(),
        "webp" => response.is_webp(),
        other => panic!("unknown extension {other}"),
    };
    assert!(
        magic_ok,
        "Expected {extension} image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    assert_eq!(
        response.header("content-type"),
        Some(content_type),
        "Expected Content-Type: {content_type}"
    );
    let disposition = format!("attachment; filename=\"ribbon.{extension}\"");
    assert_eq!(
        response.header("content-disposition"),
        Some(disposition.as_str())
    );
    assert!(response.header("etag").is_some(), "Expected an ETag");
}

/// Assert a JSON error body with the given status
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Expected JSON status {}. Full response: {}",
        expected.as_u16(),
        serde_json::to_string_pretty(&json).unwrap()
    );
    assert!(json["error"].is_string(), "Expected an error message");
}

/// Cell colors of one ribbon row from a ribbon JSON value, `None` for background
pub fn ribbon_row(ribbon: &serde_json::Value, tier: usize) -> Vec<Option<String>> {
    ribbon["grid"]["cells"][tier - 1]
        .as_array()
        .expect("ribbon row")
        .iter()
        .map(|cell| cell.as_str().map(str::to_string))
        .collect()
}

/// Columns of a ribbon row painted with `hex`
pub fn painted_columns(ribbon: &serde_json::Value, tier: usize, hex: &str) -> Vec<usize> {
    ribbon_row(ribbon, tier)
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.as_deref() == Some(hex))
        .map(|(column, _)| column)
        .collect()
}

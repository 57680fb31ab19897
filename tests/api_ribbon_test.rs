//! Integration tests for the one-shot document endpoints and the tables.

mod common;

use axum::http::StatusCode;
use common::fixtures::{colors, column_of, documents};
use common::*;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_tables() {
    let app = TestApp::new();
    let response = app.get("/api/tables").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["quality_tiers"], 3);
    assert_eq!(json["tier_labels"], serde_json::json!(["1", "2", "3"]));

    let breakpoints = json["breakpoints"].as_array().unwrap();
    assert_eq!(breakpoints.len(), 37);
    assert_eq!(breakpoints[0], 10.0);
    assert_eq!(breakpoints[36], 600.0);

    let labels = json["labels"].as_array().unwrap();
    assert_eq!(labels[0], "<10");
    assert_eq!(labels[36], "600+");

    let legend = json["legend"].as_array().unwrap();
    assert_eq!(legend.len(), 5);
    assert_eq!(legend[0]["color"], colors::GREEN);
    assert_eq!(legend[1]["color"], colors::LIGHT_GREEN);
    assert_eq!(legend[4]["label"], "> f/4.0");
    assert_eq!(legend[4]["color"], colors::RED);
}

#[tokio::test]
async fn test_compute_ribbon_crop_example() {
    let app = TestApp::new();
    let response = app.post_json("/api/ribbon", documents::CROPPED_ZOOM).await;
    assert_ok(&response);

    let ribbon: serde_json::Value = response.json();
    assert_eq!(ribbon["crop_factor"], 1.5);
    assert_eq!(ribbon["grid"]["columns"], 37);
    assert_eq!(
        painted_columns(&ribbon, 1, colors::RED),
        (column_of(40.0)..=column_of(105.0)).collect::<Vec<_>>()
    );
    // Nothing leaks outside the range
    let row = ribbon_row(&ribbon, 1);
    assert!(row[column_of(35.0)].is_none());
    assert!(row[column_of(120.0)].is_none());
}

#[tokio::test]
async fn test_compute_ribbon_kit() {
    let app = TestApp::new();
    let ribbon: serde_json::Value = app.post_json("/api/ribbon", documents::KIT).await.json();

    assert_eq!(
        painted_columns(&ribbon, 1, colors::YELLOW),
        (column_of(24.0)..=column_of(70.0)).collect::<Vec<_>>()
    );
    assert_eq!(
        painted_columns(&ribbon, 2, colors::GREEN),
        vec![column_of(50.0)]
    );
    assert!(ribbon_row(&ribbon, 3).iter().all(Option::is_none));
}

#[tokio::test]
async fn test_fractional_focal_length_bands_as_whole_millimetres() {
    let app = TestApp::new();
    let ribbon: serde_json::Value = app
        .post_json(
            "/api/ribbon",
            r#"{"crop_factor":1.0,"lenses":[{"from":17.5,"to":17.5,"aperture":2.8,"quality":1}]}"#,
        )
        .await
        .json();

    assert_eq!(
        painted_columns(&ribbon, 1, colors::YELLOW),
        vec![column_of(17.0)]
    );
}

#[tokio::test]
async fn test_empty_document_uses_default_crop_factor() {
    let app = TestApp::new();
    let response = app.post_json("/api/ribbon", documents::EMPTY).await;
    assert_ok(&response);

    let ribbon: serde_json::Value = response.json();
    assert_eq!(ribbon["crop_factor"], 1.0);
    for tier in 1..=3 {
        assert!(ribbon_row(&ribbon, tier).iter().all(Option::is_none));
    }
}

#[tokio::test]
async fn test_invalid_documents_are_400() {
    let app = TestApp::new();

    let response = app.post_json("/api/ribbon", documents::BAD_TIER).await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("quality"));

    let response = app.post_json("/api/ribbon", documents::ZERO_CROP).await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("crop factor"));

    let response = app.post_json("/api/ribbon", r#"{"lenses": 5}"#).await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_document() {
    let app = TestApp::new();

    let png = app
        .post_json("/api/ribbon/export/png", documents::CROPPED_ZOOM)
        .await;
    assert_image(&png, "image/png", "png");
    assert!(png.header(lens_ribbon::api::RIBBON_STATUS_HEADER).is_none());

    let webp = app
        .post_json("/api/ribbon/export/webp", documents::KIT)
        .await;
    assert_image(&webp, "image/webp", "webp");

    let jpg = app.post_json("/api/ribbon/export/jpg", documents::KIT).await;
    assert_image(&jpg, "image/jpeg", "jpg");
    let img = image::load_from_memory_with_format(jpg.bytes(), image::ImageFormat::Jpeg)
        .expect("decodable JPEG");
    assert_eq!((img.width(), img.height()), (1936, 356));
}

#[tokio::test]
async fn test_export_document_etag() {
    let app = TestApp::new();
    let first = app
        .post_json("/api/ribbon/export/png", documents::KIT)
        .await;
    let etag = first.header("etag").unwrap().to_string();

    let cached = app
        .post_json_with_headers(
            "/api/ribbon/export/png",
            &[("If-None-Match", etag.as_str())],
            documents::KIT,
        )
        .await;
    assert_status(&cached, StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_export_document_errors() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/ribbon/export/bmp", documents::KIT)
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/ribbon/export/png", documents::BAD_TIER)
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_ok(&response);
    assert_eq!(response.text(), "OK");
}

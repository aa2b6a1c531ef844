//! HTTP tests driving the axum router directly.

use std::io::Write;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use flate2::write::GzEncoder;
use flate2::Compression;
use json_reconcile::web::server::{create_router, MAX_MULTIPART_FIELDS, MAX_TEXT_FIELD_SIZE};
use json_reconcile::ComparisonResult;
use tower::ServiceExt;

const BOUNDARY: &str = "json-reconcile-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, content) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post(uri: &str, parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = create_router().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

fn error_type(body: &[u8]) -> String {
    let json: serde_json::Value = serde_json::from_slice(body).unwrap();
    json["error_type"].as_str().unwrap_or_default().to_string()
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_index_serves_form() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("name=\"first_text\""));
    assert!(html.contains("/api/report"));
}

#[tokio::test]
async fn test_compare_pasted_text_with_fields() {
    let request = post(
        "/api/compare",
        &[
            Part::Text("first_text", r#"[{"id": 1, "name": "Ada"}, {"id": 2, "name": "Alan"}]"#),
            Part::Text("second_text", r#"[{"id": 2, "name": "Alan"}, {"id": 3, "name": "Grace"}]"#),
            Part::Text("comparison_fields", "id"),
        ],
    );
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.matching_objects, 1);
    assert_eq!(result.summary.only_in_first_count, 1);
    assert_eq!(result.summary.only_in_second_count, 1);
    assert_eq!(result.summary.compared_fields, vec!["id"]);
    assert_eq!(result.only_in_first[0].get("name").unwrap().rendered(), "Ada");
    assert_eq!(result.only_in_second[0].get("name").unwrap().rendered(), "Grace");
}

#[tokio::test]
async fn test_compare_full_tree_reports_field_differences() {
    let request = post(
        "/api/compare",
        &[
            Part::Text("first_text", r#"[{"a": 1}]"#),
            Part::Text("second_text", r#"[{"b": 2}]"#),
        ],
    );
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let diffs = &json["differences"][0]["field_differences"];
    assert_eq!(diffs[0]["field_path"], "a");
    assert_eq!(diffs[0]["value_in_first"], "1");
    assert!(diffs[0]["value_in_second"].is_null());
    assert_eq!(diffs[1]["field_path"], "b");
    assert!(diffs[1]["value_in_first"].is_null());
    assert_eq!(diffs[1]["value_in_second"], "2");
    assert_eq!(json["summary"]["objects_with_differences"], 1);
}

#[tokio::test]
async fn test_compare_case_insensitive_flag() {
    let parts = |case_sensitive| {
        post(
            "/api/compare",
            &[
                Part::Text("first_text", r#"[{"name": "Bob"}]"#),
                Part::Text("second_text", r#"[{"name": "bob"}]"#),
                Part::Text("case_sensitive", case_sensitive),
            ],
        )
    };

    let (_, _, body) = send(parts("false")).await;
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.matching_objects, 1);

    let (_, _, body) = send(parts("true")).await;
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.objects_with_differences, 1);
    assert_eq!(result.differences[0].field_differences[0].field_path, "name");
}

#[tokio::test]
async fn test_compare_config_document_and_override() {
    let config = r#"{"comparisonFields": ["sku"], "caseSensitive": false}"#;
    let first = r#"[{"sku": "A1", "qty": 1}]"#;
    let second = r#"[{"sku": "a1", "qty": 2}]"#;

    let request = post(
        "/api/compare",
        &[
            Part::Text("first_text", first),
            Part::Text("second_text", second),
            Part::File("config", "config.json", config.as_bytes()),
        ],
    );
    let (status, _, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.matching_objects, 1);

    // The discrete field replaces the configured list
    let request = post(
        "/api/compare",
        &[
            Part::Text("first_text", first),
            Part::Text("second_text", second),
            Part::File("config", "config.json", config.as_bytes()),
            Part::Text("comparison_fields", "sku,qty"),
        ],
    );
    let (_, _, body) = send(request).await;
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.only_in_first_count, 1);
    assert_eq!(result.summary.only_in_second_count, 1);
}

#[tokio::test]
async fn test_compare_file_uploads_with_gzip() {
    let first = gzip(br#"[{"id": 1}, {"id": 2}]"#);
    let request = post(
        "/api/compare",
        &[
            Part::File("first", "before.json.gz", &first),
            Part::File("second", "after.json", br#"[{"id": 2}, {"id": 1}]"#),
            Part::Text("comparison_fields", "id"),
        ],
    );
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.matching_objects, 2);
    assert!(result.summary.is_reconciled());
}

#[tokio::test]
async fn test_compare_malformed_input() {
    let request = post(
        "/api/compare",
        &[
            Part::Text("first_text", r#"{"id": 1}"#),
            Part::Text("second_text", "[]"),
        ],
    );
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "malformed_input");
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("first"));
    assert!(json["details"].is_null());
}

#[tokio::test]
async fn test_compare_missing_second_document() {
    let request = post("/api/compare", &[Part::Text("first_text", "[]")]);
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "missing_input");
}

#[tokio::test]
async fn test_compare_invalid_configuration() {
    for (name, value) in [("config", "null"), ("output_format", "xml")] {
        let request = post(
            "/api/compare",
            &[
                Part::Text("first_text", "[]"),
                Part::Text("second_text", "[]"),
                Part::Text(name, value),
            ],
        );
        let (status, _, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
        assert_eq!(error_type(&body), "invalid_configuration", "{name}");
    }
}

#[tokio::test]
async fn test_compare_rejects_gzip_name_without_gzip_content() {
    let request = post(
        "/api/compare",
        &[
            Part::File("first", "before.json.gz", b"[]"),
            Part::Text("second_text", "[]"),
        ],
    );
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "format_mismatch");
}

#[tokio::test]
async fn test_report_csv_download() {
    let request = post(
        "/api/report",
        &[
            Part::Text("first_text", r#"[{"id": 1, "v": "x"}]"#),
            Part::Text("second_text", r#"[{"id": 1, "v": "y"}]"#),
            Part::Text("output_format", "csv"),
        ],
    );
    let (status, headers, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"comparison-result.csv\""
    );
    let csv = String::from_utf8(body).unwrap();
    assert!(csv.starts_with(
        "category,field_path,value_in_first,value_in_second,missing_in,record_in_first,record_in_second"
    ));
    assert!(csv.contains("difference,v,x,y,,"));
}

#[tokio::test]
async fn test_report_defaults_to_json() {
    let request = post(
        "/api/report",
        &[
            Part::Text("first_text", r#"[{"id": 1}]"#),
            Part::Text("second_text", r#"[{"id": 1}]"#),
        ],
    );
    let (status, headers, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"comparison-result.json\""
    );
    let result: ComparisonResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.summary.matching_objects, 1);
}

#[tokio::test]
async fn test_report_html_download() {
    let request = post(
        "/api/report",
        &[
            Part::Text("first_text", "[]"),
            Part::Text("second_text", r#"[{"id": 1}]"#),
            Part::Text("output_format", "html"),
        ],
    );
    let (status, headers, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/html");
    assert!(String::from_utf8(body).unwrap().starts_with("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_field_count_limit() {
    let names: Vec<String> = (0..=MAX_MULTIPART_FIELDS).map(|i| format!("extra{i}")).collect();
    let parts: Vec<Part> = names.iter().map(|name| Part::Text(name, "x")).collect();
    let (status, _, body) = send(post("/api/compare", &parts)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_type(&body), "field_limit_exceeded");
}

#[tokio::test]
async fn test_text_field_size_limit() {
    let oversized = format!("[{}]", " ".repeat(MAX_TEXT_FIELD_SIZE));
    let request = post(
        "/api/compare",
        &[
            Part::Text("first_text", &oversized),
            Part::Text("second_text", "[]"),
        ],
    );
    let (status, _, body) = send(request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_type(&body), "text_too_large");
}

#[tokio::test]
async fn test_get_on_api_is_not_allowed() {
    let request = Request::builder()
        .uri("/api/compare")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

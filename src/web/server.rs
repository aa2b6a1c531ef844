use axum::http::header;
use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::cli::ServeArgs;
use crate::core::config::{parse_field_list, ComparisonConfig, OutputFormat};
use crate::core::types::{ComparisonError, ComparisonResult, InputSide};
use crate::matching::engine::Comparator;
use crate::parsing::json::{decode_upload, ParseError};
use crate::report::{self, ReportFormat};
use crate::utils::validation::{validate_upload, ValidationError};
use crate::web::content_type::{content_type_for, report_file_name};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 16;
pub const MAX_FILE_FIELD_SIZE: usize = 16 * 1024 * 1024; // 16MB
pub const MAX_TEXT_FIELD_SIZE: usize = 1024 * 1024; // 1MB
/// Two full-size uploads plus multipart overhead
pub const MAX_REQUEST_BODY_SIZE: usize = 40 * 1024 * 1024;
/// Ceiling on a single document after gzip decompression
pub const MAX_DECODED_SIZE: usize = 64 * 1024 * 1024;
/// Requests a single IP may send back to back before being throttled
pub const RATE_LIMIT_BURST: u32 = 50;

/// Error body returned by every API endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Both documents plus the effective configuration for one request
#[derive(Debug)]
struct ComparisonRequest {
    first: String,
    second: String,
    config: ComparisonConfig,
}

/// Raw form values before they are merged into a request
#[derive(Debug, Default)]
struct FormData {
    first_file: Option<String>,
    second_file: Option<String>,
    first_text: Option<String>,
    second_text: Option<String>,
    config: Option<ComparisonConfig>,
    comparison_fields: Option<Vec<String>>,
    case_sensitive: Option<bool>,
    ignore_array_order: Option<bool>,
    ignore_extra_fields: Option<bool>,
    output_format: Option<OutputFormat>,
}

impl FormData {
    fn set_file(&mut self, side: InputSide, text: String) {
        match side {
            InputSide::First => self.first_file = Some(text),
            InputSide::Second => self.second_file = Some(text),
        }
    }

    fn set_text(&mut self, side: InputSide, text: String) {
        match side {
            InputSide::First => self.first_text = Some(text),
            InputSide::Second => self.second_text = Some(text),
        }
    }

    /// Uploaded files win over pasted text; individual form fields override
    /// the uploaded configuration document.
    fn into_request(
        self,
        had_parse_error: bool,
        fields_received: usize,
    ) -> Result<ComparisonRequest, Response> {
        let first = self.first_file.or(self.first_text);
        let second = self.second_file.or(self.second_text);

        let (Some(first), Some(second)) = (first, second) else {
            let error_msg = if had_parse_error {
                "Failed to read the upload. Please check the files and try again."
            } else if fields_received == 0 {
                "No data received. Please upload or paste two JSON documents."
            } else {
                "Both a first and a second JSON document are required."
            };
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                create_safe_error_response("missing_input", error_msg, None),
            ));
        };

        let mut config = self.config.unwrap_or_default();
        if let Some(fields) = self.comparison_fields {
            config.comparison_fields = fields;
        }
        if let Some(case_sensitive) = self.case_sensitive {
            config.case_sensitive = case_sensitive;
        }
        if let Some(ignore) = self.ignore_array_order {
            config.ignore_array_order = ignore;
        }
        if let Some(ignore) = self.ignore_extra_fields {
            config.ignore_extra_fields = ignore;
        }
        if let Some(format) = self.output_format {
            config.output_format = format;
        }

        Ok(ComparisonRequest {
            first,
            second,
            config,
        })
    }
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Map an engine error to a 400 response.
///
/// Parser diagnostics describe the caller's own input, so they are returned
/// verbatim.
fn comparison_error_response(err: &ComparisonError) -> Response {
    let error_type = match err {
        ComparisonError::MalformedInput { .. } => "malformed_input",
        ComparisonError::InvalidConfiguration(_) => "invalid_configuration",
    };
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error: err.to_string(),
            error_type: error_type.to_string(),
            details: None,
        },
    )
}

fn validation_error_response(err: &ValidationError) -> Response {
    let body = match err {
        ValidationError::FilenameTooLong => create_safe_error_response(
            "filename_too_long",
            "Filename exceeds maximum length limit",
            Some("Filename validation failed due to length constraints"),
        ),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => {
            create_safe_error_response(
                "invalid_filename",
                "Filename contains invalid or dangerous characters",
                Some("Filename validation failed due to invalid characters"),
            )
        }
        ValidationError::FormatValidationFailed => create_safe_error_response(
            "format_mismatch",
            "File content does not match the expected format based on filename",
            Some("Format validation failed"),
        ),
        ValidationError::InvalidFileContent => create_safe_error_response(
            "invalid_content",
            "File content appears malformed or corrupted",
            None,
        ),
    };
    error_response(StatusCode::BAD_REQUEST, body)
}

fn too_large_response(error_type: &str, message: &str) -> Response {
    error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        ErrorResponse {
            error: message.to_string(),
            error_type: error_type.to_string(),
            details: None,
        },
    )
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
///
/// Per-IP rate limiting is layered on by [`create_rate_limited_router`].
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/compare", post(compare_handler))
        .route("/api/report", post(report_handler))
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        )
}

/// The served application: [`create_router`] behind a per-IP rate limiter.
///
/// The limiter keys on `ConnectInfo<SocketAddr>`, so the router must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_rate_limited_router() -> anyhow::Result<Router> {
    // Bursts of RATE_LIMIT_BURST, then one request per 10 seconds per IP
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(RATE_LIMIT_BURST)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(create_router().layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_rate_limited_router()?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting json-reconcile web server at http://{addr}");

    if args.open {
        if let Err(e) = open::that(format!("http://{addr}")) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// Compare two documents and return the result as JSON
async fn compare_handler(mut multipart: Multipart) -> Response {
    let request = match extract_request_data(&mut multipart).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    match run_comparison(&request) {
        Ok(result) => Json(result).into_response(),
        Err(response) => response,
    }
}

/// Compare two documents and return the rendered report as a download
async fn report_handler(mut multipart: Multipart) -> Response {
    let request = match extract_request_data(&mut multipart).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let result = match run_comparison(&request) {
        Ok(result) => result,
        Err(response) => return response,
    };

    let format = ReportFormat::from(request.config.output_format);
    match report::render(&result, format) {
        Ok(body) => {
            let file_name = report_file_name(format);
            (
                [
                    (header::CONTENT_TYPE, content_type_for(&file_name).to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response(
                "report_failed",
                "Unable to render the report",
                Some(&e.to_string()),
            ),
        ),
    }
}

fn run_comparison(request: &ComparisonRequest) -> Result<ComparisonResult, Response> {
    let comparator = Comparator::new(request.config.clone());
    let result = comparator
        .compare_documents(&request.first, &request.second)
        .map_err(|e| comparison_error_response(&e))?;

    tracing::debug!(
        "Compared {} and {} records: {} matching, {} with differences",
        result.summary.total_objects_in_first,
        result.summary.total_objects_in_second,
        result.summary.matching_objects,
        result.summary.objects_with_differences,
    );

    Ok(result)
}

/// Extract both documents and the comparison settings from the multipart form
async fn extract_request_data(multipart: &mut Multipart) -> Result<ComparisonRequest, Response> {
    let mut form = FormData::default();
    let mut fields_received = 0usize;
    let mut had_parse_error = false;

    loop {
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Too many form fields".to_string(),
                    error_type: "field_limit_exceeded".to_string(),
                    details: None,
                },
            ));
        }

        match multipart.next_field().await {
            Ok(Some(field)) => {
                fields_received += 1;
                let name = field.name().unwrap_or_default().to_string();

                match name.as_str() {
                    "first" | "second" => {
                        let side = side_for(&name);
                        let filename = field.file_name().map(ToString::to_string);

                        match field.bytes().await {
                            Ok(bytes) => {
                                if let Some(text) =
                                    read_upload(side, filename.as_deref(), &bytes)?
                                {
                                    form.set_file(side, text);
                                }
                            }
                            Err(_) => had_parse_error = true,
                        }
                    }
                    "first_text" | "second_text" => match field.text().await {
                        Ok(text) => {
                            if text.len() > MAX_TEXT_FIELD_SIZE {
                                return Err(too_large_response(
                                    "text_too_large",
                                    "Text field size exceeds limit",
                                ));
                            }
                            if !text.trim().is_empty() {
                                form.set_text(side_for(&name), text);
                            }
                        }
                        Err(_) => had_parse_error = true,
                    },
                    "config" => match field.text().await {
                        Ok(text) if text.len() > MAX_TEXT_FIELD_SIZE => {
                            return Err(too_large_response(
                                "text_too_large",
                                "Text field size exceeds limit",
                            ));
                        }
                        Ok(text) if !text.trim().is_empty() => {
                            let config = ComparisonConfig::from_json_str(&text)
                                .map_err(|e| comparison_error_response(&e))?;
                            form.config = Some(config);
                        }
                        Ok(_) => {}
                        Err(_) => had_parse_error = true,
                    },
                    "comparison_fields" => {
                        if let Ok(text) = field.text().await {
                            let fields = parse_field_list(&text);
                            if !fields.is_empty() {
                                form.comparison_fields = Some(fields);
                            }
                        }
                    }
                    "case_sensitive" => {
                        if let Ok(text) = field.text().await {
                            form.case_sensitive = parse_flag(&text);
                        }
                    }
                    "ignore_array_order" => {
                        if let Ok(text) = field.text().await {
                            form.ignore_array_order = parse_flag(&text);
                        }
                    }
                    "ignore_extra_fields" => {
                        if let Ok(text) = field.text().await {
                            form.ignore_extra_fields = parse_flag(&text);
                        }
                    }
                    "output_format" => {
                        if let Ok(text) = field.text().await {
                            if !text.trim().is_empty() {
                                let format = text
                                    .parse::<OutputFormat>()
                                    .map_err(|e| comparison_error_response(&e))?;
                                form.output_format = Some(format);
                            }
                        }
                    }
                    _ => {} // Ignore unknown fields
                }
            }
            Ok(None) => break,
            Err(_) => {
                had_parse_error = true;
                break;
            }
        }
    }

    form.into_request(had_parse_error, fields_received)
}

fn side_for(field_name: &str) -> InputSide {
    if field_name.starts_with("first") {
        InputSide::First
    } else {
        InputSide::Second
    }
}

/// Validate and decode one uploaded document. An empty file input yields `None`.
fn read_upload(
    side: InputSide,
    filename: Option<&str>,
    bytes: &[u8],
) -> Result<Option<String>, Response> {
    if bytes.is_empty() {
        return Ok(None);
    }

    if bytes.len() > MAX_FILE_FIELD_SIZE {
        return Err(too_large_response(
            "file_too_large",
            "File size exceeds limit",
        ));
    }

    // Browsers send an empty filename when no file was chosen
    let filename = filename.filter(|name| !name.is_empty());
    validate_upload(filename, bytes).map_err(|e| validation_error_response(&e))?;

    match decode_upload(bytes, MAX_DECODED_SIZE) {
        Ok(text) => Ok(Some(text)),
        Err(ParseError::TooLarge(_)) => Err(too_large_response(
            "file_too_large",
            "Decompressed file size exceeds limit",
        )),
        Err(source) => Err(comparison_error_response(
            &ComparisonError::MalformedInput {
                input: side,
                source,
            },
        )),
    }
}

/// Interpret a form flag; checkboxes submit "on", selects submit "true"/"false"
fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

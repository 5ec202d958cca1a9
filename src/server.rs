use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{
    file_extension, format_size, sanitize_filename, ApiAnalyzeRequest, ApiAnalyzeResponse,
    ApiError, ApiUploadResponse,
};
use post_analyzer::config::AnalyzerConfig;
use post_analyzer::extract::{extract_text, ExtractionMethod};
use post_analyzer::{AnalysisError, Analyzer, Stage};

type Channels = Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>;
type ApiFailure = (StatusCode, Json<ApiError>);

#[derive(Clone)]
struct AppState {
    analyzer: Analyzer,
    config: Arc<AnalyzerConfig>,
    channels: Channels,
}

impl AppState {
    fn new(config: AnalyzerConfig, analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            config: Arc::new(config),
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[derive(Clone, Serialize)]
struct StreamEvent {
    event: String,
    message: String,
    timestamp_ms: u128,
}

#[derive(Deserialize)]
struct StreamQuery {
    request_id: String,
}

#[derive(Deserialize)]
struct UploadQuery {
    request_id: Option<String>,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(
    args: crate::ServeArgs,
    config: AnalyzerConfig,
    analyzer: Analyzer,
) -> Result<(), String> {
    let app = router(AppState::new(config, analyzer));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    tracing::info!(%addr, "post analyzer API listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/analyze/stream", get(stream_handler))
        .route("/api/upload", post(upload_handler))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Social Media Content Analyzer API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "/api/upload",
            "analyze": "/api/analyze",
            "stream": "/api/analyze/stream",
            "health": "/api/health",
        },
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "ai_configured": state.analyzer.has_suggester(),
        "max_upload_bytes": state.config.server.max_upload_bytes,
        "cors_origins": state.config.server.cors_origins,
    }))
}

async fn not_found() -> ApiFailure {
    failure(StatusCode::NOT_FOUND, ApiError::new("Endpoint not found"))
}

/// Progress channels keyed by a caller-supplied id are released on every exit path,
/// including rejected requests whose stream was opened first.
async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<ApiAnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiAnalyzeResponse>, ApiFailure> {
    let Json(request) =
        payload.map_err(|err| json_failure(err, state.config.server.max_upload_bytes))?;
    let request_id = request.request_id.clone();

    let result = analyze_request(&state, request).await;
    if let Some(request_id) = request_id {
        schedule_cleanup(state.channels.clone(), request_id);
    }
    result
}

async fn analyze_request(
    state: &AppState,
    request: ApiAnalyzeRequest,
) -> Result<Json<ApiAnalyzeResponse>, ApiFailure> {
    let request_id = request.request_id.clone();
    let text = request
        .into_text()
        .map_err(|err| failure(StatusCode::BAD_REQUEST, ApiError::new(err)))?;
    state.analyzer.validate(&text).map_err(analysis_failure)?;

    let channel = match request_id.as_deref() {
        Some(request_id) => Some(get_or_create_channel(state, request_id).await),
        None => None,
    };
    let analysis = state
        .analyzer
        .analyze_with_progress(&text, |stage| report_stage(channel.as_ref(), stage))
        .await
        .map_err(analysis_failure)?;

    let request_id = request_id.unwrap_or_else(generate_request_id);
    Ok(Json(ApiAnalyzeResponse::new(request_id, &text, analysis)))
}

async fn upload_handler(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<Json<ApiUploadResponse>, ApiFailure> {
    let request_id = query.request_id.clone();

    let result = process_upload(&state, query.request_id, multipart).await;
    if let Some(request_id) = request_id {
        schedule_cleanup(state.channels.clone(), request_id);
    }
    result
}

async fn process_upload(
    state: &AppState,
    request_id: Option<String>,
    mut multipart: Multipart,
) -> Result<Json<ApiUploadResponse>, ApiFailure> {
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_failure(err, max_upload_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| multipart_failure(err, max_upload_bytes))?;
        upload = Some((filename, data));
        break;
    }

    let (raw_filename, data) = upload
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, ApiError::new("No file provided")))?;
    let filename = sanitize_filename(&raw_filename);
    if filename.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, ApiError::new("No file selected")));
    }

    let extension = file_extension(&filename)
        .filter(|extension| state.config.server.is_allowed(extension))
        .ok_or_else(|| {
            failure(
                StatusCode::BAD_REQUEST,
                ApiError::new(format!(
                    "File type not supported. Allowed types: {}",
                    state.config.server.allowed_extensions.join(", ")
                )),
            )
        })?;
    let method = ExtractionMethod::for_extension(&extension)
        .map(ExtractionMethod::label)
        .unwrap_or("unknown");

    let channel = match request_id.as_deref() {
        Some(request_id) => Some(get_or_create_channel(state, request_id).await),
        None => None,
    };
    let request_id = request_id.unwrap_or_else(generate_request_id);

    let size = data.len();
    tracing::info!(%filename, size, method, "processing upload");
    if let Some(sender) = channel.as_ref() {
        send_event(sender, "extract", "Extracting text");
    }

    let ocr_config = state.config.ocr.clone();
    let blocking_extension = extension.clone();
    let extraction = tokio::task::spawn_blocking(move || {
        extract_text(&data, &blocking_extension, &ocr_config)
    })
    .await
    .map_err(|err| {
        failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("Text extraction failed").with_details(err.to_string()),
        )
    })?
    .map_err(|err| failure(StatusCode::BAD_REQUEST, ApiError::new(err.to_string())))?;

    if !extraction.success {
        let error = extraction
            .error
            .clone()
            .unwrap_or_else(|| "Text extraction failed".to_string());
        return Err(failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(error).with_method(method),
        ));
    }

    if state.analyzer.validate(&extraction.text).is_err() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            ApiError::new("No readable text found in the document")
                .with_method(method)
                .with_extracted_text(extraction.text),
        ));
    }

    let analysis = state
        .analyzer
        .analyze_with_progress(&extraction.text, |stage| {
            report_stage(channel.as_ref(), stage)
        })
        .await
        .map_err(analysis_failure)?;

    tracing::info!(%filename, "upload processed");
    Ok(Json(ApiUploadResponse::new(
        request_id, filename, size, extension, extraction, analysis,
    )))
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, StatusCode>
{
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(&sender, "connected", "Streaming analysis progress");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

fn failure(status: StatusCode, error: ApiError) -> ApiFailure {
    (status, Json(error))
}

fn analysis_failure(err: AnalysisError) -> ApiFailure {
    match err {
        AnalysisError::InvalidInput(message) => {
            failure(StatusCode::BAD_REQUEST, ApiError::new(message))
        }
        other => {
            tracing::error!(error = %other, "analysis failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Analysis failed").with_details(other.to_string()),
            )
        }
    }
}

fn too_large(max_upload_bytes: usize) -> ApiFailure {
    failure(
        StatusCode::PAYLOAD_TOO_LARGE,
        ApiError::new("File too large").with_max_size(format_size(max_upload_bytes)),
    )
}

fn multipart_failure(
    err: axum::extract::multipart::MultipartError,
    max_upload_bytes: usize,
) -> ApiFailure {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_upload_bytes);
    }
    failure(status, ApiError::new("Invalid upload").with_details(err.body_text()))
}

fn json_failure(err: JsonRejection, max_upload_bytes: usize) -> ApiFailure {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_upload_bytes);
    }
    failure(status, ApiError::new("Invalid request body").with_details(err.body_text()))
}

fn report_stage(channel: Option<&broadcast::Sender<StreamEvent>>, stage: Stage) {
    if let Some(sender) = channel {
        send_event(sender, stage.event(), stage.message());
    }
}

async fn get_or_create_channel(
    state: &AppState,
    request_id: &str,
) -> broadcast::Sender<StreamEvent> {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(32);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn send_event(sender: &broadcast::Sender<StreamEvent>, event: &str, message: &str) {
    let _ = sender.send(StreamEvent {
        event: event.to_string(),
        message: message.to_string(),
        timestamp_ms: now_ms(),
    });
}

fn schedule_cleanup(channels: Channels, request_id: String) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}

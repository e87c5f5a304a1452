use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use apkforge_api::config::ServerConfig;
use apkforge_api::routes;
use apkforge_api::state::AppState;
use apkforge_core::layout;
use apkforge_pipeline::{
    GhaSettings, Orchestrator, PipelineSettings, ToolchainVariant,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Minimal Android template fixture so materialization and injection
/// succeed for submitted jobs.
fn make_template(root: &Path) {
    fs::create_dir_all(layout::strings_xml(root).parent().unwrap()).unwrap();
    fs::write(
        layout::strings_xml(root),
        r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Template</string>
</resources>
"#,
    )
    .unwrap();
    fs::write(
        layout::app_build_gradle(root),
        "android {\n    defaultConfig {\n        applicationId \"com.template.app\"\n    }\n}\n",
    )
    .unwrap();
}

/// Pipeline settings rooted in a tempdir, local toolchain with no-op
/// commands (jobs terminate quickly; API behaviour is what is under test).
pub fn test_settings(root: &Path) -> PipelineSettings {
    let template_root = root.join("template");
    make_template(&template_root);
    let settings = PipelineSettings {
        template_root,
        jobs_root: root.join("temp/jobs"),
        output_dir: root.join("uploads/output"),
        upload_dir: root.join("uploads"),
        toolchain: ToolchainVariant::Local,
        build_command: "true".into(),
        build_timeout_secs: 5,
        signer_command: "true".into(),
        sign_timeout_secs: 5,
        keystore_path: root.join("keystore.jks"),
        keystore_password: String::new(),
        key_alias: "myalias".into(),
        gha: GhaSettings {
            api_base: "https://api.github.com".into(),
            owner: String::new(),
            repo: String::new(),
            workflow_file: "build.yml".into(),
            git_ref: "main".into(),
            token: String::new(),
        },
    };
    settings.ensure_dirs().unwrap();
    settings
}

/// Build the full application router with all middleware layers, rooted
/// in a fresh tempdir.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// panic recovery) that production uses. The returned tempdir guard must
/// stay alive for the duration of the test.
pub fn build_test_app() -> (Router, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let settings = test_settings(tmp.path());

    let orchestrator = Arc::new(Orchestrator::from_settings(settings.clone()));
    let store = orchestrator.store();
    let settings = Arc::new(settings);

    let state = AppState {
        orchestrator,
        store,
        settings: Arc::clone(&settings),
        config: Arc::new(test_config()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .nest_service("/downloads", ServeDir::new(&settings.output_dir))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (app, tmp)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a single-file multipart body.
pub async fn post_multipart(app: Router, uri: &str, file_name: &str, bytes: &[u8]) -> Response {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

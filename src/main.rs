use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod dto;
mod error;
mod features;
mod handlers;
mod inference;
mod models;
mod storage;

use auth::admin::AdminAuthenticator;
use config::Config;
use inference::Artifacts;
use storage::schema::LogSchema;
use storage::LogStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub artifacts: Arc<Artifacts>,
    pub logs: LogStore,
    pub admin: Arc<dyn AdminAuthenticator>,
}

impl AppState {
    pub fn new(config: Config, artifacts: Artifacts, admin: Box<dyn AdminAuthenticator>) -> Self {
        let prediction_schema = LogSchema::prediction(&artifacts.schema);
        let logs = LogStore::new(
            config.prediction_log_path(),
            config.mood_log_path(),
            prediction_schema,
        );

        Self {
            config: Arc::new(config),
            artifacts: Arc::new(artifacts),
            logs,
            admin: Arc::from(admin),
        }
    }
}

fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/predict", post(handlers::predict::predict_risk))
        .route("/api/mood", post(handlers::mood::submit_mood))
        .route("/api/mood/trend", get(handlers::mood::mood_trend))
        .route("/api/email-reminder", post(handlers::email::generate_email));

    let admin_routes = Router::new()
        .route(
            "/api/admin/predictions",
            get(handlers::admin::list_predictions),
        )
        .route("/api/admin/mood-summary", get(handlers::admin::mood_summary))
        .route("/api/admin/explain", post(handlers::admin::explain_prediction))
        .route("/api/admin/export", get(handlers::admin::export_predictions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config
        .frontend_url
        .parse::<axum::http::HeaderValue>()
        .context("FRONTEND_URL is not a valid origin")?];
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static(auth::middleware::ADMIN_PASSCODE_HEADER),
        ]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodrisk_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let artifacts = Artifacts::load(&config.model_dir)
        .with_context(|| format!("loading model artifacts from {}", config.model_dir.display()))?;
    let admin = auth::admin::from_config(&config)?;
    tracing::info!(scheme = admin.scheme(), "Admin gate configured");

    let cors = cors_layer(&config)?;
    let addr = config.listen_addr();
    let state = AppState::new(config, artifacts, admin);

    let app = router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::admin::SharedSecret;
    use crate::config::AdminAuthMode;

    const PASSCODE: &str = "1234";

    fn test_state(data_dir: &std::path::Path) -> AppState {
        test_state_with(data_dir, inference::testing::artifacts())
    }

    fn test_state_with(data_dir: &std::path::Path, artifacts: Artifacts) -> AppState {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            model_dir: "models".into(),
            data_dir: data_dir.to_path_buf(),
            admin_auth_mode: AdminAuthMode::SharedSecret,
            admin_passcode: Some(PASSCODE.into()),
            admin_token_sha256: None,
            admin_log_limit: 100,
        };
        AppState::new(config, artifacts, Box::new(SharedSecret::new(PASSCODE)))
    }

    fn form() -> Value {
        json!({
            "age": 25,
            "gender": "Male",
            "occupation": "Student",
            "sleep_hours": 4,
            "activity_level": 1,
            "social_media_time": 10,
            "post_text": "I feel so tired and lonely",
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn admin_get(uri: &str, passcode: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(p) = passcode {
            builder = builder.header("x-admin-passcode", p);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router(state.clone()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(state, req).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let (status, body) = send_json(&state, admin_get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_predict_returns_label_and_logs_row() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        for _ in 0..3 {
            let (status, body) = send_json(&state, post_json("/api/predict", &form())).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["label"], "At Risk");
            assert!(body["sentiment_score"].as_f64().unwrap() < 0.0);
            assert_eq!(body["recommendations"]["items"].as_array().unwrap().len(), 5);
            assert!(body.get("log_warning").is_none());
        }

        let text = std::fs::read_to_string(dir.path().join("user_logs.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("age,sleep_hours,"));
        assert!(lines[0].ends_with(",prediction_label,timestamp"));
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range_input() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let mut body = form();
        body["activity_level"] = json!(11);

        let (status, resp) = send_json(&state, post_json("/api/predict", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_predict_survives_log_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // a plain file where the data directory should be
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let state = test_state(&blocked);

        let (status, body) = send_json(&state, post_json("/api/predict", &form())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["log_warning"].is_string());
    }

    #[tokio::test]
    async fn test_mood_submit_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let state = test_state(&blocked);
        let mut req = form();
        req["mood"] = json!("Okay");

        let (status, body) = send_json(&state, post_json("/api/mood", &req)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 500);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to save mood: "));
    }

    #[tokio::test]
    async fn test_mood_trend_header_only_log_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let header = storage::schema::MOOD_COLUMNS.join(",");
        std::fs::write(dir.path().join("mood_logs.csv"), format!("{header}\n")).unwrap();

        let (status, body) = send_json(&state, admin_get("/api/mood/trend", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_data"], false);
        assert_eq!(body["message"], "No mood logs found yet.");
    }

    #[tokio::test]
    async fn test_mood_trend_empty_then_populated() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, body) = send_json(&state, admin_get("/api/mood/trend", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_data"], false);
        assert_eq!(body["message"], "No mood logs found yet.");

        for mood in ["Good", "NotGood"] {
            let mut req = form();
            req["mood"] = json!(mood);
            let (status, body) = send_json(&state, post_json("/api/mood", &req)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Mood submitted successfully!");
        }

        let (_, body) = send_json(&state, admin_get("/api/mood/trend", None)).await;
        assert_eq!(body["has_data"], true);
        let scores: Vec<u64> = body["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["mood_score"].as_u64().unwrap())
            .collect();
        assert_eq!(scores, [2, 0]);
    }

    #[tokio::test]
    async fn test_admin_routes_require_passcode() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, _) = send_json(&state, admin_get("/api/admin/predictions", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send_json(&state, admin_get("/api/admin/predictions", Some("0000"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("rows").is_none());
    }

    #[tokio::test]
    async fn test_admin_dashboard_lists_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, _) = send(&state, admin_get("/api/admin/export", Some(PASSCODE))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send_json(&state, post_json("/api/predict", &form())).await;

        let (status, body) = send_json(&state, admin_get("/api/admin/predictions?limit=10", Some(PASSCODE))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_data"], true);
        assert_eq!(body["rows"].as_array().unwrap().len(), 1);
        assert_eq!(body["summary"]["at_risk"], 1);

        let response = router(state.clone())
            .oneshot(admin_get("/api/admin/export", Some(PASSCODE)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"depression_logs.csv\""
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_admin_mood_summary_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, body) = send_json(&state, admin_get("/api/admin/mood-summary", Some(PASSCODE))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_data"], false);
    }

    #[tokio::test]
    async fn test_admin_views_treat_empty_logs_as_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        std::fs::write(dir.path().join("user_logs.csv"), "").unwrap();
        std::fs::write(dir.path().join("mood_logs.csv"), "").unwrap();

        let (_, body) = send_json(&state, admin_get("/api/admin/predictions", Some(PASSCODE))).await;
        assert_eq!(body["has_data"], false);
        assert_eq!(body["message"], "No user logs found.");

        let (_, body) = send_json(&state, admin_get("/api/admin/mood-summary", Some(PASSCODE))).await;
        assert_eq!(body["has_data"], false);
    }

    #[tokio::test]
    async fn test_export_is_gzipped_when_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        send_json(&state, post_json("/api/predict", &form())).await;

        let mut req = admin_get("/api/admin/export", Some(PASSCODE));
        req.headers_mut()
            .insert("accept-encoding", "gzip".parse().unwrap());
        let response = router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-encoding"], "gzip");
    }

    #[tokio::test]
    async fn test_admin_explain_degrades_without_linear_model() {
        struct Opaque;

        impl inference::model::Classifier for Opaque {
            fn predict(&self, _scaled: &[f64]) -> Result<u8, inference::InferenceError> {
                Ok(1)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut artifacts = inference::testing::artifacts();
        artifacts.model = Box::new(Opaque);
        let state = test_state_with(dir.path(), artifacts);
        let mut req = post_json("/api/admin/explain", &form());
        req.headers_mut()
            .insert("x-admin-passcode", PASSCODE.parse().unwrap());

        let (status, body) = send_json(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "At Risk");
        assert!(body["explanation"].is_null());
        assert!(body["warning"]
            .as_str()
            .unwrap()
            .starts_with("Explanation unavailable"));
    }

    #[tokio::test]
    async fn test_admin_explain_returns_attributions() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let mut req = post_json("/api/admin/explain", &form());
        req.headers_mut()
            .insert("x-admin-passcode", PASSCODE.parse().unwrap());

        let (status, body) = send_json(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        let attributions = body["explanation"].as_array().unwrap();
        assert_eq!(attributions.len(), inference::testing::COLUMNS.len());
    }

    #[tokio::test]
    async fn test_email_progress_summary_reads_log() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        send_json(&state, post_json("/api/predict", &form())).await;

        let req = json!({ "user_name": "Ana", "purpose": "progress_summary" });
        let (status, body) = send_json(&state, post_json("/api/email-reminder", &req)).await;
        assert_eq!(status, StatusCode::OK);
        let text = body["body"].as_str().unwrap();
        assert!(text.contains("you've logged 1 entries"));
        assert!(text.contains("Of those, 1 showed signs of risk."));
    }
}

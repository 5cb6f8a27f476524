pub mod api;
pub mod pages;

use crate::services::{SharedResultCache, StockDataService};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: StockDataService,
    pub results: SharedResultCache,
}

/// Build the router; kept separate from `serve` so tests can drive it
/// without a listener.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/stocks",
            get(pages::stocks_page_handler).post(pages::filter_page_handler),
        )
        .route("/", post(api::filter_handler))
        .route("/health", get(api::health_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the axum server
pub async fn serve(
    service: StockDataService,
    results: SharedResultCache,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting stockboard server");

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /api/stocks?company=ALK&dateFrom=2023-01-01&dateTo=2023-01-10");
    tracing::info!("  POST /api/stocks (form: company, dateFrom, dateTo)");
    tracing::info!("  POST / (form: company, dateFrom?, dateTo)");
    tracing::info!("  GET  /health");

    let app = router(AppState { service, results });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse a `yyyy-MM-dd` boundary parameter. Rejection happens here, with
/// a client error, before anything reaches the service.
pub(crate) fn parse_date_param(value: &str, field: &str) -> Result<NaiveDate, Response> {
    crate::utils::parse_date(value).map_err(|_| {
        warn!(field, value, "Invalid date parameter");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Invalid {} format. Expected YYYY-MM-DD", field)
            })),
        )
            .into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RESULT_CACHE_TTL_SECONDS;
    use crate::models::Observation;
    use crate::services::{InMemoryRepository, ObservationRepository, ResultCache};
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, LOCATION};
    use axum::http::Request;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn observation(date: &str, price: f64, volume: u64) -> Observation {
        Observation::new(
            date.parse().unwrap(),
            Some(price),
            Some(price + 1.0),
            Some(price - 1.0),
            Some(price),
            Some(0.5),
            Some(volume),
            None,
            None,
        )
    }

    async fn test_router() -> Router {
        let repository = InMemoryRepository::new(PathBuf::from("unused"));
        repository.save("ALK", observation("2023-01-01", 100.0, 500)).await;
        repository.save("ALK", observation("2023-01-05", 102.0, 700)).await;
        repository.save("ALK", observation("2023-01-10", 99.0, 1_234_567)).await;
        repository.save("KMB", observation("2023-01-03", 15.0, 200)).await;

        let state = AppState {
            service: StockDataService::new(Arc::new(repository)),
            results: Arc::new(ResultCache::new(RESULT_CACHE_TTL_SECONDS)),
        };
        router(state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_filter_returns_matching_observations() {
        let app = test_router().await;
        let response = app
            .oneshot(form_post(
                "/",
                "company=ALK&dateFrom=2023-01-02&dateTo=2023-01-06",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date"], "2023-01-05");
        assert_eq!(records[0]["lastTradePrice"], 102.0);
        assert!(records[0]["turnoverBestMKD"].is_null());
    }

    #[tokio::test]
    async fn test_json_filter_lower_bound_is_optional() {
        let app = test_router().await;
        let response = app
            .oneshot(form_post("/", "company=ALK&dateTo=2023-01-05"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_json_filter_unknown_company_is_empty_ok() {
        let app = test_router().await;
        let response = app
            .oneshot(form_post("/", "company=GRNT&dateTo=2023-01-05"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_filter_rejects_malformed_date() {
        let app = test_router().await;
        let response = app
            .oneshot(form_post("/", "company=ALK&dateTo=05.01.2023"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("dateTo"));
    }

    #[tokio::test]
    async fn test_page_post_redirects_with_parameters_and_token() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(form_post(
                "/api/stocks",
                "company=ALK&dateFrom=2023-01-01&dateTo=2023-01-10",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(location.starts_with("/api/stocks?"));
        assert!(location.contains("company=ALK"));
        assert!(location.contains("dateFrom=2023-01-01"));
        assert!(location.contains("dateTo=2023-01-10"));
        assert!(location.contains("token="));

        // The redirect target renders the stored three-record result
        let page = app
            .oneshot(Request::get(location.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = body_string(page).await;
        assert!(html.contains("<table>"));
        assert!(html.contains("2023-01-01"));
        assert!(html.contains("2023-01-05"));
        assert!(html.contains("2023-01-10"));
        // Locale-grouped volume of the third record
        assert!(html.contains("1.234.567"));
    }

    #[tokio::test]
    async fn test_page_post_requires_both_dates() {
        let app = test_router().await;
        let response = app
            .oneshot(form_post("/api/stocks", "company=ALK&dateFrom=2023-01-01"))
            .await
            .unwrap();

        // Missing dateTo never reaches the service; the form binding
        // rejects it at the boundary.
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_page_get_lists_companies_without_results() {
        let app = test_router().await;
        let response = app
            .oneshot(Request::get("/api/stocks").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("ALK"));
        assert!(html.contains("KMB"));
        assert!(!html.contains("<table>"));
    }

    #[tokio::test]
    async fn test_page_get_with_unknown_token_renders_without_results() {
        let app = test_router().await;
        let uri = format!("/api/stocks?token={}", uuid::Uuid::new_v4());
        let response = app
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_string(response).await.contains("<table>"));
    }

    #[tokio::test]
    async fn test_health_reports_catalog_counts() {
        let app = test_router().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["companies"], 2);
        assert_eq!(body["observations"], 4);
    }
}

use crate::server::{parse_date_param, AppState};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Form body for the JSON filter endpoint. `dateFrom` may be omitted to
/// leave the range unbounded below; `dateTo` is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub company: String,
    pub date_from: Option<String>,
    pub date_to: String,
}

/// POST / - Run the range filter and return the matching observations as
/// a JSON array. No session interaction.
#[instrument(skip(state))]
pub async fn filter_handler(
    State(state): State<AppState>,
    Form(request): Form<FilterRequest>,
) -> Response {
    debug!("Received filter request: {:?}", request);

    let from = match &request.date_from {
        Some(raw) => match parse_date_param(raw, "dateFrom") {
            Ok(date) => Some(date),
            Err(response) => return response,
        },
        None => None,
    };
    let to = match parse_date_param(&request.date_to, "dateTo") {
        Ok(date) => date,
        Err(response) => return response,
    };

    let observations = state
        .service
        .records_from_to(&request.company, from, to)
        .await;

    info!(
        company = %request.company,
        records = observations.len(),
        "Returning filtered observations"
    );

    (StatusCode::OK, Json(observations)).into_response()
}

/// GET /health - Catalog statistics
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let companies = state.service.list_companies().await;

    let mut observations = 0usize;
    for company in &companies {
        observations += state
            .service
            .records_from_to(company, None, NaiveDate::MAX)
            .await
            .len();
    }

    debug!(
        companies = companies.len(),
        observations, "Returning health stats"
    );

    let body = serde_json::json!({
        "status": "ok",
        "companies": companies.len(),
        "observations": observations,
        "current_system_time": Utc::now().to_rfc3339(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

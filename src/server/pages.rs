use crate::models::{format_count, format_decimal, Observation};
use crate::server::{parse_date_param, AppState};
use crate::utils::format_date;
use axum::extract::{Form, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::fmt::Write;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Query parameters for the observation page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StocksPageQuery {
    pub company: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Result token handed out by a prior filter POST
    pub token: Option<String>,
}

/// Form body for the page filter POST; both dates are required here
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterForm {
    pub company: String,
    pub date_from: String,
    pub date_to: String,
}

/// GET /api/stocks - The observation page: company picker plus, when the
/// query carries a live result token, the stored result table.
#[instrument(skip(state))]
pub async fn stocks_page_handler(
    State(state): State<AppState>,
    Query(query): Query<StocksPageQuery>,
) -> Response {
    let companies = state.service.list_companies().await;

    let observations = match query.token.as_deref().and_then(|t| Uuid::parse_str(t).ok()) {
        Some(token) => state.results.fetch(&token).await,
        None => None,
    };

    debug!(
        companies = companies.len(),
        has_result = observations.is_some(),
        "Rendering stocks page"
    );

    let html = render_stocks_page(&companies, &query, observations.as_deref());
    Html(html).into_response()
}

/// POST /api/stocks - Run the filter, stash the result, and redirect back
/// to the GET route with the parameters and the result token echoed. The
/// redirect-after-post keeps a browser refresh from re-submitting.
#[instrument(skip(state))]
pub async fn filter_page_handler(
    State(state): State<AppState>,
    Form(form): Form<FilterForm>,
) -> Response {
    let from = match parse_date_param(&form.date_from, "dateFrom") {
        Ok(date) => date,
        Err(response) => return response,
    };
    let to = match parse_date_param(&form.date_to, "dateTo") {
        Ok(date) => date,
        Err(response) => return response,
    };

    let observations = state
        .service
        .records_from_to(&form.company, Some(from), to)
        .await;

    info!(
        company = %form.company,
        records = observations.len(),
        "Storing filter result"
    );

    let token = state.results.store(observations).await;

    let location = format!(
        "/api/stocks?company={}&dateFrom={}&dateTo={}&token={}",
        urlencoding::encode(&form.company),
        format_date(&from),
        format_date(&to),
        token
    );
    Redirect::to(&location).into_response()
}

/// Minimal HTML escaping for text and attribute values
fn html_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_stocks_page(
    companies: &[String],
    query: &StocksPageQuery,
    observations: Option<&[Observation]>,
) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n<title>Stock observations</title>\n");
    page.push_str("</head>\n<body>\n<h1>Stock observations</h1>\n");

    // Filter form; the last query's parameters are echoed back
    page.push_str("<form method=\"post\" action=\"/api/stocks\">\n");
    page.push_str("<select name=\"company\">\n");
    let selected = query.company.as_deref().unwrap_or("");
    for company in companies {
        let _ = writeln!(
            page,
            "<option value=\"{0}\"{1}>{0}</option>",
            html_escape(company),
            if company == selected { " selected" } else { "" }
        );
    }
    page.push_str("</select>\n");
    let _ = writeln!(
        page,
        "<input type=\"date\" name=\"dateFrom\" value=\"{}\" required>",
        html_escape(query.date_from.as_deref().unwrap_or(""))
    );
    let _ = writeln!(
        page,
        "<input type=\"date\" name=\"dateTo\" value=\"{}\" required>",
        html_escape(query.date_to.as_deref().unwrap_or(""))
    );
    page.push_str("<button type=\"submit\">Filter</button>\n</form>\n");

    if let Some(observations) = observations {
        page.push_str("<table>\n<thead>\n<tr>");
        page.push_str("<th>Date</th><th>Last trade price</th><th>Max</th><th>Min</th>");
        page.push_str("<th>Avg. price</th><th>%chg.</th><th>Volume</th>");
        page.push_str("<th>Turnover in BEST (MKD)</th><th>Total turnover (MKD)</th>");
        page.push_str("</tr>\n</thead>\n<tbody>\n");
        for observation in observations {
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                format_date(&observation.date),
                format_decimal(observation.last_trade_price),
                format_decimal(observation.max),
                format_decimal(observation.min),
                format_decimal(observation.avg_price),
                format_decimal(observation.chg),
                format_count(observation.volume),
                format_count(observation.turnover_best_mkd),
                format_count(observation.total_turnover_mkd),
            );
        }
        page.push_str("</tbody>\n</table>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

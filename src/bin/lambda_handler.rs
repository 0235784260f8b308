//! AWS Lambda handler for loan insurance quotes
//!
//! Accepts the loan and insurance parameters as JSON and returns the
//! headline figures, optionally with the amortization schedule and the
//! monthly single premium breakdown.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{error, info};
use serde::{Deserialize, Serialize};

use loan_cover::assumptions::{load_mortality_table, resolve_table_path};
use loan_cover::{
    AmortizationRow, LoanCoverError, LoanParameters, MonthlyDetailRow, QuoteEngine, QuoteRequest,
    QuoteSummary,
};

/// Input parameters (rates as fractions, e.g. 0.035 for 3.5%)
#[derive(Debug, Deserialize)]
pub struct QuoteHttpRequest {
    #[serde(default = "default_principal")]
    pub principal: f64,

    #[serde(default = "default_term_years")]
    pub term_years: u32,

    #[serde(default = "default_annual_rate")]
    pub annual_rate: f64,

    #[serde(default = "default_insured_age")]
    pub insured_age: u32,

    /// Technical rate for discounting (default: the loan rate)
    #[serde(default)]
    pub technical_rate: Option<f64>,

    /// Return the amortization schedule
    #[serde(default)]
    pub include_schedule: bool,

    /// Return the monthly single premium breakdown
    #[serde(default)]
    pub include_detail: bool,
}

fn default_principal() -> f64 { 200_000.0 }
fn default_term_years() -> u32 { 20 }
fn default_annual_rate() -> f64 { 0.035 }
fn default_insured_age() -> u32 { 50 }

/// Output of a quote
#[derive(Debug, Serialize)]
pub struct QuoteHttpResponse {
    pub summary: QuoteSummary,
    /// False when the annuity value vanished and the level premium is undefined
    pub level_premium_defined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<MonthlyDetailRow>>,
    pub execution_time_ms: u64,
}

fn cors_builder(status: u16) -> lambda_http::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(cors_builder(status).body(Body::Text(body.to_string()))?)
}

fn status_for(err: &LoanCoverError) -> u16 {
    if err.is_input_error() {
        400
    } else {
        500
    }
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(cors_builder(200).body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: QuoteHttpRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    // Table is read for every request so an updated file is picked up
    let table = match load_mortality_table(resolve_table_path(None)) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", e);
            return error_response(500, &e.to_string());
        }
    };
    let engine = QuoteEngine::new(table);

    let loan = LoanParameters::new(request.principal, request.term_years, request.annual_rate);
    let technical_rate = request.technical_rate.unwrap_or(request.annual_rate);
    let quote = match engine.quote(&QuoteRequest::new(loan, request.insured_age, technical_rate)) {
        Ok(q) => q,
        Err(e) => return error_response(status_for(&e), &e.to_string()),
    };

    let summary = quote.summary();
    info!(
        "Quoted age {} term {}y: level premium {:.2}",
        summary.insured_age, request.term_years, summary.level_monthly_premium
    );

    let response = QuoteHttpResponse {
        summary,
        level_premium_defined: !quote.premium.is_degenerate(),
        schedule: request.include_schedule.then(|| quote.schedule.rows.clone()),
        detail: request.include_detail.then(|| quote.detail.clone()),
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(cors_builder(200).body(Body::Text(serde_json::to_string(&response)?))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

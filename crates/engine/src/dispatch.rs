//! Binds every report in the table to its route.
//!
//! Each request is one execute, shape, respond cycle against the shared
//! database. Nothing from the request other than its path is consulted.

use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use freight_executor::{Database, QueryError, Row};
use freight_reports::{ReportDefinition, ResultShape, reports};
use serde_json::{Value, json};
use std::sync::Arc;

pub const ROOT_MESSAGE: &str = "🚀 Backend API is running!";

/// A report whose statement failed. Rendered as a 500 with the driver's
/// message under `error`.
#[derive(Debug)]
pub struct ReportError {
    pub report: &'static str,
    pub source: QueryError,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.source.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    db: Arc<dyn Database>,
}

impl Dispatcher {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub fn router(&self) -> Router {
        let mut router = Router::new().route("/", get(root));
        for report in reports() {
            log::debug!("GET {} -> {} ({})", report.route, report.label, report.name);
            let db = self.db.clone();
            router = router.route(
                report.route,
                get(move || {
                    let db = db.clone();
                    async move { Self::run(db.as_ref(), report).await }
                }),
            );
        }
        router.layer(middleware::map_response(allow_any_origin))
    }

    /// Executes one report and shapes its rows.
    pub async fn run(
        db: &dyn Database,
        report: &'static ReportDefinition,
    ) -> Result<Json<Value>, ReportError> {
        match db.fetch_all(&report.sql).await {
            Ok(rows) => {
                log::debug!("{} returned {} rows", report.name, rows.len());
                Ok(Json(shape(rows, report.shape)))
            }
            Err(e) => {
                log::error!("{} ({}) failed: {}", report.name, report.route, e);
                Err(ReportError {
                    report: report.name,
                    source: e,
                })
            }
        }
    }
}

/// Turns rows into the body the report promises. A single-row report with
/// no rows yields `null`; an empty row list is a valid empty array.
pub fn shape(rows: Vec<Row>, shape: ResultShape) -> Value {
    match shape {
        ResultShape::SingleRow => rows
            .into_iter()
            .next()
            .map(Value::Object)
            .unwrap_or(Value::Null),
        ResultShape::RowList => Value::Array(rows.into_iter().map(Value::Object).collect()),
    }
}

// Liveness text only; it does not look at the database.
async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

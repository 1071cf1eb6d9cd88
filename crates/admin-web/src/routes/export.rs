//! Report download and summary export routes.

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use database::ReportId;
use ledger_core::{DateWindow, Order, Transaction, WithdrawalRequest};
use report_export::narrative::report_artifact;
use report_export::summary::{
    financial_summary_export, orders_summary_export, reconciliation_export,
};
use report_export::{check_exportable, Artifact, Export, ExportType, ReportFormat};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AdminError, Result};
use crate::state::AppState;

/// Query string of a report download.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub report_id: Option<String>,
    pub format: Option<String>,
}

/// Body of a summary export request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
    pub date_range: Option<DateRange>,
}

/// Optional `createdAt` bounds as sent by the client.
#[derive(Debug, Default, Deserialize)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// JSON form of a summary export. The CSV body is left out.
#[derive(Serialize)]
pub struct SummaryResponse<S> {
    pub ok: bool,
    pub data: S,
}

/// Download a stored narrative report as CSV or printable HTML.
pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response> {
    report_download(&state, query)
        .await
        .inspect_err(|err| log_failure("export_report_error", err))
}

/// Build a financial, orders or reconciliation summary for a date range.
pub async fn export_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Response> {
    summary_export(&state, request)
        .await
        .inspect_err(|err| log_failure("export_post_error", err))
}

async fn report_download(state: &AppState, query: ReportQuery) -> Result<Response> {
    let raw_id = non_blank(query.report_id.as_deref()).ok_or(AdminError::MissingParam("reportId"))?;

    let format = match non_blank(query.format.as_deref()) {
        Some(value) => value
            .parse::<ReportFormat>()
            .map_err(|_| AdminError::InvalidFormat(value.to_string()))?,
        None => ReportFormat::default(),
    };

    let id = ReportId::parse(raw_id)?;
    let report = state.store.report(&id).await?;
    check_exportable(&report)?;

    let artifact = report_artifact(&report, format, &state.brand, Utc::now().date_naive())?;

    info!(
        report_id = %id,
        category = %report.category,
        filename = %artifact.filename,
        "Report exported"
    );

    Ok(download(artifact, format == ReportFormat::Pdf))
}

async fn summary_export(state: &AppState, request: SummaryRequest) -> Result<Response> {
    let kind = request
        .kind
        .as_deref()
        .and_then(|kind| kind.parse::<ExportType>().ok())
        .ok_or_else(|| AdminError::InvalidExportType(request.kind.clone()))?;

    let range = request.date_range.unwrap_or_default();
    let window = DateWindow::parse(range.from.as_deref(), range.to.as_deref())?;
    let as_csv = request.format.as_deref() == Some("csv");
    let now = Utc::now();

    info!(
        kind = kind.as_str(),
        window = %window.label(),
        bounded = window.is_bounded(),
        as_csv,
        "Building summary export"
    );

    let response = match kind {
        ExportType::FinancialSummary => {
            let (orders, transactions, withdrawals) = load_financial(state, &window).await?;
            let export =
                financial_summary_export(&orders, &transactions, &withdrawals, &window, now)?;
            respond(export, as_csv)
        }
        ExportType::OrdersSummary => {
            let orders = load_orders(state, &window).await?;
            respond(orders_summary_export(&orders, &window, now)?, as_csv)
        }
        ExportType::Reconciliation => {
            let (orders, transactions) = load_reconciliation(state, &window).await?;
            let export = reconciliation_export(
                &orders,
                &transactions,
                &window,
                state.duplicate_policy,
                now,
            )?;
            respond(export.map_summary(|report| report.counts), as_csv)
        }
    };

    Ok(response)
}

/// Collects which store queries of one fan-out failed.
#[derive(Default)]
struct Fanout {
    failed: Vec<&'static str>,
}

impl Fanout {
    fn take<T: Default>(&mut self, source: &'static str, result: database::Result<T>) -> T {
        result.unwrap_or_else(|err| {
            warn!(source, error = %err, "Record store query failed");
            self.failed.push(source);
            T::default()
        })
    }

    fn finish(self) -> Result<()> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(AdminError::Sources(self.failed))
        }
    }
}

async fn load_financial(
    state: &AppState,
    window: &DateWindow,
) -> Result<(Vec<Order>, Vec<Transaction>, Vec<WithdrawalRequest>)> {
    let store = state.store.as_ref();
    let (orders, transactions, withdrawals) = tokio::join!(
        store.settled_orders(window),
        store.transactions(window),
        store.withdrawals(window)
    );

    let mut fanout = Fanout::default();
    let orders = fanout.take("orders", orders);
    let transactions = fanout.take("transactions", transactions);
    let withdrawals = fanout.take("withdrawals", withdrawals);
    fanout.finish()?;

    Ok((orders, transactions, withdrawals))
}

async fn load_orders(state: &AppState, window: &DateWindow) -> Result<Vec<Order>> {
    let mut fanout = Fanout::default();
    let orders = fanout.take("orders", state.store.orders(window).await);
    fanout.finish()?;
    Ok(orders)
}

async fn load_reconciliation(
    state: &AppState,
    window: &DateWindow,
) -> Result<(Vec<Order>, Vec<Transaction>)> {
    let store = state.store.as_ref();
    let (orders, transactions) =
        tokio::join!(store.settled_orders(window), store.transactions(window));

    let mut fanout = Fanout::default();
    let orders = fanout.take("orders", orders);
    let transactions = fanout.take("transactions", transactions);
    fanout.finish()?;

    Ok((orders, transactions))
}

fn respond<S: Serialize>(export: Export<S>, as_csv: bool) -> Response {
    if as_csv {
        return download(export.into_artifact(Utc::now().date_naive()), false);
    }

    Json(SummaryResponse {
        ok: true,
        data: export.summary,
    })
    .into_response()
}

fn download(artifact: Artifact, pdf_ready: bool) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    let mut response = (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.body,
    )
        .into_response();

    if pdf_ready {
        response
            .headers_mut()
            .insert("x-pdf-ready", HeaderValue::from_static("true"));
    }
    response
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn log_failure(tag: &'static str, err: &AdminError) {
    if err.is_internal() {
        tracing::error!(tag, error = %err, "Export failed");
    }
}

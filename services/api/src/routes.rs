use crate::infra::{view_options, with_store, AppState, DashboardState};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Extension, Json, Router};
use crm_dashboard::error::AppError;
use crm_dashboard::leads::{delete_lead, insert_lead, LeadId, NewLead};
use crm_dashboard::presentation::Table;
use crm_dashboard::reports::ReportKind;
use crm_dashboard::views::{render_view, MenuEntry, RenderedView, View};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewQuery {
    #[serde(default)]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) filter: Option<String>,
    #[serde(default)]
    pub(crate) audit: bool,
}

pub(crate) fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/api/v1/views", get(menu_endpoint))
        .route("/api/v1/views/:view", get(view_endpoint))
        .route(
            "/api/v1/leads",
            get(lead_directory_endpoint).post(create_lead_endpoint),
        )
        .route("/api/v1/leads/:lead_id", delete(delete_lead_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn menu_endpoint() -> Json<Vec<MenuEntry>> {
    Json(View::menu())
}

// Extractors are taken as `Result` so a malformed path, query string or body
// is answered with the same JSON error shape as every other failure.
pub(crate) async fn view_endpoint(
    State(state): State<DashboardState>,
    view: Result<Path<String>, PathRejection>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<RenderedView>, AppError> {
    let Path(view) = view?;
    let Query(query) = query?;
    let view = view.parse::<View>()?;
    let options = view_options(
        state.defaults,
        query.sort.as_deref(),
        query.filter.as_deref(),
        query.audit,
    )?;
    let rendered = with_store(&state.store, move |store| {
        Ok(render_view(store, view, &options))
    })
    .await?;
    Ok(Json(rendered))
}

pub(crate) async fn lead_directory_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<Table>, AppError> {
    let directory = with_store(&state.store, |store| {
        Ok(ReportKind::LeadDirectory.run(store)?)
    })
    .await?;
    Ok(Json(Table::from_result_set(directory)))
}

pub(crate) async fn create_lead_endpoint(
    State(state): State<DashboardState>,
    lead: Result<Json<NewLead>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(lead) = lead?;
    let full_name = lead.full_name();
    let lead_id = with_store(&state.store, move |store| Ok(insert_lead(store, &lead)?)).await?;
    let payload = json!({
        "lead_id": lead_id,
        "message": format!("Lead {full_name} added!"),
    });
    Ok((StatusCode::CREATED, Json(payload)))
}

pub(crate) async fn delete_lead_endpoint(
    State(state): State<DashboardState>,
    lead_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(lead_id) = lead_id?;
    let lead_id = LeadId(lead_id);
    with_store(&state.store, move |store| Ok(delete_lead(store, lead_id)?)).await?;
    Ok(Json(json!({
        "lead_id": lead_id,
        "message": format!("Lead ID {lead_id} removed."),
    })))
}

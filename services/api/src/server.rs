use crate::cli::ServeArgs;
use crate::infra::{AppState, DashboardState};
use crate::routes::dashboard_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crm_dashboard::config::AppConfig;
use crm_dashboard::error::AppError;
use crm_dashboard::store::SqliteStore;
use crm_dashboard::views::ViewOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let store = SqliteStore::open(&config.database)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dashboard = DashboardState {
        store: Arc::new(store),
        defaults: ViewOptions::with_report_config(&config.reports),
    };

    let app = dashboard_router(dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        database = %config.database.path.display(),
        "crm dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

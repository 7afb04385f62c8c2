use crm_dashboard::error::AppError;
use crm_dashboard::presentation::{PipelineFilter, SelectionError};
use crm_dashboard::reports::DealSort;
use crm_dashboard::store::QueryExecutor;
use crm_dashboard::views::ViewOptions;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared by every dashboard route: the single store handle and the view
/// options applied when a request leaves a selection out.
#[derive(Clone)]
pub(crate) struct DashboardState {
    pub(crate) store: Arc<dyn QueryExecutor>,
    pub(crate) defaults: ViewOptions,
}

/// Runs `work` against the store on the blocking pool. Every store call takes
/// the connection mutex and waits on SQLite, so it must stay off the async
/// workers.
pub(crate) async fn with_store<T, F>(
    store: &Arc<dyn QueryExecutor>,
    work: F,
) -> Result<T, AppError>
where
    F: FnOnce(&dyn QueryExecutor) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || work(store.as_ref()))
        .await
        .map_err(io::Error::from)?
}

/// Overlays raw UI selections onto `defaults`. Absent selections keep the
/// default; unknown ones are rejected.
pub(crate) fn view_options(
    defaults: ViewOptions,
    sort: Option<&str>,
    filter: Option<&str>,
    run_audit: bool,
) -> Result<ViewOptions, SelectionError> {
    let sort = match sort {
        Some(raw) => raw.parse::<DealSort>()?,
        None => defaults.sort,
    };
    let pipeline_filter = match filter {
        Some(raw) => raw.parse::<PipelineFilter>()?,
        None => defaults.pipeline_filter,
    };

    Ok(ViewOptions {
        sort,
        pipeline_filter,
        run_audit: run_audit || defaults.run_audit,
        ..defaults
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_dashboard::store::SqliteStore;

    #[test]
    fn selections_accept_slugs_and_labels() {
        let options = view_options(
            ViewOptions::default(),
            Some("Most Recent (Date)"),
            Some("customers"),
            true,
        )
        .expect("selections parse");
        assert_eq!(options.sort, DealSort::MostRecent);
        assert_eq!(options.pipeline_filter, PipelineFilter::OnlyCustomers);
        assert!(options.run_audit);
    }

    #[test]
    fn missing_selections_keep_defaults() {
        let defaults = ViewOptions {
            top_agent_limit: 3,
            ..ViewOptions::default()
        };
        let options = view_options(defaults, None, None, false).expect("defaults apply");
        assert_eq!(options, defaults);
    }

    #[tokio::test]
    async fn panicking_store_work_becomes_an_error() {
        let store: Arc<dyn QueryExecutor> =
            Arc::new(SqliteStore::in_memory().expect("in-memory store opens"));
        let result: Result<(), AppError> = with_store(&store, |_| panic!("worker died")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let err = view_options(ViewOptions::default(), Some("alphabetical"), None, false)
            .expect_err("unknown sort");
        assert!(matches!(err, SelectionError::Unknown { kind: "sort", .. }));
    }
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDocumentRepository};
use crate::routes::with_document_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tenant_docs::config::AppConfig;
use tenant_docs::documents::{DocumentStatusService, TenantSnapshot};
use tenant_docs::error::AppError;
use tenant_docs::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let snapshot = match &config.snapshot_path {
        Some(path) => {
            let snapshot = TenantSnapshot::load(path)?;
            info!(
                path = %path.display(),
                companies = snapshot.companies.len(),
                "loaded document snapshot"
            );
            snapshot
        }
        None => TenantSnapshot::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryDocumentRepository::from_snapshot(snapshot));
    let status_service = Arc::new(DocumentStatusService::new(
        repository,
        config.engine.clone(),
    ));

    let app = with_document_routes(status_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        expiry_warning_days = config.engine.expiry_warning_days,
        "document compliance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

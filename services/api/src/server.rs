use crate::cli::ServeArgs;
use crate::infra::{load_members, member_directory, AppService, AppState};
use crate::routes::with_job_post_routes;
use crate::scheduler::start_expiration_scheduler;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::postings::{
    ExpirationSweep, InMemoryJobPostRepository, InMemoryNotificationPublisher, JobPostService,
};
use job_board::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.no_sweep {
        config.sweep.enabled = false;
    }

    telemetry::init(&config.telemetry)?;

    let members = match &config.members_file {
        Some(path) => load_members(path)?,
        None => {
            warn!("APP_MEMBERS_FILE not set; member directory starts empty");
            Vec::new()
        }
    };
    info!(members = members.len(), "member directory loaded");

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service: Arc<AppService> = Arc::new(JobPostService::new(
        Arc::new(InMemoryJobPostRepository::default()),
        member_directory(members),
        Arc::new(InMemoryNotificationPublisher::default()),
    ));

    let _scheduler = if config.sweep.enabled {
        let sweep = Arc::new(ExpirationSweep::new(service.clone()));
        let scheduler = start_expiration_scheduler(sweep, &config.sweep.schedule)
            .await
            .map_err(|err| AppError::Scheduler(Box::new(err)))?;
        Some(scheduler)
    } else {
        info!("expiration sweep disabled");
        None
    };

    let app = with_job_post_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use chrono::NaiveDate;
use job_board::error::AppError;
use job_board::postings::{
    InMemoryJobPostRepository, InMemoryMemberDirectory, InMemoryNotificationPublisher,
    JobPostService, Member,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type AppService =
    JobPostService<InMemoryJobPostRepository, InMemoryMemberDirectory, InMemoryNotificationPublisher>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Members come from a JSON array, e.g. `[{"id": 1, "username": "kim", "birth": "1990-01-01"}]`.
pub(crate) fn load_members(path: &Path) -> Result<Vec<Member>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_members(&raw)
}

pub(crate) fn parse_members(raw: &str) -> Result<Vec<Member>, AppError> {
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn member_directory(members: Vec<Member>) -> Arc<InMemoryMemberDirectory> {
    Arc::new(InMemoryMemberDirectory::with_members(members))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

use chrono::{DateTime, Utc};
use repo_scorer::config::ScoringConfig;
use repo_scorer::error::AppError;
use repo_scorer::scoring::ScoringService;
use repo_scorer::telemetry;
use tracing::info;

/// Load configuration, install logging, and build the scoring service.
/// Invalid weights stop the process here, before anything is scored.
pub(crate) fn bootstrap() -> Result<ScoringService, AppError> {
    let config = ScoringConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let service = ScoringService::from_config(&config)?;
    info!(
        default_strategy = %service.default_version(),
        "scoring service ready"
    );
    Ok(service)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

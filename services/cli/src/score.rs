use chrono::{DateTime, Utc};
use clap::Args;
use repo_scorer::error::AppError;
use repo_scorer::scoring::{MetricSnapshot, RuleOutcome, ScoringService, StrategyVersion};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Star count
    #[arg(long)]
    pub(crate) stars: i64,
    /// Fork count
    #[arg(long)]
    pub(crate) forks: i64,
    /// Days since the last update (defaults to 0)
    #[arg(long, conflicts_with = "updated_at")]
    pub(crate) days_since_update: Option<i64>,
    /// Last update as an RFC 3339 timestamp; days are counted up to now
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) updated_at: Option<DateTime<Utc>>,
    /// Repository name, used in logs and output
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Strategy version (falls back to the configured default when unknown)
    #[arg(long)]
    pub(crate) strategy: Option<String>,
    /// Print the score and every rule outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with columns name,stars,forks,days_since_update
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Strategy version (falls back to the configured default when unknown)
    #[arg(long)]
    pub(crate) strategy: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    stars: i64,
    forks: i64,
    days_since_update: i64,
    strategy: StrategyVersion,
    score: Decimal,
    outcomes: Vec<RuleOutcome>,
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    name: String,
    stars: i64,
    forks: i64,
    days_since_update: i64,
}

#[derive(Debug, Serialize)]
struct ScoredRow {
    name: String,
    stars: i64,
    forks: i64,
    days_since_update: i64,
    score: Decimal,
}

pub(crate) fn run_score(service: &ScoringService, args: ScoreArgs) -> Result<(), AppError> {
    let stdout = io::stdout();
    write_score(service, args, Utc::now(), stdout.lock())
}

pub(crate) fn run_batch(service: &ScoringService, args: BatchArgs) -> Result<(), AppError> {
    let file = File::open(&args.input)?;
    let stdout = io::stdout();
    let scored = score_rows(service, args.strategy.as_deref(), file, stdout.lock())?;
    info!(rows = scored, input = %args.input.display(), "batch scored");
    Ok(())
}

pub(crate) fn run_strategies(service: &ScoringService) -> Result<(), AppError> {
    let stdout = io::stdout();
    write_strategies(service, stdout.lock())
}

/// Score one snapshot; `now` anchors `--updated-at` day counting.
fn write_score<W: Write>(
    service: &ScoringService,
    args: ScoreArgs,
    now: DateTime<Utc>,
    mut output: W,
) -> Result<(), AppError> {
    let days_since_update = match args.updated_at {
        Some(updated_at) => MetricSnapshot::days_since(Some(updated_at), now),
        None => args.days_since_update.unwrap_or(0),
    };

    let mut snapshot = MetricSnapshot::new(args.stars, args.forks, days_since_update);
    if let Some(name) = &args.name {
        snapshot = snapshot.with_name(name.clone());
    }

    let strategy = args.strategy.as_deref();
    let score = service.calculate_score_with(&snapshot, strategy);

    if args.json {
        let report = ScoreReport {
            name: args.name,
            stars: args.stars,
            forks: args.forks,
            days_since_update,
            strategy: service.registry().create_strategy(strategy).version().clone(),
            score,
            outcomes: snapshot.outcomes(),
        };
        serde_json::to_writer_pretty(&mut output, &report)?;
        writeln!(output)?;
    } else {
        writeln!(output, "{score}")?;
    }

    Ok(())
}

fn write_strategies<W: Write>(service: &ScoringService, mut output: W) -> Result<(), AppError> {
    let default = service.default_version();
    for version in service.registry().versions() {
        if &version == default {
            writeln!(output, "{version} (default)")?;
        } else {
            writeln!(output, "{version}")?;
        }
    }
    Ok(())
}

/// Score each CSV row independently, writing results in input order.
fn score_rows<R: Read, W: Write>(
    service: &ScoringService,
    strategy: Option<&str>,
    input: R,
    output: W,
) -> Result<usize, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut scored = 0;

    for row in reader.deserialize::<BatchRow>() {
        let row = row?;
        let snapshot = MetricSnapshot::new(row.stars, row.forks, row.days_since_update)
            .with_name(row.name.clone());
        let score = service.calculate_score_with(&snapshot, strategy);

        writer.serialize(ScoredRow {
            name: row.name,
            stars: row.stars,
            forks: row.forks,
            days_since_update: row.days_since_update,
            score,
        })?;
        scored += 1;
    }

    writer.flush()?;
    Ok(scored)
}

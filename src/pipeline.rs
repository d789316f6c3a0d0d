//! One complete run: member table and config in, collection file out.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::config::VereinConfig;
use crate::core::*;
use crate::pain008::{DirectDebitBatch, ExportOptions};
use crate::spreadsheet::{DEFAULT_SHEET, read_member_table};

/// Inputs of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub sheet: String,
    pub min_delta: u32,
    /// Fixed GrpHdr/MsgId, mainly for reproducible output.
    pub message_id: Option<String>,
}

impl RunOptions {
    pub fn new(
        input: impl Into<PathBuf>,
        config: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            config: config.into(),
            output: output.into(),
            sheet: DEFAULT_SHEET.to_string(),
            min_delta: DEFAULT_MIN_DELTA_DAYS,
            message_id: None,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub active_members: usize,
    pub collection_date: NaiveDate,
    pub total_cents: i64,
    pub output: PathBuf,
    pub xml: String,
}

/// Default output file name for a run date, e.g. `sammelauftrag-2026-10-19.xml`.
pub fn default_output_name(today: NaiveDate) -> String {
    format!("sammelauftrag-{}.xml", today.format("%Y-%m-%d"))
}

/// Execute the whole pipeline. The output file is written only after the
/// batch validated and serialized successfully.
pub fn run(options: &RunOptions, now: NaiveDateTime) -> Result<RunSummary, EinzugError> {
    run_with(options, now, |_| {})
}

/// Like [`run`], but hands the loaded club profile to `on_config` before the
/// member table is read, so callers can report it even if the run fails.
pub fn run_with(
    options: &RunOptions,
    now: NaiveDateTime,
    on_config: impl FnOnce(&OrganizationProfile),
) -> Result<RunSummary, EinzugError> {
    ensure_file(&options.input, EinzugError::MissingInputFile)?;
    ensure_file(&options.config, EinzugError::MissingConfigFile)?;

    let config = VereinConfig::load(&options.config)?;
    let profile = config.profile();
    let description = config.description()?;
    info!(
        name = %profile.name,
        iban = %profile.iban,
        bic = %profile.bic,
        creditor_id = %profile.creditor_id,
        "using configuration"
    );
    on_config(&profile);

    let table = read_member_table(&options.input, &options.sheet)?;
    validate_member_table(&table)?;
    let members = filter_active(&table)?;

    let collection_date = determine_collection_date(now.date(), options.min_delta);
    info!(%collection_date, min_delta = options.min_delta, "collection date");

    let entries = build_payments(&members, collection_date, &description)?;
    let built_total = sum_cents(&entries).ok_or_else(|| {
        EinzugError::SerializationType("sum of amounts exceeds the i64 cent range".into())
    })?;

    let mut batch = DirectDebitBatch::new(profile);
    for entry in entries {
        batch.add_payment(entry);
    }
    let document = batch.export(&ExportOptions {
        message_id: options.message_id.clone(),
        created_at: now,
    })?;

    if document.total_cents != built_total {
        return Err(EinzugError::Validation(vec![ValidationError::new(
            "total",
            format!(
                "exported total {} differs from built total {}",
                format_euro(document.total_cents),
                format_euro(built_total)
            ),
        )]));
    }

    std::fs::write(&options.output, &document.xml)?;
    info!(output = %options.output.display(), "wrote collection file");

    Ok(RunSummary {
        active_members: members.len(),
        collection_date,
        total_cents: document.total_cents,
        output: options.output.clone(),
        xml: document.xml,
    })
}

fn ensure_file(path: &Path, missing: fn(PathBuf) -> EinzugError) -> Result<(), EinzugError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(missing(path.to_path_buf()))
    }
}

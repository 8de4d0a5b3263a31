//! Operator command-line interface.
//!
//! One subcommand per bulk operation, plus a read-only validation check.
//! Commands fetch the aggregate, run the orchestrator, and print the
//! processed/errored partition.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::{BulkActionAggregate, CaseReference, Config};
use crate::domain::ports::RemoteCaseStore;
use crate::infrastructure::credentials::EnvCredentialsProvider;
use crate::infrastructure::store::HttpCaseStore;
use crate::services::orchestrator::{BulkActionOrchestrator, BulkActionOutcome};
use crate::services::validation;

#[derive(Parser)]
#[command(name = "docket", about = "Bulk case actions against the remote case store", version)]
pub struct Cli {
    /// Path to a config file, overriding the default search locations.
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pronounce every case listed under a bulk action.
    Pronounce {
        #[arg(long)]
        bulk_id: Uuid,
    },
    /// Re-attempt pronouncement for the previously errored cases only.
    RetryPronounce {
        #[arg(long)]
        bulk_id: Uuid,
    },
    /// Move the whole batch to a new hearing slot.
    Reschedule {
        #[arg(long)]
        bulk_id: Uuid,
        /// New hearing date-time, RFC 3339 (e.g. 2026-09-02T10:00:00Z).
        #[arg(long)]
        hearing_date: DateTime<Utc>,
        #[arg(long)]
        court: String,
    },
    /// Reassign the pronouncement judge across the batch.
    AssignJudge {
        #[arg(long)]
        bulk_id: Uuid,
        #[arg(long)]
        judge: String,
    },
    /// Remove cases from the batch, unlinking each one.
    Remove {
        #[arg(long)]
        bulk_id: Uuid,
        /// Case references to remove; repeatable.
        #[arg(long = "case-ref", required = true)]
        case_refs: Vec<String>,
    },
    /// Run the pre-flight checks against a bulk action and report findings.
    Validate {
        #[arg(long)]
        bulk_id: Uuid,
    },
}

/// Execute a parsed command against the configured store.
pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    let store = Arc::new(HttpCaseStore::new(&config.store).context("Failed to build case store client")?);
    let credentials = Arc::new(EnvCredentialsProvider::new());
    let orchestrator =
        BulkActionOrchestrator::new(store.clone(), credentials.clone(), config.trigger.clone());

    match cli.command {
        Commands::Pronounce { bulk_id } => {
            let mut aggregate = fetch(&*store, &credentials, bulk_id).await?;
            let outcome = orchestrator.pronounce(&mut aggregate).await?;
            print_outcome(&aggregate, &outcome);
        }
        Commands::RetryPronounce { bulk_id } => {
            let mut aggregate = fetch(&*store, &credentials, bulk_id).await?;
            let outcome = orchestrator.retry_pronounce(&mut aggregate).await?;
            print_outcome(&aggregate, &outcome);
        }
        Commands::Reschedule { bulk_id, hearing_date, court } => {
            let mut aggregate = fetch(&*store, &credentials, bulk_id).await?;
            let outcome = orchestrator
                .reschedule_hearing(&mut aggregate, hearing_date, court)
                .await?;
            print_outcome(&aggregate, &outcome);
        }
        Commands::AssignJudge { bulk_id, judge } => {
            let mut aggregate = fetch(&*store, &credentials, bulk_id).await?;
            let outcome = orchestrator.reassign_judge(&mut aggregate, judge).await?;
            print_outcome(&aggregate, &outcome);
        }
        Commands::Remove { bulk_id, case_refs } => {
            let mut aggregate = fetch(&*store, &credentials, bulk_id).await?;
            let refs: Vec<CaseReference> =
                case_refs.iter().map(|r| CaseReference::new(r.as_str())).collect();
            let outcome = orchestrator.remove_cases(&mut aggregate, &refs).await?;
            print_outcome(&aggregate, &outcome);
        }
        Commands::Validate { bulk_id } => {
            let aggregate = fetch(&*store, &credentials, bulk_id).await?;
            print_validation(&aggregate);
        }
    }

    Ok(())
}

async fn fetch(
    store: &HttpCaseStore,
    credentials: &Arc<EnvCredentialsProvider>,
    bulk_id: Uuid,
) -> Result<BulkActionAggregate> {
    use crate::domain::ports::CredentialsProvider;

    let creds = credentials.acquire().await?;
    store
        .fetch_bulk_action(bulk_id, &creds)
        .await
        .with_context(|| format!("Failed to fetch bulk action {bulk_id}"))
}

fn print_outcome(aggregate: &BulkActionAggregate, outcome: &BulkActionOutcome) {
    println!(
        "bulk action {} is {}: {} processed, {} errored",
        aggregate.id,
        aggregate.state,
        outcome.processed.len(),
        outcome.errored.len()
    );

    if outcome.errored.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Errored case", "Parties"]);
    for entry in &outcome.errored {
        table.add_row(vec![entry.case_reference.as_str(), entry.case_parties.as_str()]);
    }
    println!("{table}");
    println!("the errored cases are retained on the bulk action for retry");
}

fn print_validation(aggregate: &BulkActionAggregate) {
    // A standalone check compares the aggregate against itself: the
    // removal/scheduling diffs are for edit flows, so only the absolute
    // checks can fire here.
    let errors = validation::validate_bulk_schedule(aggregate, aggregate, Utc::now());

    if errors.is_empty() {
        println!("bulk action {} passes pre-flight validation", aggregate.id);
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Validation error"]);
    for error in &errors {
        table.add_row(vec![error.as_str()]);
    }
    println!("{table}");
}

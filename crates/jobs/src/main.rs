// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use market_participant::{
    ConsolidationReport, ExpiringCredentials, consolidate_ready_actors, scan_expiring_credentials,
};
use market_participant_persistence::Persistence;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Market participant jobs - runs consolidations and credential expiry checks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Seconds between runs. `0` runs the selected jobs once and exits.
    #[arg(short, long, default_value_t = 300)]
    interval_seconds: u64,

    #[command(subcommand)]
    command: Option<Job>,
}

/// Which jobs a tick runs.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Job {
    /// Execute consolidations that are due
    Consolidate,
    /// Report actors whose credentials expire soon
    CheckCredentials,
    /// Run every job
    #[default]
    All,
}

impl Job {
    const fn consolidates(self) -> bool {
        matches!(self, Self::Consolidate | Self::All)
    }

    const fn checks_credentials(self) -> bool {
        matches!(self, Self::CheckCredentials | Self::All)
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TickSummary {
    consolidated: usize,
    failed_consolidations: usize,
    expiring_credentials: usize,
    /// Jobs that could not run at all.
    errors: usize,
}

/// Runs the selected jobs once. Failures are logged and counted.
fn run_jobs(persistence: &mut Persistence, job: Job, now: OffsetDateTime) -> TickSummary {
    let mut summary: TickSummary = TickSummary::default();

    if job.consolidates() {
        match consolidate_ready_actors(persistence, now) {
            Ok(report) => {
                let ConsolidationReport {
                    consolidated,
                    failed,
                } = report;
                for (consolidation_id, err) in &failed {
                    warn!(%consolidation_id, error = %err, "Consolidation marked as failed");
                }
                summary.consolidated = consolidated.len();
                summary.failed_consolidations = failed.len();
            }
            Err(err) => {
                error!(error = %err, "Could not list due consolidations");
                summary.errors += 1;
            }
        }
    }

    if job.checks_credentials() {
        match scan_expiring_credentials(persistence, now) {
            Ok(expiring) => {
                for ExpiringCredentials {
                    actor_id,
                    actor_number,
                    expires_at,
                } in &expiring
                {
                    warn!(%actor_id, %actor_number, %expires_at, "Actor credentials expire soon");
                }
                summary.expiring_credentials = expiring.len();
            }
            Err(err) => {
                error!(error = %err, "Credential expiry scan failed");
                summary.errors += 1;
            }
        }
    }

    info!(
        consolidated = summary.consolidated,
        failed_consolidations = summary.failed_consolidations,
        expiring_credentials = summary.expiring_credentials,
        errors = summary.errors,
        "Job run finished"
    );
    summary
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing market participant jobs");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.verify_foreign_key_enforcement()?;

    let job: Job = args.command.unwrap_or_default();

    if args.interval_seconds == 0 {
        run_jobs(&mut persistence, job, OffsetDateTime::now_utc());
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(args.interval_seconds));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(?job, interval_seconds = args.interval_seconds, "Running jobs periodically");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_jobs(&mut persistence, job, OffsetDateTime::now_utc());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_participant::{
        assign_actor_credentials, create_actor, schedule_consolidation, update_actor_status,
    };
    use market_participant_domain::{
        ActorCredentials, ActorId, ActorNumber, ActorStatus, CertificateCredentials, EicFunction,
        MarketRole, OrganizationId,
    };
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-01 12:00 UTC);

    fn create_test_persistence() -> Persistence {
        Persistence::new_in_memory().expect("Failed to create in-memory persistence")
    }

    fn active_supplier(persistence: &mut Persistence, n: u32) -> ActorId {
        let actor_id: ActorId = create_actor(
            persistence,
            OrganizationId::new(),
            ActorNumber::new(&format!("579{n:010}")).unwrap(),
            format!("Supplier {n}"),
            vec![MarketRole::new(EicFunction::EnergySupplier, Vec::new(), None).unwrap()],
        )
        .unwrap();
        update_actor_status(persistence, actor_id, ActorStatus::Active).unwrap();
        actor_id
    }

    #[test]
    fn test_args_default_to_all_jobs_every_five_minutes() {
        let args: Args = Args::try_parse_from(["market-participant-jobs"]).unwrap();

        assert_eq!(args.database, None);
        assert_eq!(args.interval_seconds, 300);
        assert_eq!(args.command.unwrap_or_default(), Job::All);
    }

    #[test]
    fn test_args_parse_subcommand_and_options() {
        let args: Args = Args::try_parse_from([
            "market-participant-jobs",
            "--database",
            "/tmp/market.db",
            "--interval-seconds",
            "0",
            "check-credentials",
        ])
        .unwrap();

        assert_eq!(args.database.as_deref(), Some("/tmp/market.db"));
        assert_eq!(args.interval_seconds, 0);
        assert_eq!(args.command, Some(Job::CheckCredentials));
    }

    #[test]
    fn test_empty_store_runs_cleanly() {
        let mut persistence: Persistence = create_test_persistence();

        let summary: TickSummary = run_jobs(&mut persistence, Job::All, NOW);

        assert_eq!(summary, TickSummary::default());
    }

    #[test]
    fn test_consolidate_runs_only_due_consolidations() {
        let mut persistence: Persistence = create_test_persistence();
        let from: ActorId = active_supplier(&mut persistence, 1);
        let to: ActorId = active_supplier(&mut persistence, 2);
        schedule_consolidation(&mut persistence, from, to, datetime!(2026-10-02 00:00 UTC))
            .unwrap();

        let before: TickSummary = run_jobs(&mut persistence, Job::Consolidate, NOW);
        let after: TickSummary = run_jobs(
            &mut persistence,
            Job::Consolidate,
            datetime!(2026-10-02 00:00 UTC),
        );

        assert_eq!(before.consolidated, 0);
        assert_eq!(after.consolidated, 1);
        assert_eq!(after.failed_consolidations, 0);
    }

    #[test]
    fn test_check_credentials_does_not_consolidate() {
        let mut persistence: Persistence = create_test_persistence();
        let from: ActorId = active_supplier(&mut persistence, 1);
        let to: ActorId = active_supplier(&mut persistence, 2);
        schedule_consolidation(&mut persistence, from, to, NOW).unwrap();
        assign_actor_credentials(
            &mut persistence,
            from,
            ActorCredentials::Certificate(CertificateCredentials {
                thumbprint: String::from("AB12"),
                key_vault_secret_identifier: String::from("https://vault/secrets/ab12"),
                expires_at: datetime!(2026-10-10 00:00 UTC),
            }),
        )
        .unwrap();

        let summary: TickSummary = run_jobs(&mut persistence, Job::CheckCredentials, NOW);

        assert_eq!(summary.consolidated, 0);
        assert_eq!(summary.expiring_credentials, 1);
    }
}

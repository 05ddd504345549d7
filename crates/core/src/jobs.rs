// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Periodic background jobs.

use crate::error::{CoreError, StoreError};
use crate::handlers::{load_actor, save_actor};
use crate::repositories::{MarketParticipantStore, UnitOfWorkScope};
use crate::rules::validate_unique_market_role_grid_areas;
use market_participant_domain::{
    Actor, ActorConsolidation, ActorConsolidationId, ActorId, ActorNumber, ActorStatus,
    DomainError,
};
use time::OffsetDateTime;
use tracing::{error, info, warn};

/// Number of actors loaded per unit of work by [`scan_expiring_credentials`].
pub const CREDENTIAL_SCAN_BATCH_SIZE: usize = 100;

/// Result of one [`consolidate_ready_actors`] run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsolidationReport {
    /// Consolidations executed.
    pub consolidated: Vec<ActorConsolidationId>,
    /// Consolidations marked failed, with the reason.
    pub failed: Vec<(ActorConsolidationId, CoreError)>,
}

/// An actor whose credentials are about to expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiringCredentials {
    pub actor_id: ActorId,
    pub actor_number: ActorNumber,
    pub expires_at: OffsetDateTime,
}

/// Executes every pending consolidation due at `now`.
///
/// Each consolidation runs in its own unit of work. When one fails, its
/// changes are rolled back and it is marked failed in a separate unit of
/// work; the remaining consolidations still run.
///
/// # Errors
///
/// Returns an error only if the due consolidations cannot be listed.
pub fn consolidate_ready_actors<S>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<ConsolidationReport, StoreError>
where
    S: MarketParticipantStore,
{
    let ready: Vec<ActorConsolidation> = store.get_ready_to_consolidate(now)?;
    let mut report: ConsolidationReport = ConsolidationReport::default();

    for consolidation in ready {
        let consolidation_id: ActorConsolidationId = consolidation.id();
        match execute_consolidation(store, consolidation_id) {
            Ok(()) => {
                info!(
                    %consolidation_id,
                    actor_from = %consolidation.actor_from(),
                    actor_to = %consolidation.actor_to(),
                    "Consolidated actors"
                );
                report.consolidated.push(consolidation_id);
            }
            Err(err) => {
                warn!(%consolidation_id, error = %err, "Consolidation failed");
                if let Err(mark_err) = mark_consolidation_failed(store, consolidation_id) {
                    error!(
                        %consolidation_id,
                        error = %mark_err,
                        "Could not mark consolidation as failed"
                    );
                }
                report.failed.push((consolidation_id, err));
            }
        }
    }

    Ok(report)
}

fn load_consolidation<S>(
    store: &mut S,
    consolidation_id: ActorConsolidationId,
) -> Result<ActorConsolidation, CoreError>
where
    S: MarketParticipantStore,
{
    store
        .get_consolidation(consolidation_id)?
        .ok_or_else(|| DomainError::ConsolidationNotFound(consolidation_id).into())
}

fn execute_consolidation<S>(
    store: &mut S,
    consolidation_id: ActorConsolidationId,
) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut consolidation: ActorConsolidation = load_consolidation(&mut *uow, consolidation_id)?;
    let mut from: Actor = load_actor(&mut *uow, consolidation.actor_from())?;
    let mut to: Actor = load_actor(&mut *uow, consolidation.actor_to())?;

    // Release the source first so the target can take over its keys.
    uow.remove_all_reservations(from.id())?;
    to.take_over_grid_areas(&from);
    validate_unique_market_role_grid_areas(&mut *uow, &to)?;

    from.remove_credentials();
    if matches!(from.status(), ActorStatus::Active | ActorStatus::Passive) {
        from.deactivate()?;
    }

    consolidation.mark_consolidated()?;

    save_actor(&mut *uow, &mut to)?;
    save_actor(&mut *uow, &mut from)?;
    uow.add_or_update_consolidation(&consolidation)?;
    uow.enqueue(&mut consolidation)?;
    uow.commit()?;
    Ok(())
}

fn mark_consolidation_failed<S>(
    store: &mut S,
    consolidation_id: ActorConsolidationId,
) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut consolidation: ActorConsolidation = load_consolidation(&mut *uow, consolidation_id)?;
    consolidation.mark_failed()?;
    uow.add_or_update_consolidation(&consolidation)?;
    uow.commit()?;
    Ok(())
}

/// Reports every non-deleted actor whose credentials expire soon after `now`.
///
/// Actors are read in pages of [`CREDENTIAL_SCAN_BATCH_SIZE`], one unit of
/// work per page. An `ActorCredentialsExpiring` event is stored per actor.
///
/// # Errors
///
/// Returns an error if the store fails; pages already committed stay committed.
pub fn scan_expiring_credentials<S>(
    store: &mut S,
    now: OffsetDateTime,
) -> Result<Vec<ExpiringCredentials>, CoreError>
where
    S: MarketParticipantStore,
{
    let mut expiring: Vec<ExpiringCredentials> = Vec::new();
    let mut offset: usize = 0;

    loop {
        let mut uow = UnitOfWorkScope::begin(&mut *store)?;
        let page: Vec<Actor> = uow.get_actors_page(offset, CREDENTIAL_SCAN_BATCH_SIZE)?;
        let page_len: usize = page.len();

        for mut actor in page {
            if actor.status() == ActorStatus::Deleted || !actor.report_expiring_credentials(now) {
                continue;
            }
            let Some(expires_at) = actor.credentials().map(|credentials| credentials.expires_at())
            else {
                continue;
            };
            uow.enqueue(&mut actor)?;
            expiring.push(ExpiringCredentials {
                actor_id: actor.id(),
                actor_number: actor.actor_number().clone(),
                expires_at,
            });
        }

        uow.commit()?;

        if page_len < CREDENTIAL_SCAN_BATCH_SIZE {
            break;
        }
        offset += CREDENTIAL_SCAN_BATCH_SIZE;
    }

    info!(count = expiring.len(), "Scanned actor credentials");
    Ok(expiring)
}

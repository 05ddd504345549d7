// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::load_actor;
use crate::error::CoreError;
use crate::repositories::{
    DelegationRepository, DomainEventRepository, EntityLock, LockableEntity,
    MarketParticipantStore, UnitOfWork, UnitOfWorkScope,
};
use crate::rules::validate_delegation_allowed;
use market_participant_domain::{
    Actor, ActorId, ActorStatus, DelegatedProcess, Delegation, DelegationId, DelegationKind,
    DelegationPeriodId, DomainError, GridAreaId,
};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Rejects a process delegation that would make either actor take part in
/// the same process with a second counterpart.
fn check_process_exclusivity<K, S>(
    store: &mut S,
    process: DelegatedProcess,
    own: &Delegation<K>,
    delegated_by: ActorId,
    delegated_to: ActorId,
    starts_at: OffsetDateTime,
) -> Result<(), CoreError>
where
    K: DelegationKind,
    S: DelegationRepository<K>,
{
    if own
        .recipients_overlapping(starts_at)
        .any(|recipient| recipient != delegated_to)
    {
        return Err(DomainError::ProcessAlreadyDelegatedFrom {
            actor_id: delegated_by,
            process,
        }
        .into());
    }

    let received: Vec<Delegation<K>> = store.get_delegations_to_actor(delegated_to)?;
    let from_other_actor: bool = received.iter().any(|delegation| {
        delegation.kind().as_exclusive_process() == Some(process)
            && delegation.delegated_by() != delegated_by
            && delegation
                .recipients_overlapping(starts_at)
                .any(|recipient| recipient == delegated_to)
    });
    if from_other_actor {
        return Err(DomainError::ProcessAlreadyDelegatedTo {
            actor_id: delegated_to,
            process,
        }
        .into());
    }

    Ok(())
}

/// Delegates `kind` for every grid area in `grid_areas` from `delegated_by`
/// to `delegated_to`, starting at `starts_at`.
///
/// The delegating actor's existing delegation for `kind` is extended, or a
/// new one is created. Each grid area gets its own period.
///
/// # Arguments
///
/// * `store` - The store to read from and write to
/// * `delegated_by` - The delegating actor
/// * `delegated_to` - The actor receiving responsibility
/// * `kind` - The message type or process being delegated
/// * `grid_areas` - Grid areas covered by the delegation
/// * `starts_at` - Start of the new periods
///
/// # Returns
///
/// The ids of the new periods, in `grid_areas` order. An empty
/// `grid_areas` is validated but writes nothing.
///
/// # Errors
///
/// Returns an error if:
/// - Either actor does not exist
/// - The actor delegates to itself
/// - Either actor is not `Active`
/// - The delegation forms a forbidden market role combination
/// - A process is already delegated to or from a different actor
/// - A grid area already has an open period for `kind`
pub fn create_delegation<K, S>(
    store: &mut S,
    delegated_by: ActorId,
    delegated_to: ActorId,
    kind: K,
    grid_areas: &[GridAreaId],
    starts_at: OffsetDateTime,
) -> Result<Vec<DelegationPeriodId>, CoreError>
where
    K: DelegationKind,
    S: MarketParticipantStore + DelegationRepository<K>,
{
    let scope = K::SCOPE;
    let mut uow = UnitOfWorkScope::begin(store)?;
    uow.lock(LockableEntity::Actor)?;

    let delegator: Actor = load_actor(&mut *uow, delegated_by)?;
    let recipient: Actor = load_actor(&mut *uow, delegated_to)?;

    if delegated_by == delegated_to {
        return Err(DomainError::DelegatedToSelf {
            scope,
            actor_id: delegated_by,
        }
        .into());
    }

    if delegator.status() != ActorStatus::Active || recipient.status() != ActorStatus::Active {
        warn!(
            %delegated_by,
            %delegated_to,
            delegator_status = %delegator.status(),
            recipient_status = %recipient.status(),
            "Rejected delegation between inactive actors"
        );
        return Err(DomainError::DelegationActorsInactive {
            scope,
            delegated_by,
            delegated_to,
        }
        .into());
    }

    validate_delegation_allowed(&mut *uow, scope, &delegator, &[delegated_to])?;

    if grid_areas.is_empty() {
        return Ok(Vec::new());
    }

    let mut delegation: Delegation<K> =
        <S as DelegationRepository<K>>::get_delegation_for_actor(&mut *uow, delegated_by, kind)?
            .unwrap_or_else(|| Delegation::new(delegated_by, kind));

    if let Some(process) = kind.as_exclusive_process() {
        check_process_exclusivity(
            &mut *uow,
            process,
            &delegation,
            delegated_by,
            delegated_to,
            starts_at,
        )?;
    }

    let mut period_ids: Vec<DelegationPeriodId> = Vec::with_capacity(grid_areas.len());
    for grid_area_id in grid_areas {
        if period_ids
            .iter()
            .filter_map(|id| delegation.period(*id))
            .any(|period| period.grid_area_id() == *grid_area_id)
        {
            continue;
        }
        if delegation.overlapping_period(*grid_area_id, starts_at).is_some() {
            return Err(DomainError::DelegationOverlappingPeriod {
                scope,
                kind: kind.to_string(),
                grid_area_id: *grid_area_id,
            }
            .into());
        }
        period_ids.push(delegation.delegate_to(delegated_to, *grid_area_id, starts_at));
    }

    <S as DelegationRepository<K>>::add_or_update_delegation(&mut *uow, &delegation)?;
    uow.enqueue(&mut delegation)?;
    uow.commit()?;

    info!(
        %scope,
        %kind,
        %delegated_by,
        %delegated_to,
        periods = period_ids.len(),
        "Configured delegation"
    );
    Ok(period_ids)
}

/// Stops one period of a delegation.
///
/// `stops_at` of `None` cancels the period.
///
/// # Errors
///
/// Returns an error if the delegation or period does not exist, or if the
/// stop lies before the start or changes an already stopped period.
pub fn stop_delegation<K, S>(
    store: &mut S,
    delegation_id: DelegationId,
    period_id: DelegationPeriodId,
    stops_at: Option<OffsetDateTime>,
) -> Result<(), CoreError>
where
    K: DelegationKind,
    S: DelegationRepository<K> + DomainEventRepository + EntityLock + UnitOfWork,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    uow.lock(LockableEntity::Actor)?;

    let mut delegation: Delegation<K> =
        <S as DelegationRepository<K>>::get_delegation(&mut *uow, delegation_id)?.ok_or(
            DomainError::DelegationNotFound {
                scope: K::SCOPE,
                delegation_id,
            },
        )?;

    delegation.stop_delegation(period_id, stops_at)?;

    <S as DelegationRepository<K>>::add_or_update_delegation(&mut *uow, &delegation)?;
    uow.enqueue(&mut delegation)?;
    uow.commit()?;

    info!(scope = %K::SCOPE, %delegation_id, %period_id, "Stopped delegation period");
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repositories::{
    ActorRepository, DelegationRepository, MessageDelegationRepository,
    ProcessDelegationRepository,
};
use market_participant_domain::{
    Actor, ActorId, DelegatedProcess, DelegationMessageType, DelegationScope, EicFunction,
    MessageDelegation, OrganizationId, ProcessDelegation, validate_delegation_combination,
    validate_market_role_against_delegations,
};
use std::collections::BTreeSet;
use tracing::debug;

fn collect_functions(actors: &[Actor]) -> Vec<EicFunction> {
    actors
        .iter()
        .flat_map(Actor::functions)
        .collect::<BTreeSet<EicFunction>>()
        .into_iter()
        .collect()
}

/// Checks that `new_function` may be added to an organization.
///
/// Every actor in the organization holding the `Delegated` role is followed
/// back to the actors delegating to it, through message and process
/// delegations alike. The organization's functions plus `new_function` must
/// not form a forbidden pair with any of those delegators' functions.
///
/// # Errors
///
/// Returns `DomainError::MarketRoleForbiddenByDelegation`, or a store error.
pub fn validate_market_role_allowed<S>(
    store: &mut S,
    organization_id: OrganizationId,
    new_function: EicFunction,
) -> Result<(), CoreError>
where
    S: ActorRepository + MessageDelegationRepository + ProcessDelegationRepository,
{
    let organization_actors: Vec<Actor> = store.get_actors_in_organization(organization_id)?;
    let organization_functions: Vec<EicFunction> = collect_functions(&organization_actors);

    let mut delegator_ids: BTreeSet<ActorId> = BTreeSet::new();
    for recipient in organization_actors
        .iter()
        .filter(|actor| actor.has_function(EicFunction::Delegated))
    {
        let messages: Vec<MessageDelegation> =
            <S as DelegationRepository<DelegationMessageType>>::get_delegations_to_actor(
                store,
                recipient.id(),
            )?;
        let processes: Vec<ProcessDelegation> =
            <S as DelegationRepository<DelegatedProcess>>::get_delegations_to_actor(
                store,
                recipient.id(),
            )?;

        delegator_ids.extend(messages.iter().map(MessageDelegation::delegated_by));
        delegator_ids.extend(processes.iter().map(ProcessDelegation::delegated_by));
    }

    if delegator_ids.is_empty() {
        return Ok(());
    }

    let delegator_ids: Vec<ActorId> = delegator_ids.into_iter().collect();
    let delegators: Vec<Actor> = store.get_actors(&delegator_ids)?;
    debug!(
        %organization_id,
        %new_function,
        delegators = delegators.len(),
        "Checking new market role against delegations"
    );

    validate_market_role_against_delegations(
        organization_id,
        new_function,
        &organization_functions,
        &collect_functions(&delegators),
    )?;
    Ok(())
}

/// Checks that `delegator` may delegate to the actors in `delegated_to`.
///
/// The delegator's functions are compared with every function present in
/// the organizations the delegated-to actors belong to.
///
/// # Errors
///
/// Returns `DomainError::DelegationMarketRoleForbidden`, or a store error.
pub fn validate_delegation_allowed<S>(
    store: &mut S,
    scope: DelegationScope,
    delegator: &Actor,
    delegated_to: &[ActorId],
) -> Result<(), CoreError>
where
    S: ActorRepository,
{
    let recipients: Vec<Actor> = store.get_actors(delegated_to)?;
    let organizations: BTreeSet<OrganizationId> =
        recipients.iter().map(Actor::organization_id).collect();

    let mut recipient_actors: Vec<Actor> = Vec::new();
    for organization_id in organizations {
        recipient_actors.extend(store.get_actors_in_organization(organization_id)?);
    }

    let delegator_functions: Vec<EicFunction> = delegator.functions().collect();
    validate_delegation_combination(
        scope,
        &delegator_functions,
        &collect_functions(&recipient_actors),
    )?;
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{load_actor, save_actor};
use crate::error::CoreError;
use crate::repositories::{
    MarketParticipantStore, MarketRoleAndGridAreaReservationService, UnitOfWorkScope,
};
use crate::rules::{
    validate_market_role_allowed, validate_overlapping_eic_functions,
    validate_unique_market_role_grid_areas,
};
use market_participant_domain::{
    Actor, ActorCredentials, ActorId, ActorNumber, ActorStatus, EicFunction, MarketRole,
    OrganizationId,
};
use tracing::info;

/// Re-runs the reservation rule, or releases everything for a deleted actor.
fn refresh_reservations<S>(store: &mut S, actor: &Actor) -> Result<(), CoreError>
where
    S: MarketRoleAndGridAreaReservationService,
{
    if actor.status() == ActorStatus::Deleted {
        store.remove_all_reservations(actor.id())?;
        return Ok(());
    }
    validate_unique_market_role_grid_areas(store, actor)
}

/// Creates a new actor with its initial market roles.
///
/// # Errors
///
/// Returns an error if a market role conflicts with the reservation ledger,
/// with other actors in the organization or with existing delegations.
pub fn create_actor<S>(
    store: &mut S,
    organization_id: OrganizationId,
    actor_number: ActorNumber,
    name: String,
    market_roles: Vec<MarketRole>,
) -> Result<ActorId, CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;

    let mut actor: Actor = Actor::new(organization_id, actor_number, name);
    let functions: Vec<EicFunction> = market_roles.iter().map(MarketRole::function).collect();
    actor.set_market_roles(market_roles)?;

    validate_unique_market_role_grid_areas(&mut *uow, &actor)?;
    validate_overlapping_eic_functions(&mut *uow, &actor)?;
    for function in functions {
        validate_market_role_allowed(&mut *uow, organization_id, function)?;
    }

    save_actor(&mut *uow, &mut actor)?;
    uow.commit()?;

    info!(
        actor_id = %actor.id(),
        actor_number = %actor.actor_number(),
        %organization_id,
        "Created actor"
    );
    Ok(actor.id())
}

/// Changes an actor's status.
///
/// # Errors
///
/// Returns an error if the actor does not exist, the transition is not
/// allowed or the actor's grid areas are reserved by another actor.
pub fn update_actor_status<S>(
    store: &mut S,
    actor_id: ActorId,
    status: ActorStatus,
) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut actor: Actor = load_actor(&mut *uow, actor_id)?;
    let previous: ActorStatus = actor.status();

    actor.set_status(status)?;
    refresh_reservations(&mut *uow, &actor)?;
    validate_overlapping_eic_functions(&mut *uow, &actor)?;

    save_actor(&mut *uow, &mut actor)?;
    uow.commit()?;

    info!(%actor_id, from = %previous, to = %status, "Changed actor status");
    Ok(())
}

/// Replaces the market roles of a `New` actor.
///
/// # Errors
///
/// Returns an error if the actor does not exist or is no longer `New`, or if
/// the roles conflict with reservations, other actors or delegations.
pub fn update_actor_market_roles<S>(
    store: &mut S,
    actor_id: ActorId,
    market_roles: Vec<MarketRole>,
) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut actor: Actor = load_actor(&mut *uow, actor_id)?;

    let added: Vec<EicFunction> = market_roles
        .iter()
        .map(MarketRole::function)
        .filter(|function| !actor.has_function(*function))
        .collect();
    actor.set_market_roles(market_roles)?;

    refresh_reservations(&mut *uow, &actor)?;
    validate_overlapping_eic_functions(&mut *uow, &actor)?;
    for function in added {
        validate_market_role_allowed(&mut *uow, actor.organization_id(), function)?;
    }

    save_actor(&mut *uow, &mut actor)?;
    uow.commit()?;

    info!(%actor_id, roles = actor.market_roles().len(), "Updated actor market roles");
    Ok(())
}

/// # Errors
///
/// Returns an error if the actor does not exist.
pub fn update_actor_name<S>(store: &mut S, actor_id: ActorId, name: String) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut actor: Actor = load_actor(&mut *uow, actor_id)?;
    actor.set_name(name);
    save_actor(&mut *uow, &mut actor)?;
    uow.commit()?;
    Ok(())
}

/// Assigns credentials to an actor that has none.
///
/// # Errors
///
/// Returns `actor.credentials.already_assigned` if the actor has credentials
/// and `actor.credentials.thumbprint_reserved` if another actor uses the
/// certificate thumbprint.
pub fn assign_actor_credentials<S>(
    store: &mut S,
    actor_id: ActorId,
    credentials: ActorCredentials,
) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut actor: Actor = load_actor(&mut *uow, actor_id)?;
    let kind: &'static str = credentials.kind();

    actor.assign_credentials(credentials)?;
    save_actor(&mut *uow, &mut actor)?;
    uow.commit()?;

    info!(%actor_id, kind, "Assigned actor credentials");
    Ok(())
}

/// Removes an actor's credentials, if any.
///
/// # Errors
///
/// Returns an error if the actor does not exist.
pub fn remove_actor_credentials<S>(store: &mut S, actor_id: ActorId) -> Result<(), CoreError>
where
    S: MarketParticipantStore,
{
    let mut uow = UnitOfWorkScope::begin(store)?;
    let mut actor: Actor = load_actor(&mut *uow, actor_id)?;
    if actor.remove_credentials() {
        save_actor(&mut *uow, &mut actor)?;
        info!(%actor_id, "Removed actor credentials");
    }
    uow.commit()?;
    Ok(())
}

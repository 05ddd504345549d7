// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repositories::ActorRepository;
use market_participant_domain::{
    Actor, validate_datahub_administrator, validate_unique_functions_per_actor_number,
};
use tracing::debug;

/// Checks `actor` against the other actors of its organization.
///
/// Market roles must be unique per actor number within the organization and
/// a new actor cannot bring the organization's first DataHub administrator.
///
/// # Errors
///
/// Returns `DomainError::MarketRoleReserved` or
/// `DomainError::DataHubAdministratorNotAllowed`, or a store error.
pub fn validate_overlapping_eic_functions<S>(store: &mut S, actor: &Actor) -> Result<(), CoreError>
where
    S: ActorRepository,
{
    let organization_actors: Vec<Actor> =
        store.get_actors_in_organization(actor.organization_id())?;
    debug!(
        organization_id = %actor.organization_id(),
        actors = organization_actors.len(),
        "Checking market roles across organization"
    );

    validate_unique_functions_per_actor_number(actor, &organization_actors)?;
    validate_datahub_administrator(actor, &organization_actors)?;
    Ok(())
}

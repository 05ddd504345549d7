// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repositories::MarketRoleAndGridAreaReservationService;
use market_participant_domain::{Actor, DomainError};
use tracing::{info, warn};

/// Rebuilds the reservations held by `actor` from its current market roles.
///
/// All reservations owned by the actor are released first and then every
/// reservable (function, grid area) pair is reserved again. A failure leaves
/// the actor without reservations, so the caller's unit of work must roll back.
///
/// # Errors
///
/// Returns `DomainError::GridAreaReserved` for the first pair owned by another
/// actor, or a store error.
pub fn validate_unique_market_role_grid_areas<S>(store: &mut S, actor: &Actor) -> Result<(), CoreError>
where
    S: MarketRoleAndGridAreaReservationService,
{
    store.remove_all_reservations(actor.id())?;

    for (function, grid_area_id) in actor.reservable_pairs() {
        if !store.try_reserve(actor.id(), function, grid_area_id)? {
            warn!(
                actor_id = %actor.id(),
                %function,
                %grid_area_id,
                "Grid area already reserved by another actor"
            );
            return Err(DomainError::GridAreaReserved {
                function,
                grid_area_id,
            }
            .into());
        }
        info!(actor_id = %actor.id(), %function, %grid_area_id, "Reserved grid area");
    }

    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grid area reservation ledger mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use market_participant_domain::{ActorId, EicFunction, GridAreaId};
use tracing::{debug, info};

use crate::diesel_schema::market_role_grid_area_reservations as reservations;
use crate::error::PersistenceError;
use crate::queries::reservations::get_reservation_owner;

/// Reserves `(function, grid_area_id)` for `actor_id`.
///
/// The insert is ignored when the pair is already reserved; the owner is
/// then read back, so re-reserving for the same actor succeeds.
///
/// # Returns
///
/// `true` if `actor_id` owns the reservation afterwards.
///
/// # Errors
///
/// Returns an error if a database statement fails.
pub fn try_reserve(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
    function: EicFunction,
    grid_area_id: GridAreaId,
) -> Result<bool, PersistenceError> {
    let inserted: usize = diesel::insert_or_ignore_into(reservations::table)
        .values((
            reservations::eic_function.eq(function.as_str()),
            reservations::grid_area_id.eq(grid_area_id.to_string()),
            reservations::actor_id.eq(actor_id.to_string()),
        ))
        .execute(conn)?;

    let owner: Option<ActorId> = get_reservation_owner(conn, function, grid_area_id)?;
    let reserved: bool = owner == Some(actor_id);
    if inserted > 0 {
        info!(
            "Reserved {} in grid area {} for actor {}",
            function, grid_area_id, actor_id
        );
    } else {
        debug!(
            "Reservation of {} in grid area {} already held by {:?}",
            function, grid_area_id, owner
        );
    }
    Ok(reserved)
}

/// Releases every reservation held by `actor_id`.
///
/// # Errors
///
/// Returns an error if the database statement fails.
pub fn remove_all_reservations(
    conn: &mut SqliteConnection,
    actor_id: ActorId,
) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(
        reservations::table.filter(reservations::actor_id.eq(actor_id.to_string())),
    )
    .execute(conn)?;
    debug!("Released {} reservations of actor {}", removed, actor_id);
    Ok(())
}
